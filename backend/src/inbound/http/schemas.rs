//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`; these
//! wrappers mirror their serialised shape from the adapter layer.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The row changed since the caller last read it.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "gameclock 3 version mismatch")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, such as `expectedVersion` and `actualVersion`.
    details: Option<serde_json::Value>,
}
