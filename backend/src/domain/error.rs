//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses, WebSocket frames, or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with the current state of a versioned row.
    Conflict,
    /// A backing store is temporarily unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// Captures the trace identifier in scope at construction time so adapters
/// can correlate the error with request logs.
///
/// # Examples
/// ```
/// use league_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error, recording the current trace identifier if any.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was raised.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier to the error.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use league_backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "title" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Constructor and serialisation coverage for domain errors.

    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    #[rstest]
    #[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
    #[case(Error::not_found("missing"), ErrorCode::NotFound)]
    #[case(Error::conflict("stale"), ErrorCode::Conflict)]
    #[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
    #[case(Error::internal("boom"), ErrorCode::InternalError)]
    fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn serialises_camel_case_and_skips_empty_fields() {
        let error = Error::invalid_request("bad").with_details(json!({ "field": "title" }));
        let value = serde_json::to_value(&error).expect("serialise error");

        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["message"], "bad");
        assert_eq!(value["details"]["field"], "title");
        assert!(value.get("traceId").is_none());
    }

    #[tokio::test]
    async fn captures_trace_id_in_scope() {
        let trace_id = TraceId::from_uuid(Uuid::nil());
        let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;

        assert_eq!(error.trace_id(), Some(Uuid::nil().to_string().as_str()));
    }
}
