//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::{ClockStatus, Error, Version};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidTimestamp,
    InvalidStatus,
    InvalidVersion,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidVersion => "invalid_version",
            ErrorCode::InvalidBody => "invalid_body",
        }
    }
}

/// Newtype wrapper for camelCase request field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<String>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        format!("missing required field: {}", field.as_str()),
        ErrorCode::MissingField,
        None,
    )
}

/// Unwrap a required request field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|_| {
                    field_error(
                        field,
                        format!("{} must be an RFC 3339 timestamp", field.as_str()),
                        ErrorCode::InvalidTimestamp,
                        Some(raw.clone()),
                    )
                })
        })
        .transpose()
}

pub(crate) fn parse_optional_status(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<ClockStatus>, Error> {
    value
        .map(|raw| {
            raw.parse::<ClockStatus>().map_err(|_| {
                field_error(
                    field,
                    format!("{} must be stopped, running or paused", field.as_str()),
                    ErrorCode::InvalidStatus,
                    Some(raw.clone()),
                )
            })
        })
        .transpose()
}

/// Parse an optional `expectedVersion` precondition.
pub(crate) fn parse_expected_version(value: Option<u32>) -> Result<Option<Version>, Error> {
    const FIELD: FieldName = FieldName::new("expectedVersion");
    value
        .map(|raw| {
            Version::new(raw).ok_or_else(|| {
                field_error(
                    FIELD,
                    format!("expectedVersion must be between 1 and {}", Version::MAX),
                    ErrorCode::InvalidVersion,
                    Some(raw.to_string()),
                )
            })
        })
        .transpose()
}

/// Decode an optional JSON body; an empty body yields `T::default()`.
pub(crate) fn parse_optional_body<T>(body: &[u8]) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        Error::invalid_request("request body is not valid JSON for this endpoint").with_details(
            json!({ "code": ErrorCode::InvalidBody.as_str(), "reason": err.to_string() }),
        )
    })
}
