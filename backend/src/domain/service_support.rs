//! Helpers shared by the domain services.

use serde_json::json;

use crate::domain::ports::{MatchRepository, MatchRepositoryError};
use crate::domain::{Error, Version};

pub(crate) fn map_match_repository_error(error: MatchRepositoryError) -> Error {
    match error {
        MatchRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("match repository unavailable: {message}"))
        }
        MatchRepositoryError::Query { message } => {
            Error::internal(format!("match repository error: {message}"))
        }
    }
}

/// Fail with `not_found` unless the match exists.
pub(crate) async fn ensure_match_exists<M>(matches: &M, match_id: i32) -> Result<(), Error>
where
    M: MatchRepository + ?Sized,
{
    matches
        .find_by_id(match_id)
        .await
        .map_err(map_match_repository_error)?
        .map(|_| ())
        .ok_or_else(|| Error::not_found(format!("match {match_id} not found")))
}

/// Conflict raised when a versioned row moved on.
pub(crate) fn version_conflict(kind: &str, id: i32, expected: u32, actual: u32) -> Error {
    Error::conflict(format!(
        "{kind} {id} is at version {actual}, not {expected}"
    ))
    .with_details(json!({
        "expectedVersion": expected,
        "actualVersion": actual,
    }))
}

/// Compare the caller's version with the stored one before writing.
pub(crate) fn check_expected_version(
    kind: &str,
    id: i32,
    expected: Option<Version>,
    current: Version,
) -> Result<(), Error> {
    match expected {
        Some(expected) if expected != current => Err(version_conflict(
            kind,
            id,
            expected.get(),
            current.get(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    fn stale_version_reports_both_sides() {
        let err = check_expected_version("gameclock", 4, Version::new(2), Version::INITIAL.next().next())
            .expect_err("stale");

        assert_eq!(err.code(), ErrorCode::Conflict);
        let details = err.details().expect("details");
        assert_eq!(details["expectedVersion"], 2);
        assert_eq!(details["actualVersion"], 3);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Version::INITIAL))]
    fn matching_or_absent_version_passes(#[case] expected: Option<Version>) {
        assert!(check_expected_version("playclock", 1, expected, Version::INITIAL).is_ok());
    }
}
