//! Shared Diesel error mapping for the league repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// A closed connection is a connection error; everything else, including a
/// missing row on `get_result`, is reported as a query error.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    log_diesel_error(&error);

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Constraint failures raised by rows owned by a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchConstraint {
    /// `match_id` references no match.
    UnknownMatch,
    /// The match already owns a row in this table.
    Duplicate,
}

/// Classify foreign-key and unique violations on `match_id`.
pub(crate) fn match_constraint_violation(error: &DieselError) -> Option<MatchConstraint> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            Some(MatchConstraint::UnknownMatch)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info
                .constraint_name()
                .is_none_or(|name| name.ends_with("match_id_key")) =>
        {
            Some(MatchConstraint::Duplicate)
        }
        _ => None,
    }
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    //! Mapping coverage for pool and Diesel failures.

    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(String),
        Connection(String),
    }

    struct Info(Option<&'static str>);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "violation"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.0
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(constraint)))
    }

    fn map(error: DieselError) -> Mapped {
        map_basic_diesel_error(
            error,
            |m| Mapped::Query(m.to_owned()),
            |m| Mapped::Connection(m.to_owned()),
        )
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }

    #[rstest]
    fn closed_connection_is_a_connection_error() {
        let mapped = map(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(mapped, Mapped::Connection(_)));
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(DieselError::RollbackTransaction)]
    fn other_failures_are_query_errors(#[case] error: DieselError) {
        assert!(matches!(map(error), Mapped::Query(_)));
    }

    #[rstest]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation, Some("scoreboard_match_id_fkey")),
        Some(MatchConstraint::UnknownMatch)
    )]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation, Some("gameclock_match_id_key")),
        Some(MatchConstraint::Duplicate)
    )]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation, Some("gameclock_pkey")),
        None
    )]
    #[case(DieselError::NotFound, None)]
    fn classifies_match_constraints(
        #[case] error: DieselError,
        #[case] expected: Option<MatchConstraint>,
    ) {
        assert_eq!(match_constraint_violation(&error), expected);
    }
}
