//! Port for the per-match statistics throttle.
//!
//! One entry per match, last write wins. The store keeps the timestamp and
//! nothing else; rate-limit policy belongs to the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ThrottleRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by throttle repository adapters.
    pub enum MatchStatsThrottleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "throttle repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "throttle repository query failed: {message}",
    }
}

/// Port for reading and writing throttle timestamps.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchStatsThrottleRepository: Send + Sync {
    /// Read the entry for `match_id`.
    async fn find(
        &self,
        match_id: i32,
    ) -> Result<Option<ThrottleRecord>, MatchStatsThrottleRepositoryError>;

    /// Upsert the entry for `match_id`.
    ///
    /// `None` stores the current time as seen by the store.
    async fn touch(
        &self,
        match_id: i32,
        at: Option<DateTime<Utc>>,
    ) -> Result<ThrottleRecord, MatchStatsThrottleRepositoryError>;

    /// Remove the entry for `match_id`. Returns whether one existed.
    async fn delete(&self, match_id: i32) -> Result<bool, MatchStatsThrottleRepositoryError>;
}
