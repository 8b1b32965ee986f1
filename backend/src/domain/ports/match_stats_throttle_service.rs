//! Driving port for the match statistics throttle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, ThrottleDecision, ThrottleRecord};

/// Use-cases over per-match throttle entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchStatsThrottleService: Send + Sync {
    /// Read the entry for a match.
    async fn get(&self, match_id: i32) -> Result<ThrottleRecord, Error>;

    /// Record a notification at `at`, or now when `None`.
    async fn touch(&self, match_id: i32, at: Option<DateTime<Utc>>)
    -> Result<ThrottleRecord, Error>;

    /// Decide whether a notification may go out now and, if so, record it.
    async fn try_acquire(&self, match_id: i32) -> Result<ThrottleDecision, Error>;

    /// Forget the entry for a match.
    async fn clear(&self, match_id: i32) -> Result<(), Error>;
}
