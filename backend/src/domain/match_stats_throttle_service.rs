//! Match statistics throttle service.
//!
//! `try_acquire` is check-then-write without a lock. Two callers racing on the
//! same match may both emit; the later write wins, which bounds the rate to
//! roughly one notification per caller per interval.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    MatchStatsThrottleRepository, MatchStatsThrottleRepositoryError, MatchStatsThrottleService,
};
use crate::domain::{Error, ThrottleDecision, ThrottleRecord};

fn map_repository_error(error: MatchStatsThrottleRepositoryError) -> Error {
    match error {
        MatchStatsThrottleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("throttle repository unavailable: {message}"))
        }
        MatchStatsThrottleRepositoryError::Query { message } => {
            Error::internal(format!("throttle repository error: {message}"))
        }
    }
}

/// Throttle service implementing the [`MatchStatsThrottleService`] driving port.
#[derive(Clone)]
pub struct MatchStatsThrottleServiceImpl<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    min_interval: TimeDelta,
}

impl<R> MatchStatsThrottleServiceImpl<R> {
    /// Create the service with the minimum gap between notifications.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>, min_interval: Duration) -> Self {
        Self {
            repo,
            clock,
            min_interval: TimeDelta::from_std(min_interval).unwrap_or(TimeDelta::MAX),
        }
    }
}

#[async_trait]
impl<R> MatchStatsThrottleService for MatchStatsThrottleServiceImpl<R>
where
    R: MatchStatsThrottleRepository,
{
    async fn get(&self, match_id: i32) -> Result<ThrottleRecord, Error> {
        self.repo
            .find(match_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("no throttle entry for match {match_id}")))
    }

    async fn touch(
        &self,
        match_id: i32,
        at: Option<DateTime<Utc>>,
    ) -> Result<ThrottleRecord, Error> {
        self.repo
            .touch(match_id, at)
            .await
            .map_err(map_repository_error)
    }

    async fn try_acquire(&self, match_id: i32) -> Result<ThrottleDecision, Error> {
        let now = self.clock.utc();
        let existing = self
            .repo
            .find(match_id)
            .await
            .map_err(map_repository_error)?;

        let pending = existing.and_then(|record| {
            record
                .retry_after(now, self.min_interval)
                .map(|retry_after_ms| (record.last_notified_at(), retry_after_ms))
        });
        if let Some((last_notified_at, retry_after_ms)) = pending {
            debug!(match_id, retry_after_ms, "stats notification suppressed");
            return Ok(ThrottleDecision::Suppress {
                last_notified_at,
                retry_after_ms,
            });
        }

        let record = self
            .repo
            .touch(match_id, Some(now))
            .await
            .map_err(map_repository_error)?;
        Ok(ThrottleDecision::Emit { record })
    }

    async fn clear(&self, match_id: i32) -> Result<(), Error> {
        let removed = self
            .repo
            .delete(match_id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "no throttle entry for match {match_id}"
            )))
        }
    }
}
