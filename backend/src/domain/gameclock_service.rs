//! Game clock domain service.
//!
//! Every write is read-check-write: load the clock, compare the caller's
//! version, derive the next state and persist it conditionally on the version
//! that was read. A concurrent writer surfaces as `conflict`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    GameClockRepository, GameClockRepositoryError, GameClockService, MatchRepository,
};
use crate::domain::service_support::{
    check_expected_version, ensure_match_exists, version_conflict,
};
use crate::domain::{
    ChangeFeed, ClockError, ClockStatus, Error, GameClock, GameClockDraft, GameClockPatch,
    RowChange, Version, WatchedTable,
};

const KIND: &str = "gameclock";

fn map_repository_error(error: GameClockRepositoryError) -> Error {
    match error {
        GameClockRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("gameclock repository unavailable: {message}"))
        }
        GameClockRepositoryError::Query { message } => {
            Error::internal(format!("gameclock repository error: {message}"))
        }
        GameClockRepositoryError::UnknownMatch { match_id } => {
            Error::not_found(format!("match {match_id} not found"))
        }
        GameClockRepositoryError::Duplicate { match_id } => {
            Error::conflict(format!("match {match_id} already has a gameclock"))
        }
        GameClockRepositoryError::NotFound { id } => {
            Error::not_found(format!("gameclock {id} not found"))
        }
        GameClockRepositoryError::VersionMismatch { expected, actual } => {
            Error::conflict(format!(
                "gameclock version mismatch: expected {expected}, found {actual}"
            ))
            .with_details(serde_json::json!({
                "expectedVersion": expected,
                "actualVersion": actual,
            }))
        }
    }
}

pub(crate) fn map_clock_error(error: ClockError) -> Error {
    match error {
        ClockError::AlreadyRunning | ClockError::NotRunning => Error::conflict(error.to_string()),
        other => Error::invalid_request(other.to_string()),
    }
}

/// Game clock service implementing the [`GameClockService`] driving port.
#[derive(Clone)]
pub struct GameClockServiceImpl<G, M> {
    clocks: Arc<G>,
    matches: Arc<M>,
    feed: Arc<ChangeFeed>,
    clock: Arc<dyn Clock>,
}

impl<G, M> GameClockServiceImpl<G, M> {
    /// Create the service. `clock` supplies the wall time for start and pause.
    pub fn new(
        clocks: Arc<G>,
        matches: Arc<M>,
        feed: Arc<ChangeFeed>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            clocks,
            matches,
            feed,
            clock,
        }
    }

    fn now_ms(&self) -> i64 {
        self.clock.utc().timestamp_millis()
    }
}

impl<G, M> GameClockServiceImpl<G, M>
where
    G: GameClockRepository,
    M: MatchRepository,
{
    async fn transition<F>(
        &self,
        id: i32,
        expected_version: Option<Version>,
        next_state: F,
    ) -> Result<GameClock, Error>
    where
        F: FnOnce(&GameClock) -> Result<GameClock, ClockError> + Send,
    {
        let current = self.get(id).await?;
        check_expected_version(KIND, id, expected_version, current.version())?;
        let next = next_state(&current).map_err(map_clock_error)?;

        let saved = self
            .clocks
            .update(&next, current.version())
            .await
            .map_err(|err| match err {
                GameClockRepositoryError::VersionMismatch { actual, .. } => version_conflict(
                    KIND,
                    id,
                    expected_version.unwrap_or(current.version()).get(),
                    actual,
                ),
                other => map_repository_error(other),
            })?;

        debug!(
            gameclock_id = id,
            version = %saved.version(),
            status = %saved.status(),
            "gameclock updated"
        );
        self.feed.fire(&RowChange::updated(
            WatchedTable::GameClock,
            saved.id(),
            Some(saved.match_id()),
        ));
        Ok(saved)
    }
}

#[async_trait]
impl<G, M> GameClockService for GameClockServiceImpl<G, M>
where
    G: GameClockRepository,
    M: MatchRepository,
{
    async fn create(&self, mut draft: GameClockDraft) -> Result<GameClock, Error> {
        if draft.status == ClockStatus::Running && draft.started_at_ms.is_none() {
            draft.started_at_ms = Some(self.now_ms());
        }
        draft.validate().map_err(map_clock_error)?;
        ensure_match_exists(self.matches.as_ref(), draft.match_id).await?;

        let created = self
            .clocks
            .insert(&draft)
            .await
            .map_err(map_repository_error)?;
        self.feed.fire(&RowChange::inserted(
            WatchedTable::GameClock,
            created.id(),
            Some(created.match_id()),
        ));
        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<GameClock, Error> {
        self.clocks
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("gameclock {id} not found")))
    }

    async fn get_by_match(&self, match_id: i32) -> Result<GameClock, Error> {
        self.clocks
            .find_by_match(match_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("match {match_id} has no gameclock")))
    }

    async fn update(
        &self,
        id: i32,
        patch: GameClockPatch,
        expected_version: Option<Version>,
    ) -> Result<GameClock, Error> {
        let now_ms = self.now_ms();
        self.transition(id, expected_version, move |clock| {
            clock.with_patch(patch, now_ms)
        })
        .await
    }

    async fn start(&self, id: i32, expected_version: Option<Version>) -> Result<GameClock, Error> {
        let now_ms = self.now_ms();
        self.transition(id, expected_version, move |clock| clock.start(now_ms))
            .await
    }

    async fn pause(&self, id: i32, expected_version: Option<Version>) -> Result<GameClock, Error> {
        let now_ms = self.now_ms();
        self.transition(id, expected_version, move |clock| clock.pause(now_ms))
            .await
    }

    async fn reset(&self, id: i32, expected_version: Option<Version>) -> Result<GameClock, Error> {
        self.transition(id, expected_version, |clock| Ok(clock.reset()))
            .await
    }

    async fn delete(&self, id: i32) -> Result<GameClock, Error> {
        let removed = self
            .clocks
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("gameclock {id} not found")))?;

        self.feed.fire(&RowChange::deleted(
            WatchedTable::GameClock,
            removed.id(),
            Some(removed.match_id()),
        ));
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "gameclock_service_tests.rs"]
mod tests;
