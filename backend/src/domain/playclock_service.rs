//! Play clock domain service.
//!
//! Follows the same read-check-write cycle as the game clock service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::gameclock_service::map_clock_error;
use crate::domain::ports::{
    MatchRepository, PlayClockRepository, PlayClockRepositoryError, PlayClockService,
};
use crate::domain::service_support::{
    check_expected_version, ensure_match_exists, version_conflict,
};
use crate::domain::{
    ChangeFeed, ClockError, Error, PlayClock, PlayClockDraft, PlayClockPatch, RowChange, Version,
    WatchedTable,
};

const KIND: &str = "playclock";

fn map_repository_error(error: PlayClockRepositoryError) -> Error {
    match error {
        PlayClockRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("playclock repository unavailable: {message}"))
        }
        PlayClockRepositoryError::Query { message } => {
            Error::internal(format!("playclock repository error: {message}"))
        }
        PlayClockRepositoryError::UnknownMatch { match_id } => {
            Error::not_found(format!("match {match_id} not found"))
        }
        PlayClockRepositoryError::Duplicate { match_id } => {
            Error::conflict(format!("match {match_id} already has a playclock"))
        }
        PlayClockRepositoryError::NotFound { id } => {
            Error::not_found(format!("playclock {id} not found"))
        }
        PlayClockRepositoryError::VersionMismatch { expected, actual } => {
            Error::conflict(format!(
                "playclock version mismatch: expected {expected}, found {actual}"
            ))
            .with_details(serde_json::json!({
                "expectedVersion": expected,
                "actualVersion": actual,
            }))
        }
    }
}

/// Play clock service implementing the [`PlayClockService`] driving port.
#[derive(Clone)]
pub struct PlayClockServiceImpl<P, M> {
    clocks: Arc<P>,
    matches: Arc<M>,
    feed: Arc<ChangeFeed>,
}

impl<P, M> PlayClockServiceImpl<P, M> {
    pub fn new(clocks: Arc<P>, matches: Arc<M>, feed: Arc<ChangeFeed>) -> Self {
        Self {
            clocks,
            matches,
            feed,
        }
    }
}

impl<P, M> PlayClockServiceImpl<P, M>
where
    P: PlayClockRepository,
    M: MatchRepository,
{
    async fn transition<F>(
        &self,
        id: i32,
        expected_version: Option<Version>,
        next_state: F,
    ) -> Result<PlayClock, Error>
    where
        F: FnOnce(&PlayClock) -> Result<PlayClock, ClockError> + Send,
    {
        let current = self.get(id).await?;
        check_expected_version(KIND, id, expected_version, current.version())?;
        let next = next_state(&current).map_err(map_clock_error)?;

        let saved = self
            .clocks
            .update(&next, current.version())
            .await
            .map_err(|err| match err {
                PlayClockRepositoryError::VersionMismatch { actual, .. } => version_conflict(
                    KIND,
                    id,
                    expected_version.unwrap_or(current.version()).get(),
                    actual,
                ),
                other => map_repository_error(other),
            })?;

        self.feed.fire(&RowChange::updated(
            WatchedTable::PlayClock,
            saved.id(),
            Some(saved.match_id()),
        ));
        Ok(saved)
    }
}

#[async_trait]
impl<P, M> PlayClockService for PlayClockServiceImpl<P, M>
where
    P: PlayClockRepository,
    M: MatchRepository,
{
    async fn create(&self, draft: PlayClockDraft) -> Result<PlayClock, Error> {
        draft.validate().map_err(map_clock_error)?;
        ensure_match_exists(self.matches.as_ref(), draft.match_id).await?;

        let created = self
            .clocks
            .insert(&draft)
            .await
            .map_err(map_repository_error)?;
        self.feed.fire(&RowChange::inserted(
            WatchedTable::PlayClock,
            created.id(),
            Some(created.match_id()),
        ));
        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<PlayClock, Error> {
        self.clocks
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("playclock {id} not found")))
    }

    async fn get_by_match(&self, match_id: i32) -> Result<PlayClock, Error> {
        self.clocks
            .find_by_match(match_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("match {match_id} has no playclock")))
    }

    async fn update(
        &self,
        id: i32,
        patch: PlayClockPatch,
        expected_version: Option<Version>,
    ) -> Result<PlayClock, Error> {
        self.transition(id, expected_version, move |clock| clock.with_patch(patch))
            .await
    }

    async fn start(
        &self,
        id: i32,
        seconds: i32,
        expected_version: Option<Version>,
    ) -> Result<PlayClock, Error> {
        self.transition(id, expected_version, move |clock| clock.start(seconds))
            .await
    }

    async fn stop(&self, id: i32, expected_version: Option<Version>) -> Result<PlayClock, Error> {
        self.transition(id, expected_version, |clock| Ok(clock.stop()))
            .await
    }

    async fn delete(&self, id: i32) -> Result<PlayClock, Error> {
        let removed = self
            .clocks
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("playclock {id} not found")))?;

        self.feed.fire(&RowChange::deleted(
            WatchedTable::PlayClock,
            removed.id(),
            Some(removed.match_id()),
        ));
        Ok(removed)
    }
}
