//! Scoreboard domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    MatchRepository, ScoreboardRepository, ScoreboardRepositoryError, ScoreboardService,
};
use crate::domain::service_support::ensure_match_exists;
use crate::domain::{
    ChangeFeed, Error, RowChange, Scoreboard, ScoreboardDraft, ScoreboardPatch, WatchedTable,
};

fn map_repository_error(error: ScoreboardRepositoryError) -> Error {
    match error {
        ScoreboardRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("scoreboard repository unavailable: {message}"))
        }
        ScoreboardRepositoryError::Query { message } => {
            Error::internal(format!("scoreboard repository error: {message}"))
        }
        ScoreboardRepositoryError::UnknownMatch { match_id } => {
            Error::not_found(format!("match {match_id} not found"))
        }
        ScoreboardRepositoryError::Duplicate { match_id } => {
            Error::conflict(format!("match {match_id} already has a scoreboard"))
        }
    }
}

fn invalid(err: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("invalid scoreboard: {err}"))
}

/// Scoreboard service implementing the [`ScoreboardService`] driving port.
#[derive(Clone)]
pub struct ScoreboardServiceImpl<S, M> {
    scoreboards: Arc<S>,
    matches: Arc<M>,
    feed: Arc<ChangeFeed>,
}

impl<S, M> ScoreboardServiceImpl<S, M> {
    /// Create the service; `matches` backs the parent-exists check.
    pub fn new(scoreboards: Arc<S>, matches: Arc<M>, feed: Arc<ChangeFeed>) -> Self {
        Self {
            scoreboards,
            matches,
            feed,
        }
    }
}

#[async_trait]
impl<S, M> ScoreboardService for ScoreboardServiceImpl<S, M>
where
    S: ScoreboardRepository,
    M: MatchRepository,
{
    async fn create(&self, draft: ScoreboardDraft) -> Result<Scoreboard, Error> {
        draft.validate().map_err(invalid)?;
        ensure_match_exists(self.matches.as_ref(), draft.match_id).await?;

        let created = self
            .scoreboards
            .insert(&draft)
            .await
            .map_err(map_repository_error)?;
        self.feed.fire(&RowChange::inserted(
            WatchedTable::Scoreboard,
            created.id(),
            Some(created.match_id()),
        ));
        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<Scoreboard, Error> {
        self.scoreboards
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("scoreboard {id} not found")))
    }

    async fn get_by_match(&self, match_id: i32) -> Result<Scoreboard, Error> {
        self.scoreboards
            .find_by_match(match_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("match {match_id} has no scoreboard")))
    }

    async fn update(&self, id: i32, patch: ScoreboardPatch) -> Result<Scoreboard, Error> {
        let patched = self.get(id).await?.with_patch(patch).map_err(invalid)?;
        let updated = self
            .scoreboards
            .update(&patched)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("scoreboard {id} not found")))?;

        self.feed.fire(&RowChange::updated(
            WatchedTable::Scoreboard,
            updated.id(),
            Some(updated.match_id()),
        ));
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<Scoreboard, Error> {
        let removed = self
            .scoreboards
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("scoreboard {id} not found")))?;

        self.feed.fire(&RowChange::deleted(
            WatchedTable::Scoreboard,
            removed.id(),
            Some(removed.match_id()),
        ));
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "scoreboard_service_tests.rs"]
mod tests;
