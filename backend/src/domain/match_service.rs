//! Match domain service.
//!
//! Implements [`MatchService`] over a [`MatchRepository`] and fires the change
//! feed once each write has been committed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{MatchRepository, MatchService};
use crate::domain::service_support::map_match_repository_error;
use crate::domain::{
    ChangeFeed, Error, Match, MatchDraft, MatchPatch, NewMatch, RowChange, WatchedTable,
};

/// Match service implementing the [`MatchService`] driving port.
#[derive(Clone)]
pub struct MatchServiceImpl<R> {
    matches: Arc<R>,
    feed: Arc<ChangeFeed>,
}

impl<R> MatchServiceImpl<R> {
    /// Create the service from its repository and change feed.
    pub fn new(matches: Arc<R>, feed: Arc<ChangeFeed>) -> Self {
        Self { matches, feed }
    }
}

#[async_trait]
impl<R> MatchService for MatchServiceImpl<R>
where
    R: MatchRepository,
{
    async fn create(&self, draft: MatchDraft) -> Result<Match, Error> {
        let new_match = NewMatch::new(draft)
            .map_err(|err| Error::invalid_request(format!("invalid match: {err}")))?;
        let created = self
            .matches
            .insert(&new_match)
            .await
            .map_err(map_match_repository_error)?;

        self.feed
            .fire(&RowChange::inserted(WatchedTable::Match, created.id(), None));
        info!(match_id = created.id(), "match created");
        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<Match, Error> {
        self.matches
            .find_by_id(id)
            .await
            .map_err(map_match_repository_error)?
            .ok_or_else(|| Error::not_found(format!("match {id} not found")))
    }

    async fn update(&self, id: i32, patch: MatchPatch) -> Result<Match, Error> {
        let current = self.get(id).await?;
        let patched = current
            .with_patch(patch)
            .map_err(|err| Error::invalid_request(format!("invalid match: {err}")))?;
        let updated = self
            .matches
            .update(&patched)
            .await
            .map_err(map_match_repository_error)?
            .ok_or_else(|| Error::not_found(format!("match {id} not found")))?;

        self.feed
            .fire(&RowChange::updated(WatchedTable::Match, id, None));
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<Match, Error> {
        let deletion = self
            .matches
            .delete(id)
            .await
            .map_err(map_match_repository_error)?
            .ok_or_else(|| Error::not_found(format!("match {id} not found")))?;

        for change in deletion.row_changes() {
            self.feed.fire(&change);
        }
        info!(
            match_id = id,
            cascaded = deletion.scoreboard_ids.len()
                + deletion.gameclock_ids.len()
                + deletion.playclock_ids.len(),
            "match deleted"
        );
        Ok(deletion.removed)
    }
}

#[cfg(test)]
#[path = "match_service_tests.rs"]
mod tests;
