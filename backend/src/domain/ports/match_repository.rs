//! Port for match persistence.
//!
//! Deleting a match removes its scoreboard and clocks in the same transaction.
//! The adapter reports those cascaded rows so the caller can fire a trigger for
//! each of them.

use async_trait::async_trait;

use crate::domain::{Match, NewMatch, RowChange, WatchedTable};

use super::define_port_error;

define_port_error! {
    /// Errors raised by match repository adapters.
    pub enum MatchRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "match repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "match repository query failed: {message}",
    }
}

/// Rows removed by deleting a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDeletion {
    pub removed: Match,
    pub scoreboard_ids: Vec<i32>,
    pub gameclock_ids: Vec<i32>,
    pub playclock_ids: Vec<i32>,
}

impl MatchDeletion {
    /// Delete changes for every removed row, dependants first.
    pub fn row_changes(&self) -> Vec<RowChange> {
        let match_id = self.removed.id();
        let dependants = [
            (WatchedTable::Scoreboard, &self.scoreboard_ids),
            (WatchedTable::GameClock, &self.gameclock_ids),
            (WatchedTable::PlayClock, &self.playclock_ids),
        ];
        dependants
            .into_iter()
            .flat_map(|(table, ids)| {
                ids.iter()
                    .map(move |id| RowChange::deleted(table, *id, Some(match_id)))
            })
            .chain(std::iter::once(RowChange::deleted(
                WatchedTable::Match,
                match_id,
                None,
            )))
            .collect()
    }
}

/// Port for reading and writing matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Insert a match and return it with its assigned id.
    async fn insert(&self, new_match: &NewMatch) -> Result<Match, MatchRepositoryError>;

    /// Find a match by id.
    async fn find_by_id(&self, id: i32) -> Result<Option<Match>, MatchRepositoryError>;

    /// Overwrite a match. Returns `None` when the row no longer exists.
    async fn update(&self, updated: &Match) -> Result<Option<Match>, MatchRepositoryError>;

    /// Delete a match together with its dependants.
    async fn delete(&self, id: i32) -> Result<Option<MatchDeletion>, MatchRepositoryError>;
}
