//! Port for scoreboard persistence.

use async_trait::async_trait;

use crate::domain::{Scoreboard, ScoreboardDraft};

use super::define_port_error;

define_port_error! {
    /// Errors raised by scoreboard repository adapters.
    pub enum ScoreboardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "scoreboard repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "scoreboard repository query failed: {message}",
        /// The owning match does not exist.
        UnknownMatch { match_id: i32 } =>
            "match {match_id} does not exist",
        /// The match already has a scoreboard.
        Duplicate { match_id: i32 } =>
            "match {match_id} already has a scoreboard",
    }
}

/// Port for reading and writing scoreboards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreboardRepository: Send + Sync {
    /// Insert a validated scoreboard.
    async fn insert(&self, draft: &ScoreboardDraft)
    -> Result<Scoreboard, ScoreboardRepositoryError>;

    /// Find a scoreboard by id.
    async fn find_by_id(&self, id: i32) -> Result<Option<Scoreboard>, ScoreboardRepositoryError>;

    /// Find the scoreboard of a match.
    async fn find_by_match(
        &self,
        match_id: i32,
    ) -> Result<Option<Scoreboard>, ScoreboardRepositoryError>;

    /// Overwrite a scoreboard. Returns `None` when the row no longer exists.
    async fn update(
        &self,
        scoreboard: &Scoreboard,
    ) -> Result<Option<Scoreboard>, ScoreboardRepositoryError>;

    /// Delete a scoreboard and return the removed row.
    async fn delete(&self, id: i32) -> Result<Option<Scoreboard>, ScoreboardRepositoryError>;
}
