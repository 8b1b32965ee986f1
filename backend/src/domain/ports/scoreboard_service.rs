//! Driving port for scoreboard writes and reads.

use async_trait::async_trait;

use crate::domain::{Error, Scoreboard, ScoreboardDraft, ScoreboardPatch};

/// Use-cases over scoreboards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreboardService: Send + Sync {
    /// Create the scoreboard of an existing match.
    async fn create(&self, draft: ScoreboardDraft) -> Result<Scoreboard, Error>;

    async fn get(&self, id: i32) -> Result<Scoreboard, Error>;

    async fn get_by_match(&self, match_id: i32) -> Result<Scoreboard, Error>;

    /// Apply a partial update, typically a score change.
    async fn update(&self, id: i32, patch: ScoreboardPatch) -> Result<Scoreboard, Error>;

    async fn delete(&self, id: i32) -> Result<Scoreboard, Error>;
}
