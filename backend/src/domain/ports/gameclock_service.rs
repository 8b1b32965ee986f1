//! Driving port for game clock control.
//!
//! Writes accept the version the caller last saw. A stale version fails with
//! `conflict` and details `{expectedVersion, actualVersion}`; `None` skips the
//! up-front check but the write itself is still conditional.

use async_trait::async_trait;

use crate::domain::{Error, GameClock, GameClockDraft, GameClockPatch, Version};

/// Use-cases over game clocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameClockService: Send + Sync {
    /// Create the game clock of an existing match.
    async fn create(&self, draft: GameClockDraft) -> Result<GameClock, Error>;

    async fn get(&self, id: i32) -> Result<GameClock, Error>;

    async fn get_by_match(&self, match_id: i32) -> Result<GameClock, Error>;

    async fn update(
        &self,
        id: i32,
        patch: GameClockPatch,
        expected_version: Option<Version>,
    ) -> Result<GameClock, Error>;

    /// Start counting down from now.
    async fn start(&self, id: i32, expected_version: Option<Version>)
    -> Result<GameClock, Error>;

    /// Pause, banking the elapsed seconds.
    async fn pause(&self, id: i32, expected_version: Option<Version>)
    -> Result<GameClock, Error>;

    /// Stop and restore the full duration.
    async fn reset(&self, id: i32, expected_version: Option<Version>)
    -> Result<GameClock, Error>;

    async fn delete(&self, id: i32) -> Result<GameClock, Error>;
}
