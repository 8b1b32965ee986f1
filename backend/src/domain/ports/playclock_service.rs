//! Driving port for play clock control.

use async_trait::async_trait;

use crate::domain::{Error, PlayClock, PlayClockDraft, PlayClockPatch, Version};

/// Use-cases over play clocks. Version handling matches the game clock port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayClockService: Send + Sync {
    /// Create the play clock of an existing match.
    async fn create(&self, draft: PlayClockDraft) -> Result<PlayClock, Error>;

    async fn get(&self, id: i32) -> Result<PlayClock, Error>;

    async fn get_by_match(&self, match_id: i32) -> Result<PlayClock, Error>;

    async fn update(
        &self,
        id: i32,
        patch: PlayClockPatch,
        expected_version: Option<Version>,
    ) -> Result<PlayClock, Error>;

    /// Run the play clock for `seconds`.
    async fn start(
        &self,
        id: i32,
        seconds: i32,
        expected_version: Option<Version>,
    ) -> Result<PlayClock, Error>;

    /// Stop and blank the play clock.
    async fn stop(&self, id: i32, expected_version: Option<Version>)
    -> Result<PlayClock, Error>;

    async fn delete(&self, id: i32) -> Result<PlayClock, Error>;
}
