//! Port for game clock persistence with optimistic concurrency.
//!
//! `update` is a conditional write: it only succeeds while the stored row
//! still carries `previous`. When nothing matches, adapters report whether
//! the row is gone or was changed by someone else.

use async_trait::async_trait;

use crate::domain::{GameClock, GameClockDraft, Version};

use super::define_port_error;

define_port_error! {
    /// Errors raised by game clock repository adapters.
    pub enum GameClockRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "gameclock repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "gameclock repository query failed: {message}",
        /// The owning match does not exist.
        UnknownMatch { match_id: i32 } =>
            "match {match_id} does not exist",
        /// The match already has a game clock.
        Duplicate { match_id: i32 } =>
            "match {match_id} already has a gameclock",
        /// The row to update does not exist.
        NotFound { id: i32 } =>
            "gameclock {id} not found",
        /// The stored row carries a different version.
        VersionMismatch { expected: u32, actual: u32 } =>
            "gameclock version mismatch: expected {expected}, found {actual}",
    }
}

/// Port for reading and writing game clocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameClockRepository: Send + Sync {
    /// Insert a validated clock at [`Version::INITIAL`].
    async fn insert(&self, draft: &GameClockDraft) -> Result<GameClock, GameClockRepositoryError>;

    /// Find a clock by id.
    async fn find_by_id(&self, id: i32) -> Result<Option<GameClock>, GameClockRepositoryError>;

    /// Find the clock of a match.
    async fn find_by_match(&self, match_id: i32) -> Result<Option<GameClock>, GameClockRepositoryError>;

    /// Persist `clock` if the stored version is still `previous`.
    async fn update(
        &self,
        clock: &GameClock,
        previous: Version,
    ) -> Result<GameClock, GameClockRepositoryError>;

    /// Delete a clock and return the removed row.
    async fn delete(&self, id: i32) -> Result<Option<GameClock>, GameClockRepositoryError>;
}
