//! Port for play clock persistence with optimistic concurrency.
//!
//! `update` is a conditional write: it only succeeds while the stored row
//! still carries `previous`. When nothing matches, adapters report whether
//! the row is gone or was changed by someone else.

use async_trait::async_trait;

use crate::domain::{PlayClock, PlayClockDraft, Version};

use super::define_port_error;

define_port_error! {
    /// Errors raised by play clock repository adapters.
    pub enum PlayClockRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "playclock repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "playclock repository query failed: {message}",
        /// The owning match does not exist.
        UnknownMatch { match_id: i32 } =>
            "match {match_id} does not exist",
        /// The match already has a play clock.
        Duplicate { match_id: i32 } =>
            "match {match_id} already has a playclock",
        /// The row to update does not exist.
        NotFound { id: i32 } =>
            "playclock {id} not found",
        /// The stored row carries a different version.
        VersionMismatch { expected: u32, actual: u32 } =>
            "playclock version mismatch: expected {expected}, found {actual}",
    }
}

/// Port for reading and writing play clocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayClockRepository: Send + Sync {
    /// Insert a validated clock at [`Version::INITIAL`].
    async fn insert(&self, draft: &PlayClockDraft) -> Result<PlayClock, PlayClockRepositoryError>;

    /// Find a clock by id.
    async fn find_by_id(&self, id: i32) -> Result<Option<PlayClock>, PlayClockRepositoryError>;

    /// Find the clock of a match.
    async fn find_by_match(&self, match_id: i32) -> Result<Option<PlayClock>, PlayClockRepositoryError>;

    /// Persist `clock` if the stored version is still `previous`.
    async fn update(
        &self,
        clock: &PlayClock,
        previous: Version,
    ) -> Result<PlayClock, PlayClockRepositoryError>;

    /// Delete a clock and return the removed row.
    async fn delete(&self, id: i32) -> Result<Option<PlayClock>, PlayClockRepositoryError>;
}
