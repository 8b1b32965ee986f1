//! Driving port for match writes and reads.

use async_trait::async_trait;

use crate::domain::{Error, Match, MatchDraft, MatchPatch};

/// Use-cases over matches.
///
/// Each successful mutation fires exactly one `match_change` notification,
/// plus one delete notification per dependant row removed with the match.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchService: Send + Sync {
    /// Validate and store a new match.
    async fn create(&self, draft: MatchDraft) -> Result<Match, Error>;

    /// Fetch a match or fail with `not_found`.
    async fn get(&self, id: i32) -> Result<Match, Error>;

    /// Apply a partial update.
    async fn update(&self, id: i32, patch: MatchPatch) -> Result<Match, Error>;

    /// Delete a match and its dependants, returning the removed match.
    async fn delete(&self, id: i32) -> Result<Match, Error>;
}
