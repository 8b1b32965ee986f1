//! In-memory `MatchStatsThrottleRepository`.
//!
//! Entries are keyed by match id only; like the SQL table there is no foreign
//! key to `match`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::ThrottleRecord;
use crate::domain::ports::{MatchStatsThrottleRepository, MatchStatsThrottleRepositoryError};

use super::store::MemoryStore;

/// Throttle table kept in a [`MemoryStore`].
#[derive(Clone)]
pub struct InMemoryMatchStatsThrottleRepository {
    store: MemoryStore,
    clock: Arc<dyn Clock>,
}

impl InMemoryMatchStatsThrottleRepository {
    /// Create a repository over `store`; `clock` supplies the default
    /// timestamp for `touch(.., None)`.
    pub fn new(store: MemoryStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl MatchStatsThrottleRepository for InMemoryMatchStatsThrottleRepository {
    async fn find(
        &self,
        match_id: i32,
    ) -> Result<Option<ThrottleRecord>, MatchStatsThrottleRepositoryError> {
        Ok(self.store.lock().throttle.get(&match_id).copied())
    }

    async fn touch(
        &self,
        match_id: i32,
        at: Option<DateTime<Utc>>,
    ) -> Result<ThrottleRecord, MatchStatsThrottleRepositoryError> {
        let record = ThrottleRecord::new(match_id, at.unwrap_or_else(|| self.clock.utc()));
        self.store.lock().throttle.insert(match_id, record);
        Ok(record)
    }

    async fn delete(&self, match_id: i32) -> Result<bool, MatchStatsThrottleRepositoryError> {
        Ok(self.store.lock().throttle.remove(&match_id).is_some())
    }
}
