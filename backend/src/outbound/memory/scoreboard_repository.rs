//! In-memory `ScoreboardRepository`.

use async_trait::async_trait;

use crate::domain::ports::{ScoreboardRepository, ScoreboardRepositoryError};
use crate::domain::{Scoreboard, ScoreboardDraft};

use super::store::MemoryStore;

/// Scoreboard table kept in a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryScoreboardRepository {
    store: MemoryStore,
}

impl InMemoryScoreboardRepository {
    /// Create a repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ScoreboardRepository for InMemoryScoreboardRepository {
    async fn insert(&self, draft: &ScoreboardDraft) -> Result<Scoreboard, ScoreboardRepositoryError> {
        let mut tables = self.store.lock();
        if !tables.matches.contains_key(&draft.match_id) {
            return Err(ScoreboardRepositoryError::unknown_match(draft.match_id));
        }
        if tables
            .scoreboards
            .values()
            .any(|board| board.match_id() == draft.match_id)
        {
            return Err(ScoreboardRepositoryError::duplicate(draft.match_id));
        }

        let id = tables
            .scoreboard_ids
            .next_id("scoreboard")
            .map_err(|err| ScoreboardRepositoryError::query(err.to_string()))?;
        let created = Scoreboard::new(id, draft.clone())
            .map_err(|err| ScoreboardRepositoryError::query(err.to_string()))?;
        tables.scoreboards.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Scoreboard>, ScoreboardRepositoryError> {
        Ok(self.store.lock().scoreboards.get(&id).cloned())
    }

    async fn find_by_match(
        &self,
        match_id: i32,
    ) -> Result<Option<Scoreboard>, ScoreboardRepositoryError> {
        Ok(self
            .store
            .lock()
            .scoreboards
            .values()
            .find(|board| board.match_id() == match_id)
            .cloned())
    }

    async fn update(
        &self,
        updated: &Scoreboard,
    ) -> Result<Option<Scoreboard>, ScoreboardRepositoryError> {
        let mut tables = self.store.lock();
        let Some(slot) = tables.scoreboards.get_mut(&updated.id()) else {
            return Ok(None);
        };
        *slot = updated.clone();
        Ok(Some(updated.clone()))
    }

    async fn delete(&self, id: i32) -> Result<Option<Scoreboard>, ScoreboardRepositoryError> {
        Ok(self.store.lock().scoreboards.remove(&id))
    }
}
