//! In-memory `MatchRepository`.

use async_trait::async_trait;

use crate::domain::ports::{MatchDeletion, MatchRepository, MatchRepositoryError};
use crate::domain::{Match, NewMatch};

use super::store::MemoryStore;

/// Match table kept in a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryMatchRepository {
    store: MemoryStore,
}

impl InMemoryMatchRepository {
    /// Create a repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    async fn insert(&self, new_match: &NewMatch) -> Result<Match, MatchRepositoryError> {
        let mut tables = self.store.lock();
        let id = tables
            .match_ids
            .next_id("match")
            .map_err(|err| MatchRepositoryError::query(err.to_string()))?;
        let created = Match::from_new(id, new_match.clone());
        tables.matches.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Match>, MatchRepositoryError> {
        Ok(self.store.lock().matches.get(&id).cloned())
    }

    async fn update(&self, updated: &Match) -> Result<Option<Match>, MatchRepositoryError> {
        let mut tables = self.store.lock();
        let Some(slot) = tables.matches.get_mut(&updated.id()) else {
            return Ok(None);
        };
        *slot = updated.clone();
        Ok(Some(updated.clone()))
    }

    async fn delete(&self, id: i32) -> Result<Option<MatchDeletion>, MatchRepositoryError> {
        let mut tables = self.store.lock();
        let Some(removed) = tables.matches.remove(&id) else {
            return Ok(None);
        };

        let mut scoreboard_ids = Vec::new();
        tables.scoreboards.retain(|sid, board| {
            let owned = board.match_id() == id;
            if owned {
                scoreboard_ids.push(*sid);
            }
            !owned
        });
        let mut gameclock_ids = Vec::new();
        tables.gameclocks.retain(|cid, clock| {
            let owned = clock.match_id() == id;
            if owned {
                gameclock_ids.push(*cid);
            }
            !owned
        });
        let mut playclock_ids = Vec::new();
        tables.playclocks.retain(|cid, clock| {
            let owned = clock.match_id() == id;
            if owned {
                playclock_ids.push(*cid);
            }
            !owned
        });

        Ok(Some(MatchDeletion {
            removed,
            scoreboard_ids,
            gameclock_ids,
            playclock_ids,
        }))
    }
}
