//! In-memory game and play clock repositories with version checks.

use async_trait::async_trait;

use crate::domain::ports::{
    GameClockRepository, GameClockRepositoryError, PlayClockRepository, PlayClockRepositoryError,
};
use crate::domain::{GameClock, GameClockDraft, PlayClock, PlayClockDraft, Version};

use super::store::MemoryStore;

/// Game clock table kept in a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryGameClockRepository {
    store: MemoryStore,
}

impl InMemoryGameClockRepository {
    /// Create a repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl GameClockRepository for InMemoryGameClockRepository {
    async fn insert(&self, draft: &GameClockDraft) -> Result<GameClock, GameClockRepositoryError> {
        let mut tables = self.store.lock();
        if !tables.matches.contains_key(&draft.match_id) {
            return Err(GameClockRepositoryError::unknown_match(draft.match_id));
        }
        if tables
            .gameclocks
            .values()
            .any(|clock| clock.match_id() == draft.match_id)
        {
            return Err(GameClockRepositoryError::duplicate(draft.match_id));
        }

        let id = tables
            .gameclock_ids
            .next_id("gameclock")
            .map_err(|err| GameClockRepositoryError::query(err.to_string()))?;
        let created = GameClock::new(id, Version::INITIAL, draft.clone())
            .map_err(|err| GameClockRepositoryError::query(err.to_string()))?;
        tables.gameclocks.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<GameClock>, GameClockRepositoryError> {
        Ok(self.store.lock().gameclocks.get(&id).cloned())
    }

    async fn find_by_match(
        &self,
        match_id: i32,
    ) -> Result<Option<GameClock>, GameClockRepositoryError> {
        Ok(self
            .store
            .lock()
            .gameclocks
            .values()
            .find(|clock| clock.match_id() == match_id)
            .cloned())
    }

    async fn update(
        &self,
        clock: &GameClock,
        previous: Version,
    ) -> Result<GameClock, GameClockRepositoryError> {
        let mut tables = self.store.lock();
        let Some(slot) = tables.gameclocks.get_mut(&clock.id()) else {
            return Err(GameClockRepositoryError::not_found(clock.id()));
        };
        if slot.version() != previous {
            return Err(GameClockRepositoryError::version_mismatch(
                previous.get(),
                slot.version().get(),
            ));
        }
        *slot = clock.clone();
        Ok(clock.clone())
    }

    async fn delete(&self, id: i32) -> Result<Option<GameClock>, GameClockRepositoryError> {
        Ok(self.store.lock().gameclocks.remove(&id))
    }
}

/// Play clock table kept in a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryPlayClockRepository {
    store: MemoryStore,
}

impl InMemoryPlayClockRepository {
    /// Create a repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PlayClockRepository for InMemoryPlayClockRepository {
    async fn insert(&self, draft: &PlayClockDraft) -> Result<PlayClock, PlayClockRepositoryError> {
        let mut tables = self.store.lock();
        if !tables.matches.contains_key(&draft.match_id) {
            return Err(PlayClockRepositoryError::unknown_match(draft.match_id));
        }
        if tables
            .playclocks
            .values()
            .any(|clock| clock.match_id() == draft.match_id)
        {
            return Err(PlayClockRepositoryError::duplicate(draft.match_id));
        }

        let id = tables
            .playclock_ids
            .next_id("playclock")
            .map_err(|err| PlayClockRepositoryError::query(err.to_string()))?;
        let created = PlayClock::new(id, Version::INITIAL, draft.clone())
            .map_err(|err| PlayClockRepositoryError::query(err.to_string()))?;
        tables.playclocks.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<PlayClock>, PlayClockRepositoryError> {
        Ok(self.store.lock().playclocks.get(&id).cloned())
    }

    async fn find_by_match(
        &self,
        match_id: i32,
    ) -> Result<Option<PlayClock>, PlayClockRepositoryError> {
        Ok(self
            .store
            .lock()
            .playclocks
            .values()
            .find(|clock| clock.match_id() == match_id)
            .cloned())
    }

    async fn update(
        &self,
        clock: &PlayClock,
        previous: Version,
    ) -> Result<PlayClock, PlayClockRepositoryError> {
        let mut tables = self.store.lock();
        let Some(slot) = tables.playclocks.get_mut(&clock.id()) else {
            return Err(PlayClockRepositoryError::not_found(clock.id()));
        };
        if slot.version() != previous {
            return Err(PlayClockRepositoryError::version_mismatch(
                previous.get(),
                slot.version().get(),
            ));
        }
        *slot = clock.clone();
        Ok(clock.clone())
    }

    async fn delete(&self, id: i32) -> Result<Option<PlayClock>, PlayClockRepositoryError> {
        Ok(self.store.lock().playclocks.remove(&id))
    }
}
