//! Shared tables behind the in-memory repositories.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{GameClock, Match, PlayClock, Scoreboard, ThrottleRecord};

/// Serial id generator mirroring a PostgreSQL `SERIAL` column.
#[derive(Debug, Default)]
pub(super) struct Sequence {
    pub(super) last: i32,
}

/// Raised once a sequence has handed out `i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} sequence reached its maximum value")]
pub(super) struct SequenceExhausted(pub(super) &'static str);

impl Sequence {
    /// Next id; never reuses a value once the range is spent.
    pub(super) fn next_id(&mut self, table: &'static str) -> Result<i32, SequenceExhausted> {
        let next = self.last.checked_add(1).ok_or(SequenceExhausted(table))?;
        self.last = next;
        Ok(next)
    }
}

#[derive(Debug, Default)]
pub(super) struct Tables {
    pub(super) matches: BTreeMap<i32, Match>,
    pub(super) match_ids: Sequence,
    pub(super) scoreboards: BTreeMap<i32, Scoreboard>,
    pub(super) scoreboard_ids: Sequence,
    pub(super) gameclocks: BTreeMap<i32, GameClock>,
    pub(super) gameclock_ids: Sequence,
    pub(super) playclocks: BTreeMap<i32, PlayClock>,
    pub(super) playclock_ids: Sequence,
    pub(super) throttle: BTreeMap<i32, ThrottleRecord>,
}

/// Handle to one set of in-memory tables. Clones share the tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
