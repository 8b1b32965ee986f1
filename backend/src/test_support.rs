//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via the
//! `test-support` feature).

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::ChangeNotifier;
use crate::domain::{
    ChangeEvent, ChangeFeed, Channel, GameClockServiceImpl, MatchServiceImpl,
    MatchStatsThrottleServiceImpl, PlayClockServiceImpl, ScoreboardServiceImpl,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::ws::state::WsState;
use crate::outbound::memory::{
    InMemoryGameClockRepository, InMemoryMatchRepository, InMemoryMatchStatsThrottleRepository,
    InMemoryPlayClockRepository, InMemoryScoreboardRepository, MemoryStore,
};
use crate::outbound::notify::BroadcastChangeBus;

/// Notifier that keeps every published event in order.
#[derive(Debug, Default)]
pub struct RecordingChangeNotifier {
    events: Mutex<Vec<(Channel, ChangeEvent)>>,
}

impl RecordingChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far.
    pub fn events(&self) -> Vec<(Channel, ChangeEvent)> {
        self.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<(Channel, ChangeEvent)> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Channel, ChangeEvent)>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ChangeNotifier for RecordingChangeNotifier {
    fn publish(&self, channel: Channel, event: &ChangeEvent) {
        self.lock().push((channel, event.clone()));
    }
}

/// Change feed with the default triggers wired to a fresh recorder.
pub fn recording_feed() -> (Arc<RecordingChangeNotifier>, Arc<ChangeFeed>) {
    let notifier = Arc::new(RecordingChangeNotifier::new());
    let feed = Arc::new(ChangeFeed::with_default_triggers(notifier.clone()));
    (notifier, feed)
}

/// Clock frozen at a chosen instant until advanced.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock at `millis` after the Unix epoch.
    pub fn at_millis(millis: i64) -> Self {
        Self::new(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    pub fn advance_millis(&self, millis: i64) {
        *self.lock() += TimeDelta::milliseconds(millis);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock() = now;
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// Fully wired in-memory application for end-to-end tests.
pub struct MemoryApp {
    pub http: HttpState,
    pub ws: WsState,
    pub bus: Arc<BroadcastChangeBus>,
    pub clock: Arc<FixedClock>,
}

/// Wire every service over one [`MemoryStore`] and one broadcast bus, with
/// time frozen at `now_ms`.
pub fn memory_app(now_ms: i64, stats_throttle: Duration) -> MemoryApp {
    let bus = Arc::new(BroadcastChangeBus::default());
    let feed = Arc::new(ChangeFeed::with_default_triggers(bus.clone()));
    let clock = Arc::new(FixedClock::at_millis(now_ms));
    let store = MemoryStore::new();
    let matches = Arc::new(InMemoryMatchRepository::new(store.clone()));

    let http = HttpState {
        matches: Arc::new(MatchServiceImpl::new(matches.clone(), feed.clone())),
        scoreboards: Arc::new(ScoreboardServiceImpl::new(
            Arc::new(InMemoryScoreboardRepository::new(store.clone())),
            matches.clone(),
            feed.clone(),
        )),
        gameclocks: Arc::new(GameClockServiceImpl::new(
            Arc::new(InMemoryGameClockRepository::new(store.clone())),
            matches.clone(),
            feed.clone(),
            clock.clone(),
        )),
        playclocks: Arc::new(PlayClockServiceImpl::new(
            Arc::new(InMemoryPlayClockRepository::new(store.clone())),
            matches,
            feed,
        )),
        stats_throttle: Arc::new(MatchStatsThrottleServiceImpl::new(
            Arc::new(InMemoryMatchStatsThrottleRepository::new(store, clock.clone())),
            clock.clone(),
            stats_throttle,
        )),
    };

    MemoryApp {
        http,
        ws: WsState::new(bus.clone()),
        bus,
        clock,
    }
}
