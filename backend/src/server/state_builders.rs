//! Builders wiring repositories, the change feed and services into adapter
//! state.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tracing::info;

use league_backend::domain::ports::{
    ChangeNotifier, GameClockRepository, MatchRepository, MatchStatsThrottleRepository,
    PlayClockRepository, ScoreboardRepository,
};
use league_backend::domain::{
    ChangeFeed, GameClockServiceImpl, MatchServiceImpl, MatchStatsThrottleServiceImpl,
    PlayClockServiceImpl, ScoreboardServiceImpl,
};
use league_backend::inbound::http::state::HttpState;
use league_backend::inbound::ws::state::WsState;
use league_backend::outbound::memory::{
    InMemoryGameClockRepository, InMemoryMatchRepository, InMemoryMatchStatsThrottleRepository,
    InMemoryPlayClockRepository, InMemoryScoreboardRepository, MemoryStore,
};
use league_backend::outbound::notify::BroadcastChangeBus;
use league_backend::outbound::persistence::{
    DbPool, DieselGameClockRepository, DieselMatchRepository, DieselMatchStatsThrottleRepository,
    DieselPlayClockRepository, DieselScoreboardRepository,
};

use super::ServerConfig;

/// Adapter state shared by every worker.
#[derive(Clone)]
pub(crate) struct AppStates {
    pub(crate) http: HttpState,
    pub(crate) ws: WsState,
}

/// One repository per driven port.
struct Repositories<M, S, G, P, T> {
    matches: Arc<M>,
    scoreboards: Arc<S>,
    gameclocks: Arc<G>,
    playclocks: Arc<P>,
    throttle: Arc<T>,
}

impl
    Repositories<
        DieselMatchRepository,
        DieselScoreboardRepository,
        DieselGameClockRepository,
        DieselPlayClockRepository,
        DieselMatchStatsThrottleRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            matches: Arc::new(DieselMatchRepository::new(pool.clone())),
            scoreboards: Arc::new(DieselScoreboardRepository::new(pool.clone())),
            gameclocks: Arc::new(DieselGameClockRepository::new(pool.clone())),
            playclocks: Arc::new(DieselPlayClockRepository::new(pool.clone())),
            throttle: Arc::new(DieselMatchStatsThrottleRepository::new(pool.clone())),
        }
    }
}

impl
    Repositories<
        InMemoryMatchRepository,
        InMemoryScoreboardRepository,
        InMemoryGameClockRepository,
        InMemoryPlayClockRepository,
        InMemoryMatchStatsThrottleRepository,
    >
{
    fn memory(clock: Arc<dyn Clock>) -> Self {
        let store = MemoryStore::new();
        Self {
            matches: Arc::new(InMemoryMatchRepository::new(store.clone())),
            scoreboards: Arc::new(InMemoryScoreboardRepository::new(store.clone())),
            gameclocks: Arc::new(InMemoryGameClockRepository::new(store.clone())),
            playclocks: Arc::new(InMemoryPlayClockRepository::new(store.clone())),
            throttle: Arc::new(InMemoryMatchStatsThrottleRepository::new(store, clock)),
        }
    }
}

impl<M, S, G, P, T> Repositories<M, S, G, P, T>
where
    M: MatchRepository + 'static,
    S: ScoreboardRepository + 'static,
    G: GameClockRepository + 'static,
    P: PlayClockRepository + 'static,
    T: MatchStatsThrottleRepository + 'static,
{
    fn into_http_state(
        self,
        feed: Arc<ChangeFeed>,
        clock: Arc<dyn Clock>,
        stats_throttle: Duration,
    ) -> HttpState {
        HttpState {
            matches: Arc::new(MatchServiceImpl::new(self.matches.clone(), feed.clone())),
            scoreboards: Arc::new(ScoreboardServiceImpl::new(
                self.scoreboards,
                self.matches.clone(),
                feed.clone(),
            )),
            gameclocks: Arc::new(GameClockServiceImpl::new(
                self.gameclocks,
                self.matches.clone(),
                feed.clone(),
                clock.clone(),
            )),
            playclocks: Arc::new(PlayClockServiceImpl::new(self.playclocks, self.matches, feed)),
            stats_throttle: Arc::new(MatchStatsThrottleServiceImpl::new(
                self.throttle,
                clock,
                stats_throttle,
            )),
        }
    }
}

/// Notifier handed to the feed, counted when metrics are configured.
#[cfg(feature = "metrics")]
fn publishing_notifier(
    config: &ServerConfig,
    bus: Arc<BroadcastChangeBus>,
) -> Arc<dyn ChangeNotifier> {
    match &config.change_counter {
        Some(counter) => Arc::new(super::metrics::CountingNotifier::new(bus, counter.clone())),
        None => bus,
    }
}

#[cfg(not(feature = "metrics"))]
fn publishing_notifier(
    _config: &ServerConfig,
    bus: Arc<BroadcastChangeBus>,
) -> Arc<dyn ChangeNotifier> {
    bus
}

/// Build HTTP and WebSocket state from configuration.
///
/// Uses Diesel repositories when a pool is configured and in-memory ones
/// otherwise. Both share one broadcast bus so WebSocket subscribers see every
/// change committed through the REST API.
pub(crate) fn build_app_states(config: &ServerConfig) -> AppStates {
    let bus = Arc::new(BroadcastChangeBus::new(config.channel_capacity));
    let feed = Arc::new(ChangeFeed::with_default_triggers(publishing_notifier(
        config,
        bus.clone(),
    )));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let http = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            Repositories::diesel(pool).into_http_state(feed, clock, config.stats_throttle)
        }
        None => {
            info!("no database configured; using in-memory repositories");
            Repositories::memory(clock.clone()).into_http_state(feed, clock, config.stats_throttle)
        }
    };

    AppStates {
        http,
        ws: WsState::new(bus),
    }
}
