//! HTTP server configuration object and helpers.

use std::time::Duration;

use league_backend::outbound::notify::DEFAULT_CHANNEL_CAPACITY;
use league_backend::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
#[cfg(feature = "metrics")]
use prometheus::IntCounterVec;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) channel_capacity: usize,
    pub(crate) stats_throttle: Duration,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
    #[cfg(feature = "metrics")]
    pub(crate) change_counter: Option<IntCounterVec>,
}

impl ServerConfig {
    /// Configuration with in-memory storage bound to `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            db_pool: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            stats_throttle: Duration::from_secs(1),
            #[cfg(feature = "metrics")]
            prometheus: None,
            #[cfg(feature = "metrics")]
            change_counter: None,
        }
    }

    /// Attach a database connection pool; repositories become Diesel-backed.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_stats_throttle(mut self, interval: Duration) -> Self {
        self.stats_throttle = interval;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware and the published-change counter.
    #[must_use]
    pub fn with_metrics(
        mut self,
        prometheus: Option<PrometheusMetrics>,
        change_counter: Option<IntCounterVec>,
    ) -> Self {
        self.prometheus = prometheus;
        self.change_counter = change_counter;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
}
