//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see the driving ports, so
//! they stay testable with mocks and without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    GameClockService, MatchService, MatchStatsThrottleService, PlayClockService, ScoreboardService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub matches: Arc<dyn MatchService>,
    pub scoreboards: Arc<dyn ScoreboardService>,
    pub gameclocks: Arc<dyn GameClockService>,
    pub playclocks: Arc<dyn PlayClockService>,
    pub stats_throttle: Arc<dyn MatchStatsThrottleService>,
}
