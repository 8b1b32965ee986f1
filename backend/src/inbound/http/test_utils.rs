//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{
    MockGameClockService, MockMatchService, MockMatchStatsThrottleService, MockPlayClockService,
    MockScoreboardService,
};
use crate::inbound::http::state::HttpState;

/// One mock per driving port; set expectations then call [`Self::into_state`].
#[derive(Default)]
pub struct MockServices {
    pub matches: MockMatchService,
    pub scoreboards: MockScoreboardService,
    pub gameclocks: MockGameClockService,
    pub playclocks: MockPlayClockService,
    pub stats_throttle: MockMatchStatsThrottleService,
}

impl MockServices {
    pub fn into_state(self) -> HttpState {
        HttpState {
            matches: Arc::new(self.matches),
            scoreboards: Arc::new(self.scoreboards),
            gameclocks: Arc::new(self.gameclocks),
            playclocks: Arc::new(self.playclocks),
            stats_throttle: Arc::new(self.stats_throttle),
        }
    }
}

/// App serving the full `/api/v1` scope over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(super::configure)
}
