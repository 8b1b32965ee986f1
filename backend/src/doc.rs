//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path from the inbound layer together with
//! the request, response and error schemas. The generated document backs
//! Swagger UI (debug builds) and `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::gameclocks::{
    ClockTransitionRequest, CreateGameClockRequest, GameClockResponse, UpdateGameClockRequest,
};
use crate::inbound::http::matches::{CreateMatchRequest, MatchResponse, UpdateMatchRequest};
use crate::inbound::http::playclocks::{
    CreatePlayClockRequest, PlayClockResponse, StartPlayClockRequest, UpdatePlayClockRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::scoreboards::{
    CreateScoreboardRequest, ScoreboardResponse, UpdateScoreboardRequest,
};
use crate::inbound::http::throttle::{AcquireResponse, ThrottleResponse, TouchThrottleRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "League backend API",
        description = "Matches, scoreboards, clocks and the statistics throttle.",
        license(name = "ISC", url = "https://opensource.org/license/isc-license-txt")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::matches::create_match,
        crate::inbound::http::matches::get_match,
        crate::inbound::http::matches::update_match,
        crate::inbound::http::matches::delete_match,
        crate::inbound::http::scoreboards::create_scoreboard,
        crate::inbound::http::scoreboards::get_scoreboard,
        crate::inbound::http::scoreboards::get_match_scoreboard,
        crate::inbound::http::scoreboards::update_scoreboard,
        crate::inbound::http::scoreboards::delete_scoreboard,
        crate::inbound::http::gameclocks::create_gameclock,
        crate::inbound::http::gameclocks::get_gameclock,
        crate::inbound::http::gameclocks::get_match_gameclock,
        crate::inbound::http::gameclocks::update_gameclock,
        crate::inbound::http::gameclocks::start_gameclock,
        crate::inbound::http::gameclocks::pause_gameclock,
        crate::inbound::http::gameclocks::reset_gameclock,
        crate::inbound::http::gameclocks::delete_gameclock,
        crate::inbound::http::playclocks::create_playclock,
        crate::inbound::http::playclocks::get_playclock,
        crate::inbound::http::playclocks::get_match_playclock,
        crate::inbound::http::playclocks::update_playclock,
        crate::inbound::http::playclocks::start_playclock,
        crate::inbound::http::playclocks::stop_playclock,
        crate::inbound::http::playclocks::delete_playclock,
        crate::inbound::http::throttle::get_stats_throttle,
        crate::inbound::http::throttle::touch_stats_throttle,
        crate::inbound::http::throttle::acquire_stats_throttle,
        crate::inbound::http::throttle::clear_stats_throttle,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateMatchRequest,
        UpdateMatchRequest,
        MatchResponse,
        CreateScoreboardRequest,
        UpdateScoreboardRequest,
        ScoreboardResponse,
        CreateGameClockRequest,
        UpdateGameClockRequest,
        ClockTransitionRequest,
        GameClockResponse,
        CreatePlayClockRequest,
        UpdatePlayClockRequest,
        StartPlayClockRequest,
        PlayClockResponse,
        TouchThrottleRequest,
        ThrottleResponse,
        AcquireResponse,
    )),
    tags(
        (name = "matches", description = "Match fixtures"),
        (name = "scoreboards", description = "Live scores"),
        (name = "gameclocks", description = "Versioned game clocks"),
        (name = "playclocks", description = "Versioned play clocks"),
        (name = "stats-throttle", description = "Statistics notification throttle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
