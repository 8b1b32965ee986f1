//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod error;
pub mod gameclocks;
pub mod health;
pub mod matches;
pub mod playclocks;
pub mod schemas;
pub mod scoreboards;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod throttle;
pub mod validation;

pub use error::ApiResult;

/// Register the `/api/v1` scope with its extractor configuration.
///
/// Callers supply [`state::HttpState`] as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(error::json_config())
            .app_data(error::path_config())
            .app_data(error::query_config())
            .service(matches::create_match)
            .service(matches::get_match)
            .service(matches::update_match)
            .service(matches::delete_match)
            .service(scoreboards::create_scoreboard)
            .service(scoreboards::get_scoreboard)
            .service(scoreboards::update_scoreboard)
            .service(scoreboards::delete_scoreboard)
            .service(scoreboards::get_match_scoreboard)
            .service(gameclocks::create_gameclock)
            .service(gameclocks::get_gameclock)
            .service(gameclocks::update_gameclock)
            .service(gameclocks::delete_gameclock)
            .service(gameclocks::start_gameclock)
            .service(gameclocks::pause_gameclock)
            .service(gameclocks::reset_gameclock)
            .service(gameclocks::get_match_gameclock)
            .service(playclocks::create_playclock)
            .service(playclocks::get_playclock)
            .service(playclocks::update_playclock)
            .service(playclocks::delete_playclock)
            .service(playclocks::start_playclock)
            .service(playclocks::stop_playclock)
            .service(playclocks::get_match_playclock)
            .service(throttle::get_stats_throttle)
            .service(throttle::touch_stats_throttle)
            .service(throttle::acquire_stats_throttle)
            .service(throttle::clear_stats_throttle),
    );
}
