//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
pub(crate) mod metrics;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::{AppStates, build_app_states};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use league_backend::Trace;
#[cfg(debug_assertions)]
use league_backend::doc::ApiDoc;
use league_backend::inbound::http;
use league_backend::inbound::http::health::{HealthState, live, ready};
use league_backend::inbound::ws;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    states: AppStates,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(web::Data::new(states.http))
        .app_data(web::Data::new(states.ws))
        .wrap(Trace)
        .configure(http::configure)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let states = build_app_states(&config);
    let server_health_state = health_state.clone();
    info!(bind_addr = config.bind_addr(), "starting HTTP server");

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(config.prometheus.clone());

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), states.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
