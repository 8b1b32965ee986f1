//! Backend entry-point: loads settings, prepares storage and serves the REST
//! API, the change relay and OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
#[cfg(feature = "metrics")]
use prometheus::Registry;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use league_backend::inbound::http::health::HealthState;
use league_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use league_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let config = ServerConfig::new(settings.bind_addr())
        .with_channel_capacity(settings.channel_capacity())
        .with_stats_throttle(settings.stats_throttle_interval());
    let config = match settings.database_url() {
        Some(url) => config.with_db_pool(prepare_database(&settings, url).await?),
        None => config,
    };

    #[cfg(feature = "metrics")]
    let config = {
        let registry = Registry::new();
        let change_counter = initialize_metrics(|| server::metrics::change_event_counter(&registry));
        let prometheus = initialize_metrics(|| make_metrics(registry.clone()));
        config.with_metrics(prometheus, change_counter)
    };

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated with an error")
}

/// Apply migrations unless skipped, then open the connection pool.
async fn prepare_database(settings: &AppSettings, url: &str) -> Result<DbPool> {
    if settings.skip_migrations {
        info!("skipping database migrations");
    } else {
        let applied = run_pending_migrations(url)
            .await
            .wrap_err("failed to apply database migrations")?;
        info!(count = applied.len(), "database migrations applied");
    }
    let pool_config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
    DbPool::new(pool_config)
        .await
        .wrap_err("failed to create database pool")
}

#[cfg(feature = "metrics")]
fn make_metrics(registry: Registry) -> Result<PrometheusMetrics, Box<dyn std::error::Error + Send + Sync>> {
    PrometheusMetricsBuilder::new("league")
        .registry(registry)
        .endpoint("/metrics")
        .build()
}

/// Run a metrics constructor, logging and discarding failures.
#[cfg(feature = "metrics")]
fn initialize_metrics<T, E, F>(make: F) -> Option<T>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: std::fmt::Display,
{
    match make() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(error = %error, "metrics initialisation failed; continuing without");
            None
        }
    }
}
