//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `LEAGUE_*` environment variables or a
//! configuration file, in that order of precedence.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::notify::DEFAULT_CHANNEL_CAPACITY;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_STATS_THROTTLE_MS: u64 = 1_000;

/// Runtime configuration for the league backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LEAGUE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; in-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Skip embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
    /// Buffered events per change channel before slow subscribers lag.
    pub channel_capacity: Option<usize>,
    /// Minimum gap between statistics notifications for one match.
    pub stats_throttle_ms: Option<u64>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn stats_throttle_interval(&self) -> Duration {
        Duration::from_millis(self.stats_throttle_ms.unwrap_or(DEFAULT_STATS_THROTTLE_MS))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 6] = [
        "LEAGUE_BIND_ADDR",
        "LEAGUE_DATABASE_URL",
        "LEAGUE_DB_MAX_CONNECTIONS",
        "LEAGUE_SKIP_MIGRATIONS",
        "LEAGUE_CHANNEL_CAPACITY",
        "LEAGUE_STATS_THROTTLE_MS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("league-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), 10);
        assert!(!settings.skip_migrations);
        assert_eq!(settings.channel_capacity(), 256);
        assert_eq!(settings.stats_throttle_interval(), Duration::from_secs(1));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("LEAGUE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "LEAGUE_DATABASE_URL",
                Some("postgres://league@localhost/league".to_owned()),
            ),
            ("LEAGUE_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("LEAGUE_SKIP_MIGRATIONS", Some("true".to_owned())),
            ("LEAGUE_CHANNEL_CAPACITY", Some("32".to_owned())),
            ("LEAGUE_STATS_THROTTLE_MS", Some("250".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert_eq!(
            settings.database_url(),
            Some("postgres://league@localhost/league")
        );
        assert_eq!(settings.db_max_connections(), 4);
        assert!(settings.skip_migrations);
        assert_eq!(settings.channel_capacity(), 32);
        assert_eq!(settings.stats_throttle_interval(), Duration::from_millis(250));
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "LEAGUE_DATABASE_URL").then(|| "  ".to_owned());
            (name, value)
        }));

        assert!(load_from_empty_args().database_url().is_none());
    }
}
