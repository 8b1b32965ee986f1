//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations are thin: they translate between internal
//! Diesel rows (`models.rs`, `schema.rs`) and validated domain types, and map
//! every database failure onto the port's error enum. Connections come from a
//! `bb8` pool of `diesel-async` connections.
//!
//! # Example
//!
//! ```ignore
//! use league_backend::outbound::persistence::{DbPool, DieselMatchRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/league")).await?;
//! let matches = DieselMatchRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_gameclock_repository;
mod diesel_match_repository;
mod diesel_match_stats_throttle_repository;
mod diesel_playclock_repository;
mod diesel_scoreboard_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_gameclock_repository::DieselGameClockRepository;
pub use diesel_match_repository::DieselMatchRepository;
pub use diesel_match_stats_throttle_repository::DieselMatchStatsThrottleRepository;
pub use diesel_playclock_repository::DieselPlayClockRepository;
pub use diesel_scoreboard_repository::DieselScoreboardRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
