//! In-process adapters for every repository port.
//!
//! All repositories built from one [`MemoryStore`] share the same tables, so
//! the match foreign keys and cascade behave as they do in PostgreSQL: serial
//! ids from 1, one scoreboard and clock per match, versioned clock writes and
//! last-write-wins throttle entries. They back deployments without a
//! `database_url` and the integration tests.

mod clock_repositories;
mod match_repository;
mod scoreboard_repository;
mod store;
mod throttle_repository;

pub use clock_repositories::{InMemoryGameClockRepository, InMemoryPlayClockRepository};
pub use match_repository::InMemoryMatchRepository;
pub use scoreboard_repository::InMemoryScoreboardRepository;
pub use store::MemoryStore;
pub use throttle_repository::InMemoryMatchStatsThrottleRepository;
