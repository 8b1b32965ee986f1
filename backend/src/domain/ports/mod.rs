//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, change notifier) are implemented by outbound
//! adapters. Driving ports (`*Service`) are implemented by domain services and
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod change_notifier;
mod gameclock_repository;
mod gameclock_service;
mod match_repository;
mod match_service;
mod match_stats_throttle_repository;
mod match_stats_throttle_service;
mod playclock_repository;
mod playclock_service;
mod scoreboard_repository;
mod scoreboard_service;

#[cfg(test)]
pub use change_notifier::{MockChangeNotifier, MockChangeSubscriber};
pub use change_notifier::{
    ChangeNotifier, ChangeSubscriber, ChangeSubscription, NoopChangeNotifier,
};
#[cfg(test)]
pub use gameclock_repository::MockGameClockRepository;
pub use gameclock_repository::{GameClockRepository, GameClockRepositoryError};
#[cfg(test)]
pub use gameclock_service::MockGameClockService;
pub use gameclock_service::GameClockService;
#[cfg(test)]
pub use match_repository::MockMatchRepository;
pub use match_repository::{MatchDeletion, MatchRepository, MatchRepositoryError};
#[cfg(test)]
pub use match_service::MockMatchService;
pub use match_service::MatchService;
#[cfg(test)]
pub use match_stats_throttle_repository::MockMatchStatsThrottleRepository;
pub use match_stats_throttle_repository::{
    MatchStatsThrottleRepository, MatchStatsThrottleRepositoryError,
};
#[cfg(test)]
pub use match_stats_throttle_service::MockMatchStatsThrottleService;
pub use match_stats_throttle_service::MatchStatsThrottleService;
#[cfg(test)]
pub use playclock_repository::MockPlayClockRepository;
pub use playclock_repository::{PlayClockRepository, PlayClockRepositoryError};
#[cfg(test)]
pub use playclock_service::MockPlayClockService;
pub use playclock_service::PlayClockService;
#[cfg(test)]
pub use scoreboard_repository::MockScoreboardRepository;
pub use scoreboard_repository::{ScoreboardRepository, ScoreboardRepositoryError};
#[cfg(test)]
pub use scoreboard_service::MockScoreboardService;
pub use scoreboard_service::ScoreboardService;
