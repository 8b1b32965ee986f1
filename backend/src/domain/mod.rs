//! Domain entities, the change feed and the services behind the driving ports.
//!
//! Purpose: keep league rules (match validation, clock transitions, throttle
//! policy) and the row-change notification pipeline independent of HTTP and
//! SQL. Adapters reach this layer only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - WatchedTable, Channel, RowChange, ChangeEvent: notify function inputs
//!   and payloads.
//! - ChangeFeed, MutationTrigger: trigger registry that publishes changes.
//! - Match, Scoreboard, GameClock, PlayClock, ThrottleRecord: entities.
//! - `*ServiceImpl`: implementations of the driving ports.

pub mod change;
pub mod clock;
pub mod error;
pub mod gameclock_service;
pub mod match_service;
pub mod match_stats_throttle_service;
pub mod matches;
pub mod playclock_service;
pub mod ports;
pub mod scoreboard;
pub mod scoreboard_service;
mod service_support;
pub mod throttle;
pub mod trace_id;
pub mod trigger;

pub use self::change::{
    ChangeEvent, ChangeOperation, Channel, RowChange, UnknownChannel, WatchedTable,
};
pub use self::clock::{
    ClockError, ClockStatus, GameClock, GameClockDraft, GameClockPatch, InvalidVersion,
    PLAYCLOCK_MAX_SECONDS, PlayClock, PlayClockDraft, PlayClockPatch, Version,
};
pub use self::error::{Error, ErrorCode};
pub use self::gameclock_service::GameClockServiceImpl;
pub use self::match_service::MatchServiceImpl;
pub use self::match_stats_throttle_service::MatchStatsThrottleServiceImpl;
pub use self::matches::{
    MATCH_TITLE_MAX, Match, MatchDraft, MatchPatch, MatchValidationError, NewMatch,
};
pub use self::playclock_service::PlayClockServiceImpl;
pub use self::scoreboard::{Scoreboard, ScoreboardDraft, ScoreboardPatch, ScoreboardValidationError};
pub use self::scoreboard_service::ScoreboardServiceImpl;
pub use self::throttle::{ThrottleDecision, ThrottleRecord};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trigger::{ChangeFeed, MutationTrigger, TriggerCreation};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use league_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
