//! Game and play clocks with optimistic-concurrency versions.
//!
//! Every state change produces a new value whose [`Version`] is one higher
//! than the one it was derived from. Repositories only persist that value if
//! the stored row still carries the previous version, so two operators
//! pressing "start" at once cannot both win.
//!
//! Game clocks count down in whole seconds. While running, the stored
//! `gameclock` is the value at `started_at_ms`; consumers derive the live value
//! with [`GameClock::remaining_at`] instead of polling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Longest play clock accepted by [`PlayClock::start`], in seconds.
pub const PLAYCLOCK_MAX_SECONDS: i32 = 300;

/// Monotonic row version, starting at [`Version::INITIAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Version(u32);

impl Version {
    /// Version of a freshly inserted row.
    pub const INITIAL: Self = Self(1);
    /// Largest version the store can hold.
    pub const MAX: Self = Self(i32::MAX.unsigned_abs());

    /// Wrap `value` when it lies in `1..=MAX`.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value >= Self::INITIAL.0 && value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Following version; saturates at [`Version::MAX`].
    ///
    /// # Examples
    /// ```
    /// use league_backend::domain::Version;
    ///
    /// assert_eq!(Version::INITIAL.next().get(), 2);
    /// assert_eq!(Version::MAX.next(), Version::MAX);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        if self.0 >= Self::MAX.0 {
            Self::MAX
        } else {
            Self(self.0 + 1)
        }
    }

    /// Raw version number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Column representation.
    #[must_use]
    pub fn to_i32(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a stored or submitted version is outside `1..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("version {value} is out of range")]
pub struct InvalidVersion {
    /// Rejected value.
    pub value: i64,
}

impl TryFrom<u32> for Version {
    type Error = InvalidVersion;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidVersion {
            value: i64::from(value),
        })
    }
}

impl TryFrom<i32> for Version {
    type Error = InvalidVersion;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(InvalidVersion {
                value: i64::from(value),
            })
    }
}

impl From<Version> for u32 {
    fn from(value: Version) -> Self {
        value.0
    }
}

/// Run state shared by both clock kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockStatus {
    /// Idle at its stored value.
    #[default]
    Stopped,
    /// Counting down since `started_at_ms`.
    Running,
    /// Frozen mid-run.
    Paused,
}

impl ClockStatus {
    /// Column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for ClockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClockStatus {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopped" => Ok(Self::Stopped),
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            other => Err(ClockError::UnknownStatus {
                status: other.to_owned(),
            }),
        }
    }
}

/// Validation and transition failures for clocks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Status text is not one of `stopped`, `running`, `paused`.
    #[error("unknown clock status: {status}")]
    UnknownStatus {
        /// Rejected text.
        status: String,
    },
    /// `gameclock_max` is zero or negative.
    #[error("gameclock_max must be greater than zero")]
    NonPositiveMax,
    /// Remaining seconds fall outside `0..=max`.
    #[error("gameclock {value} must lie between 0 and {max}")]
    GameClockOutOfRange {
        /// Rejected remaining seconds.
        value: i32,
        /// Configured duration.
        max: i32,
    },
    /// Start timestamp before the Unix epoch.
    #[error("started_at_ms must not be negative")]
    NegativeStart,
    /// A running game clock has no start timestamp.
    #[error("a running gameclock needs started_at_ms")]
    MissingStart,
    /// A stopped or paused game clock carries a start timestamp.
    #[error("started_at_ms is only kept while the gameclock runs")]
    StartWhileIdle,
    /// Play clock seconds outside the accepted range.
    #[error("playclock {seconds} must lie between 1 and {max}")]
    PlayClockOutOfRange {
        /// Rejected seconds.
        seconds: i32,
        /// Upper bound.
        max: i32,
    },
    /// Start requested on a running clock.
    #[error("clock is already running")]
    AlreadyRunning,
    /// Pause requested on a clock that is not running.
    #[error("clock is not running")]
    NotRunning,
}

/// Unvalidated game clock fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClockDraft {
    /// Owning match.
    pub match_id: i32,
    /// Seconds remaining.
    pub gameclock: i32,
    /// Full duration in seconds.
    pub gameclock_max: i32,
    /// Run state.
    pub status: ClockStatus,
    /// Epoch milliseconds of the current run's start; set only while running.
    pub started_at_ms: Option<i64>,
}

impl GameClockDraft {
    /// Stopped clock for `match_id` showing its full duration.
    pub fn full(match_id: i32, gameclock_max: i32) -> Self {
        Self {
            match_id,
            gameclock: gameclock_max,
            gameclock_max,
            status: ClockStatus::Stopped,
            started_at_ms: None,
        }
    }

    /// Check field invariants.
    pub fn validate(&self) -> Result<(), ClockError> {
        if self.gameclock_max <= 0 {
            return Err(ClockError::NonPositiveMax);
        }
        if !(0..=self.gameclock_max).contains(&self.gameclock) {
            return Err(ClockError::GameClockOutOfRange {
                value: self.gameclock,
                max: self.gameclock_max,
            });
        }
        match (self.status, self.started_at_ms) {
            (_, Some(ms)) if ms < 0 => Err(ClockError::NegativeStart),
            (ClockStatus::Running, None) => Err(ClockError::MissingStart),
            (ClockStatus::Stopped | ClockStatus::Paused, Some(_)) => {
                Err(ClockError::StartWhileIdle)
            }
            _ => Ok(()),
        }
    }
}

/// Partial update of a game clock.
///
/// Switching to `running` without `started_at_ms` starts the run at the
/// time of the update; switching away from `running` clears the start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameClockPatch {
    /// New remaining seconds.
    pub gameclock: Option<i32>,
    /// New full duration.
    pub gameclock_max: Option<i32>,
    /// New run state.
    pub status: Option<ClockStatus>,
    /// Explicit run start; only valid for a running result.
    pub started_at_ms: Option<i64>,
}

/// A persisted game clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    id: i32,
    version: Version,
    fields: GameClockDraft,
}

impl GameClock {
    /// Build a game clock from validated fields.
    pub fn new(id: i32, version: Version, draft: GameClockDraft) -> Result<Self, ClockError> {
        draft.validate()?;
        Ok(Self {
            id,
            version,
            fields: draft,
        })
    }

    /// Row id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Current row version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Owning match.
    pub fn match_id(&self) -> i32 {
        self.fields.match_id
    }

    /// Seconds remaining as stored (at `started_at_ms` when running).
    pub fn gameclock(&self) -> i32 {
        self.fields.gameclock
    }

    /// Full duration in seconds.
    pub fn gameclock_max(&self) -> i32 {
        self.fields.gameclock_max
    }

    /// Run state.
    pub fn status(&self) -> ClockStatus {
        self.fields.status
    }

    /// Epoch milliseconds at which the current run began.
    pub fn started_at_ms(&self) -> Option<i64> {
        self.fields.started_at_ms
    }

    /// Seconds remaining at `now_ms`.
    ///
    /// # Examples
    /// ```
    /// use league_backend::domain::{GameClock, GameClockDraft, Version};
    ///
    /// let clock = GameClock::new(1, Version::INITIAL, GameClockDraft::full(3, 600))
    ///     .expect("valid clock")
    ///     .start(10_000)
    ///     .expect("stopped clock starts");
    /// assert_eq!(clock.remaining_at(25_500), 585);
    /// ```
    pub fn remaining_at(&self, now_ms: i64) -> i32 {
        match (self.fields.status, self.fields.started_at_ms) {
            (ClockStatus::Running, Some(started_at_ms)) => {
                let elapsed = elapsed_seconds(started_at_ms, now_ms);
                clamp_remaining(i64::from(self.fields.gameclock) - elapsed)
            }
            _ => self.fields.gameclock,
        }
    }

    /// Start counting down from `now_ms`.
    pub fn start(&self, now_ms: i64) -> Result<Self, ClockError> {
        if self.fields.status == ClockStatus::Running {
            return Err(ClockError::AlreadyRunning);
        }
        if now_ms < 0 {
            return Err(ClockError::NegativeStart);
        }
        Ok(self.advance(GameClockDraft {
            status: ClockStatus::Running,
            started_at_ms: Some(now_ms),
            ..self.fields.clone()
        }))
    }

    /// Freeze the clock, banking the whole seconds elapsed since the start.
    pub fn pause(&self, now_ms: i64) -> Result<Self, ClockError> {
        if self.fields.status != ClockStatus::Running {
            return Err(ClockError::NotRunning);
        }
        Ok(self.advance(GameClockDraft {
            gameclock: self.remaining_at(now_ms),
            status: ClockStatus::Paused,
            started_at_ms: None,
            ..self.fields.clone()
        }))
    }

    /// Stop the clock and restore the full duration.
    pub fn reset(&self) -> Self {
        self.advance(GameClockDraft::full(
            self.fields.match_id,
            self.fields.gameclock_max,
        ))
    }

    /// Apply `patch` at `now_ms` as one versioned state change.
    ///
    /// # Examples
    /// ```
    /// use league_backend::domain::{
    ///     ClockStatus, GameClock, GameClockDraft, GameClockPatch, Version,
    /// };
    ///
    /// let clock = GameClock::new(1, Version::INITIAL, GameClockDraft::full(3, 600))
    ///     .expect("valid clock");
    /// let running = clock
    ///     .with_patch(
    ///         GameClockPatch { status: Some(ClockStatus::Running), ..GameClockPatch::default() },
    ///         5_000,
    ///     )
    ///     .expect("valid patch");
    /// assert_eq!(running.started_at_ms(), Some(5_000));
    /// ```
    pub fn with_patch(&self, patch: GameClockPatch, now_ms: i64) -> Result<Self, ClockError> {
        let current = &self.fields;
        let status = patch.status.unwrap_or(current.status);
        let started_at_ms = match status {
            ClockStatus::Running => patch
                .started_at_ms
                .or(current.started_at_ms)
                .or(Some(now_ms)),
            ClockStatus::Stopped | ClockStatus::Paused => patch.started_at_ms,
        };
        let draft = GameClockDraft {
            match_id: current.match_id,
            gameclock: patch.gameclock.unwrap_or(current.gameclock),
            gameclock_max: patch.gameclock_max.unwrap_or(current.gameclock_max),
            status,
            started_at_ms,
        };
        draft.validate()?;
        Ok(self.advance(draft))
    }

    fn advance(&self, fields: GameClockDraft) -> Self {
        Self {
            id: self.id,
            version: self.version.next(),
            fields,
        }
    }
}

fn elapsed_seconds(started_at_ms: i64, now_ms: i64) -> i64 {
    now_ms.saturating_sub(started_at_ms).max(0) / 1000
}

fn clamp_remaining(seconds: i64) -> i32 {
    i32::try_from(seconds.max(0)).unwrap_or(i32::MAX)
}

/// Unvalidated play clock fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayClockDraft {
    /// Owning match.
    pub match_id: i32,
    /// Seconds on the clock; blank while stopped.
    pub playclock: Option<i32>,
    /// Run state.
    pub status: ClockStatus,
}

impl PlayClockDraft {
    /// Check field invariants.
    pub fn validate(&self) -> Result<(), ClockError> {
        match self.playclock {
            Some(seconds) if !(0..=PLAYCLOCK_MAX_SECONDS).contains(&seconds) => {
                Err(ClockError::PlayClockOutOfRange {
                    seconds,
                    max: PLAYCLOCK_MAX_SECONDS,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Partial update of a play clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayClockPatch {
    /// New seconds value.
    pub playclock: Option<i32>,
    /// New run state.
    pub status: Option<ClockStatus>,
}

/// A persisted play clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayClock {
    id: i32,
    version: Version,
    fields: PlayClockDraft,
}

impl PlayClock {
    /// Build a play clock from validated fields.
    pub fn new(id: i32, version: Version, draft: PlayClockDraft) -> Result<Self, ClockError> {
        draft.validate()?;
        Ok(Self {
            id,
            version,
            fields: draft,
        })
    }

    /// Row id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Current row version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Owning match.
    pub fn match_id(&self) -> i32 {
        self.fields.match_id
    }

    /// Seconds on the clock, if set.
    pub fn playclock(&self) -> Option<i32> {
        self.fields.playclock
    }

    /// Run state.
    pub fn status(&self) -> ClockStatus {
        self.fields.status
    }

    /// Run the play clock for `seconds` (1 to [`PLAYCLOCK_MAX_SECONDS`]).
    pub fn start(&self, seconds: i32) -> Result<Self, ClockError> {
        if !(1..=PLAYCLOCK_MAX_SECONDS).contains(&seconds) {
            return Err(ClockError::PlayClockOutOfRange {
                seconds,
                max: PLAYCLOCK_MAX_SECONDS,
            });
        }
        Ok(self.advance(PlayClockDraft {
            match_id: self.fields.match_id,
            playclock: Some(seconds),
            status: ClockStatus::Running,
        }))
    }

    /// Stop and blank the play clock.
    pub fn stop(&self) -> Self {
        self.advance(PlayClockDraft {
            match_id: self.fields.match_id,
            playclock: None,
            status: ClockStatus::Stopped,
        })
    }

    /// Apply `patch` as one versioned state change.
    pub fn with_patch(&self, patch: PlayClockPatch) -> Result<Self, ClockError> {
        let draft = PlayClockDraft {
            match_id: self.fields.match_id,
            playclock: patch.playclock.or(self.fields.playclock),
            status: patch.status.unwrap_or(self.fields.status),
        };
        draft.validate()?;
        Ok(self.advance(draft))
    }

    fn advance(&self, fields: PlayClockDraft) -> Self {
        Self {
            id: self.id,
            version: self.version.next(),
            fields,
        }
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
