//! Row-level change descriptions and the notify function.
//!
//! A [`RowChange`] is what a mutation trigger sees after a committed write to a
//! watched table. [`ChangeEvent::from_row_change`] turns it into the wire
//! payload published on the table's channel:
//!
//! ```text
//! {"table": "scoreboard", "operation": "UPDATE", "new_id": 7, "old_id": 7, "match_id": 3}
//! ```
//!
//! Deletes carry only `old_id`. Inserts report the new id as `old_id` too,
//! since there is no prior row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::error;

/// Tables whose mutations are published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchedTable {
    /// Scheduled or live matches.
    Match,
    /// Per-match score state.
    Scoreboard,
    /// Per-match game clock.
    GameClock,
    /// Per-match play clock.
    PlayClock,
}

impl WatchedTable {
    /// Every watched table, in trigger creation order.
    pub const ALL: [Self; 4] = [Self::Match, Self::Scoreboard, Self::GameClock, Self::PlayClock];

    /// Relational table name used in payloads.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Scoreboard => "scoreboard",
            Self::GameClock => "gameclock",
            Self::PlayClock => "playclock",
        }
    }

    /// Channel that carries this table's notifications.
    #[must_use]
    pub const fn channel(self) -> Channel {
        match self {
            Self::Match => Channel::MatchChange,
            Self::Scoreboard => Channel::ScoreboardChange,
            Self::GameClock => Channel::GameClockChange,
            Self::PlayClock => Channel::PlayClockChange,
        }
    }
}

impl fmt::Display for WatchedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Named publish/subscribe topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    /// `match_change`
    #[serde(rename = "match_change")]
    MatchChange,
    /// `scoreboard_change`
    #[serde(rename = "scoreboard_change")]
    ScoreboardChange,
    /// `gameclock_change`
    #[serde(rename = "gameclock_change")]
    GameClockChange,
    /// `playclock_change`
    #[serde(rename = "playclock_change")]
    PlayClockChange,
}

impl Channel {
    /// Every channel the service publishes on.
    pub const ALL: [Self; 4] = [
        Self::MatchChange,
        Self::ScoreboardChange,
        Self::GameClockChange,
        Self::PlayClockChange,
    ];

    /// Wire name of the channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MatchChange => "match_change",
            Self::ScoreboardChange => "scoreboard_change",
            Self::GameClockChange => "gameclock_change",
            Self::PlayClockChange => "playclock_change",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a channel name is not one the service publishes on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel: {name}")]
pub struct UnknownChannel {
    /// Rejected channel name.
    pub name: String,
}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| UnknownChannel { name: s.to_owned() })
    }
}

/// Row-level operation that fired a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOperation {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

impl ChangeOperation {
    /// Upper-case operation name as carried in payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed mutation of one row in a watched table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowChange {
    table: WatchedTable,
    operation: ChangeOperation,
    row_id: i32,
    match_id: Option<i32>,
}

impl RowChange {
    /// A row was inserted with id `row_id`.
    #[must_use]
    pub const fn inserted(table: WatchedTable, row_id: i32, match_id: Option<i32>) -> Self {
        Self::new(table, ChangeOperation::Insert, row_id, match_id)
    }

    /// The row `row_id` was updated.
    #[must_use]
    pub const fn updated(table: WatchedTable, row_id: i32, match_id: Option<i32>) -> Self {
        Self::new(table, ChangeOperation::Update, row_id, match_id)
    }

    /// The row `row_id` was deleted.
    #[must_use]
    pub const fn deleted(table: WatchedTable, row_id: i32, match_id: Option<i32>) -> Self {
        Self::new(table, ChangeOperation::Delete, row_id, match_id)
    }

    const fn new(
        table: WatchedTable,
        operation: ChangeOperation,
        row_id: i32,
        match_id: Option<i32>,
    ) -> Self {
        Self {
            table,
            operation,
            row_id,
            match_id,
        }
    }

    /// Table the mutated row belongs to.
    #[must_use]
    pub const fn table(&self) -> WatchedTable {
        self.table
    }

    /// Operation that produced the change.
    #[must_use]
    pub const fn operation(&self) -> ChangeOperation {
        self.operation
    }

    /// Identity of the mutated row.
    #[must_use]
    pub const fn row_id(&self) -> i32 {
        self.row_id
    }

    /// Owning match, when the row belongs to one.
    #[must_use]
    pub const fn match_id(&self) -> Option<i32> {
        self.match_id
    }
}

/// Ephemeral notification payload published on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Table name of the mutated row.
    pub table: WatchedTable,
    /// Operation that fired the trigger.
    pub operation: ChangeOperation,
    /// Id of the row after the mutation; absent for deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_id: Option<i32>,
    /// Id of the row before the mutation (equals `new_id` for inserts).
    pub old_id: i32,
    /// Owning match for per-match rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<i32>,
}

impl ChangeEvent {
    /// Build the payload for a trigger invocation.
    ///
    /// # Examples
    /// ```
    /// use league_backend::domain::{ChangeEvent, ChangeOperation, RowChange, WatchedTable};
    ///
    /// let event = ChangeEvent::from_row_change(&RowChange::deleted(WatchedTable::Scoreboard, 9, Some(2)));
    /// assert_eq!(event.operation, ChangeOperation::Delete);
    /// assert_eq!(event.old_id, 9);
    /// assert!(event.new_id.is_none());
    /// ```
    #[must_use]
    pub fn from_row_change(change: &RowChange) -> Self {
        let new_id = match change.operation() {
            ChangeOperation::Insert | ChangeOperation::Update => Some(change.row_id()),
            ChangeOperation::Delete => None,
        };
        Self {
            table: change.table(),
            operation: change.operation(),
            new_id,
            old_id: change.row_id(),
            match_id: change.match_id(),
        }
    }

    /// Serialise the payload to JSON text.
    ///
    /// Payload size is not checked. Serialisation of this shape cannot fail in
    /// practice; if it ever does, the failure is logged and `{}` is returned so
    /// publishing never surfaces an error to the writer.
    #[must_use]
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            error!(error = %err, table = %self.table, "failed to encode change payload");
            "{}".to_owned()
        })
    }
}
