//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use super::schema::{gameclock, match_stats_throttle, playclock, scoreboard, sport_match};

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sport_match)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MatchRow {
    pub id: i32,
    pub tournament_id: i32,
    pub team_a_id: i32,
    pub team_b_id: i32,
    pub title: String,
    pub week: i32,
    pub match_date: Option<DateTime<Utc>>,
}

/// Insertable and changeset form of a match; the id is assigned by the store.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = sport_match)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MatchValues<'a> {
    pub tournament_id: i32,
    pub team_a_id: i32,
    pub team_b_id: i32,
    pub title: &'a str,
    pub week: i32,
    pub match_date: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scoreboard)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScoreboardRow {
    pub id: i32,
    pub match_id: i32,
    pub score_team_a: i32,
    pub score_team_b: i32,
    pub period: i32,
    pub is_flag: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scoreboard)]
pub(crate) struct NewScoreboardRow {
    pub match_id: i32,
    pub score_team_a: i32,
    pub score_team_b: i32,
    pub period: i32,
    pub is_flag: bool,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = scoreboard)]
pub(crate) struct ScoreboardUpdate {
    pub score_team_a: i32,
    pub score_team_b: i32,
    pub period: i32,
    pub is_flag: bool,
}

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = gameclock)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameClockRow {
    pub id: i32,
    pub match_id: i32,
    #[diesel(column_name = gameclock_seconds)]
    pub gameclock: i32,
    pub gameclock_max: i32,
    pub status: String,
    pub started_at_ms: Option<i64>,
    pub version: i32,
}

/// Insert form; `version` is left to the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = gameclock)]
pub(crate) struct NewGameClockRow<'a> {
    pub match_id: i32,
    #[diesel(column_name = gameclock_seconds)]
    pub gameclock: i32,
    pub gameclock_max: i32,
    pub status: &'a str,
    pub started_at_ms: Option<i64>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = gameclock)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct GameClockUpdate<'a> {
    #[diesel(column_name = gameclock_seconds)]
    pub gameclock: i32,
    pub gameclock_max: i32,
    pub status: &'a str,
    pub started_at_ms: Option<i64>,
    pub version: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = playclock)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlayClockRow {
    pub id: i32,
    pub match_id: i32,
    #[diesel(column_name = playclock_seconds)]
    pub playclock: Option<i32>,
    pub status: String,
    pub version: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = playclock)]
pub(crate) struct NewPlayClockRow<'a> {
    pub match_id: i32,
    #[diesel(column_name = playclock_seconds)]
    pub playclock: Option<i32>,
    pub status: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = playclock)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PlayClockUpdate<'a> {
    #[diesel(column_name = playclock_seconds)]
    pub playclock: Option<i32>,
    pub status: &'a str,
    pub version: i32,
}

// ---------------------------------------------------------------------------
// Match stats throttle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = match_stats_throttle)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ThrottleRow {
    pub match_id: i32,
    pub last_notified_at: NaiveDateTime,
}

/// `None` leaves `last_notified_at` to the column default (`NOW()`).
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = match_stats_throttle)]
pub(crate) struct NewThrottleRow {
    pub match_id: i32,
    pub last_notified_at: Option<NaiveDateTime>,
}
