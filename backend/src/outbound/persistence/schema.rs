//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. `match` is a
//! reserved word in Rust, so the match table is exposed as `sport_match`.

diesel::table! {
    /// Scheduled or live matches.
    #[sql_name = "match"]
    sport_match (id) {
        id -> Int4,
        tournament_id -> Int4,
        team_a_id -> Int4,
        team_b_id -> Int4,
        /// Trimmed title, 1 to 128 characters.
        title -> Varchar,
        week -> Int4,
        match_date -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// One scoreboard per match; removed with its match.
    scoreboard (id) {
        id -> Int4,
        match_id -> Int4,
        score_team_a -> Int4,
        score_team_b -> Int4,
        period -> Int4,
        is_flag -> Bool,
    }
}

diesel::table! {
    /// Countdown game clock, versioned for optimistic concurrency.
    gameclock (id) {
        id -> Int4,
        match_id -> Int4,
        /// Seconds remaining.
        #[sql_name = "gameclock"]
        gameclock_seconds -> Int4,
        gameclock_max -> Int4,
        /// One of `stopped`, `running`, `paused`.
        status -> Varchar,
        /// Epoch milliseconds of the current run's start.
        started_at_ms -> Nullable<Int8>,
        /// Starts at 1 and grows by one per state change.
        version -> Int4,
    }
}

diesel::table! {
    /// Play clock, versioned like the game clock.
    playclock (id) {
        id -> Int4,
        match_id -> Int4,
        #[sql_name = "playclock"]
        playclock_seconds -> Nullable<Int4>,
        status -> Varchar,
        version -> Int4,
    }
}

diesel::table! {
    /// Last derived-statistics notification per match.
    match_stats_throttle (match_id) {
        match_id -> Int4,
        /// Defaults to the insert time.
        last_notified_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    sport_match,
    scoreboard,
    gameclock,
    playclock,
    match_stats_throttle,
);
