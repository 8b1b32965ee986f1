//! PostgreSQL-backed `GameClockRepository` implementation using Diesel ORM.
//!
//! Updates are compare-and-swap on the `version` column:
//! `UPDATE gameclock SET .. WHERE id = $1 AND version = $previous RETURNING *`.
//! When no row comes back the current version is read to tell a missing row
//! apart from a lost race.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{GameClockRepository, GameClockRepositoryError};
use crate::domain::{ClockStatus, GameClock, GameClockDraft, Version};

use super::diesel_basic_error_mapping::{
    MatchConstraint, map_basic_diesel_error, map_basic_pool_error, match_constraint_violation,
};
use super::models::{GameClockRow, GameClockUpdate, NewGameClockRow};
use super::pool::{DbPool, PoolError};
use super::schema::gameclock;

/// Diesel-backed implementation of the game clock repository port.
#[derive(Clone)]
pub struct DieselGameClockRepository {
    pool: DbPool,
}

impl DieselGameClockRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GameClockRepositoryError {
    map_basic_pool_error(error, GameClockRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GameClockRepositoryError {
    map_basic_diesel_error(
        error,
        GameClockRepositoryError::query,
        GameClockRepositoryError::connection,
    )
}

fn map_insert_error(error: diesel::result::Error, match_id: i32) -> GameClockRepositoryError {
    match match_constraint_violation(&error) {
        Some(MatchConstraint::UnknownMatch) => GameClockRepositoryError::unknown_match(match_id),
        Some(MatchConstraint::Duplicate) => GameClockRepositoryError::duplicate(match_id),
        None => map_diesel_error(error),
    }
}

fn row_to_gameclock(row: GameClockRow) -> Result<GameClock, GameClockRepositoryError> {
    let GameClockRow {
        id,
        match_id,
        gameclock,
        gameclock_max,
        status,
        started_at_ms,
        version,
    } = row;

    let version =
        Version::try_from(version).map_err(|err| GameClockRepositoryError::query(err.to_string()))?;
    let status = status
        .parse::<ClockStatus>()
        .map_err(|err| GameClockRepositoryError::query(err.to_string()))?;

    GameClock::new(
        id,
        version,
        GameClockDraft {
            match_id,
            gameclock,
            gameclock_max,
            status,
            started_at_ms,
        },
    )
    .map_err(|err| GameClockRepositoryError::query(err.to_string()))
}

#[async_trait]
impl GameClockRepository for DieselGameClockRepository {
    async fn insert(&self, draft: &GameClockDraft) -> Result<GameClock, GameClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewGameClockRow {
            match_id: draft.match_id,
            gameclock: draft.gameclock,
            gameclock_max: draft.gameclock_max,
            status: draft.status.as_str(),
            started_at_ms: draft.started_at_ms,
        };

        let row = diesel::insert_into(gameclock::table)
            .values(&new_row)
            .returning(GameClockRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, draft.match_id))?;

        row_to_gameclock(row)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<GameClock>, GameClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        gameclock::table
            .filter(gameclock::id.eq(id))
            .select(GameClockRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_gameclock)
            .transpose()
    }

    async fn find_by_match(
        &self,
        match_id: i32,
    ) -> Result<Option<GameClock>, GameClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        gameclock::table
            .filter(gameclock::match_id.eq(match_id))
            .select(GameClockRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_gameclock)
            .transpose()
    }

    async fn update(
        &self,
        clock: &GameClock,
        previous: Version,
    ) -> Result<GameClock, GameClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = GameClockUpdate {
            gameclock: clock.gameclock(),
            gameclock_max: clock.gameclock_max(),
            status: clock.status().as_str(),
            started_at_ms: clock.started_at_ms(),
            version: clock.version().to_i32(),
        };

        let updated = diesel::update(
            gameclock::table
                .filter(gameclock::id.eq(clock.id()))
                .filter(gameclock::version.eq(previous.to_i32())),
        )
        .set(&changes)
        .returning(GameClockRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return row_to_gameclock(row);
        }

        let actual: Option<i32> = gameclock::table
            .filter(gameclock::id.eq(clock.id()))
            .select(gameclock::version)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        debug!(id = clock.id(), expected = previous.get(), ?actual, "gameclock write rejected");
        match actual {
            None => Err(GameClockRepositoryError::not_found(clock.id())),
            Some(actual) => Err(GameClockRepositoryError::version_mismatch(
                previous.get(),
                actual.unsigned_abs(),
            )),
        }
    }

    async fn delete(&self, id: i32) -> Result<Option<GameClock>, GameClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(gameclock::table.filter(gameclock::id.eq(id)))
            .returning(GameClockRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_gameclock)
            .transpose()
    }
}
