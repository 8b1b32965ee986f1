//! PostgreSQL-backed `PlayClockRepository` implementation using Diesel ORM.
//!
//! Writes use the same version compare-and-swap as the game clock adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{PlayClockRepository, PlayClockRepositoryError};
use crate::domain::{ClockStatus, PlayClock, PlayClockDraft, Version};

use super::diesel_basic_error_mapping::{
    MatchConstraint, map_basic_diesel_error, map_basic_pool_error, match_constraint_violation,
};
use super::models::{NewPlayClockRow, PlayClockRow, PlayClockUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::playclock;

/// Diesel-backed implementation of the play clock repository port.
#[derive(Clone)]
pub struct DieselPlayClockRepository {
    pool: DbPool,
}

impl DieselPlayClockRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PlayClockRepositoryError {
    map_basic_pool_error(error, PlayClockRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PlayClockRepositoryError {
    map_basic_diesel_error(
        error,
        PlayClockRepositoryError::query,
        PlayClockRepositoryError::connection,
    )
}

fn map_insert_error(error: diesel::result::Error, match_id: i32) -> PlayClockRepositoryError {
    match match_constraint_violation(&error) {
        Some(MatchConstraint::UnknownMatch) => PlayClockRepositoryError::unknown_match(match_id),
        Some(MatchConstraint::Duplicate) => PlayClockRepositoryError::duplicate(match_id),
        None => map_diesel_error(error),
    }
}

fn row_to_playclock(row: PlayClockRow) -> Result<PlayClock, PlayClockRepositoryError> {
    let PlayClockRow {
        id,
        match_id,
        playclock,
        status,
        version,
    } = row;

    let version =
        Version::try_from(version).map_err(|err| PlayClockRepositoryError::query(err.to_string()))?;
    let status = status
        .parse::<ClockStatus>()
        .map_err(|err| PlayClockRepositoryError::query(err.to_string()))?;

    PlayClock::new(
        id,
        version,
        PlayClockDraft {
            match_id,
            playclock,
            status,
        },
    )
    .map_err(|err| PlayClockRepositoryError::query(err.to_string()))
}

#[async_trait]
impl PlayClockRepository for DieselPlayClockRepository {
    async fn insert(&self, draft: &PlayClockDraft) -> Result<PlayClock, PlayClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewPlayClockRow {
            match_id: draft.match_id,
            playclock: draft.playclock,
            status: draft.status.as_str(),
        };

        let row = diesel::insert_into(playclock::table)
            .values(&new_row)
            .returning(PlayClockRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, draft.match_id))?;

        row_to_playclock(row)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<PlayClock>, PlayClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        playclock::table
            .filter(playclock::id.eq(id))
            .select(PlayClockRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_playclock)
            .transpose()
    }

    async fn find_by_match(
        &self,
        match_id: i32,
    ) -> Result<Option<PlayClock>, PlayClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        playclock::table
            .filter(playclock::match_id.eq(match_id))
            .select(PlayClockRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_playclock)
            .transpose()
    }

    async fn update(
        &self,
        clock: &PlayClock,
        previous: Version,
    ) -> Result<PlayClock, PlayClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PlayClockUpdate {
            playclock: clock.playclock(),
            status: clock.status().as_str(),
            version: clock.version().to_i32(),
        };

        let updated = diesel::update(
            playclock::table
                .filter(playclock::id.eq(clock.id()))
                .filter(playclock::version.eq(previous.to_i32())),
        )
        .set(&changes)
        .returning(PlayClockRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return row_to_playclock(row);
        }

        let actual: Option<i32> = playclock::table
            .filter(playclock::id.eq(clock.id()))
            .select(playclock::version)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        debug!(id = clock.id(), expected = previous.get(), ?actual, "playclock write rejected");
        match actual {
            None => Err(PlayClockRepositoryError::not_found(clock.id())),
            Some(actual) => Err(PlayClockRepositoryError::version_mismatch(
                previous.get(),
                actual.unsigned_abs(),
            )),
        }
    }

    async fn delete(&self, id: i32) -> Result<Option<PlayClock>, PlayClockRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(playclock::table.filter(playclock::id.eq(id)))
            .returning(PlayClockRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_playclock)
            .transpose()
    }
}
