//! PostgreSQL-backed `MatchStatsThrottleRepository` using Diesel ORM.
//!
//! `last_notified_at` is stored as a UTC `TIMESTAMP`. `touch` is a single
//! `INSERT .. ON CONFLICT (match_id) DO UPDATE`, so concurrent writers settle
//! on whichever statement commits last.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ThrottleRecord;
use crate::domain::ports::{MatchStatsThrottleRepository, MatchStatsThrottleRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewThrottleRow, ThrottleRow};
use super::pool::{DbPool, PoolError};
use super::schema::match_stats_throttle;

/// Diesel-backed implementation of the throttle repository port.
#[derive(Clone)]
pub struct DieselMatchStatsThrottleRepository {
    pool: DbPool,
}

impl DieselMatchStatsThrottleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MatchStatsThrottleRepositoryError {
    map_basic_pool_error(error, MatchStatsThrottleRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MatchStatsThrottleRepositoryError {
    map_basic_diesel_error(
        error,
        MatchStatsThrottleRepositoryError::query,
        MatchStatsThrottleRepositoryError::connection,
    )
}

fn row_to_record(row: ThrottleRow) -> ThrottleRecord {
    ThrottleRecord::new(row.match_id, row.last_notified_at.and_utc())
}

#[async_trait]
impl MatchStatsThrottleRepository for DieselMatchStatsThrottleRepository {
    async fn find(
        &self,
        match_id: i32,
    ) -> Result<Option<ThrottleRecord>, MatchStatsThrottleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = match_stats_throttle::table
            .filter(match_stats_throttle::match_id.eq(match_id))
            .select(ThrottleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_record))
    }

    async fn touch(
        &self,
        match_id: i32,
        at: Option<DateTime<Utc>>,
    ) -> Result<ThrottleRecord, MatchStatsThrottleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewThrottleRow {
            match_id,
            last_notified_at: at.map(|at| at.naive_utc()),
        };

        let row = diesel::insert_into(match_stats_throttle::table)
            .values(&new_row)
            .on_conflict(match_stats_throttle::match_id)
            .do_update()
            .set(
                match_stats_throttle::last_notified_at
                    .eq(excluded(match_stats_throttle::last_notified_at)),
            )
            .returning(ThrottleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_record(row))
    }

    async fn delete(&self, match_id: i32) -> Result<bool, MatchStatsThrottleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            match_stats_throttle::table.filter(match_stats_throttle::match_id.eq(match_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }
}
