//! PostgreSQL-backed `ScoreboardRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ScoreboardRepository, ScoreboardRepositoryError};
use crate::domain::{Scoreboard, ScoreboardDraft};

use super::diesel_basic_error_mapping::{
    MatchConstraint, map_basic_diesel_error, map_basic_pool_error, match_constraint_violation,
};
use super::models::{NewScoreboardRow, ScoreboardRow, ScoreboardUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::scoreboard;

/// Diesel-backed implementation of the scoreboard repository port.
#[derive(Clone)]
pub struct DieselScoreboardRepository {
    pool: DbPool,
}

impl DieselScoreboardRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScoreboardRepositoryError {
    map_basic_pool_error(error, ScoreboardRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ScoreboardRepositoryError {
    map_basic_diesel_error(
        error,
        ScoreboardRepositoryError::query,
        ScoreboardRepositoryError::connection,
    )
}

/// Like [`map_diesel_error`], but reports `match_id` constraint failures.
fn map_write_error(error: diesel::result::Error, match_id: i32) -> ScoreboardRepositoryError {
    match match_constraint_violation(&error) {
        Some(MatchConstraint::UnknownMatch) => ScoreboardRepositoryError::unknown_match(match_id),
        Some(MatchConstraint::Duplicate) => ScoreboardRepositoryError::duplicate(match_id),
        None => map_diesel_error(error),
    }
}

fn row_to_scoreboard(row: ScoreboardRow) -> Result<Scoreboard, ScoreboardRepositoryError> {
    let ScoreboardRow {
        id,
        match_id,
        score_team_a,
        score_team_b,
        period,
        is_flag,
    } = row;

    Scoreboard::new(
        id,
        ScoreboardDraft {
            match_id,
            score_team_a,
            score_team_b,
            period,
            is_flag,
        },
    )
    .map_err(|err| ScoreboardRepositoryError::query(err.to_string()))
}

#[async_trait]
impl ScoreboardRepository for DieselScoreboardRepository {
    async fn insert(&self, draft: &ScoreboardDraft) -> Result<Scoreboard, ScoreboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewScoreboardRow {
            match_id: draft.match_id,
            score_team_a: draft.score_team_a,
            score_team_b: draft.score_team_b,
            period: draft.period,
            is_flag: draft.is_flag,
        };

        let row = diesel::insert_into(scoreboard::table)
            .values(&new_row)
            .returning(ScoreboardRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, draft.match_id))?;

        row_to_scoreboard(row)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Scoreboard>, ScoreboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        scoreboard::table
            .filter(scoreboard::id.eq(id))
            .select(ScoreboardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_scoreboard)
            .transpose()
    }

    async fn find_by_match(
        &self,
        match_id: i32,
    ) -> Result<Option<Scoreboard>, ScoreboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        scoreboard::table
            .filter(scoreboard::match_id.eq(match_id))
            .select(ScoreboardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_scoreboard)
            .transpose()
    }

    async fn update(
        &self,
        updated: &Scoreboard,
    ) -> Result<Option<Scoreboard>, ScoreboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ScoreboardUpdate {
            score_team_a: updated.score_team_a(),
            score_team_b: updated.score_team_b(),
            period: updated.period(),
            is_flag: updated.is_flag(),
        };

        diesel::update(scoreboard::table.filter(scoreboard::id.eq(updated.id())))
            .set(&changes)
            .returning(ScoreboardRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_scoreboard)
            .transpose()
    }

    async fn delete(&self, id: i32) -> Result<Option<Scoreboard>, ScoreboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(scoreboard::table.filter(scoreboard::id.eq(id)))
            .returning(ScoreboardRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_scoreboard)
            .transpose()
    }
}
