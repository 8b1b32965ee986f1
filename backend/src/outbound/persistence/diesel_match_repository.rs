//! PostgreSQL-backed `MatchRepository` implementation using Diesel ORM.
//!
//! Deleting a match removes its scoreboard and clocks inside one transaction
//! and reports the removed ids, so the caller fires a change for each row only
//! once the whole cascade has committed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{MatchDeletion, MatchRepository, MatchRepositoryError};
use crate::domain::{Match, MatchDraft, NewMatch};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MatchRow, MatchValues};
use super::pool::{DbPool, PoolError};
use super::schema::{gameclock, playclock, scoreboard, sport_match};

/// Diesel-backed implementation of the match repository port.
#[derive(Clone)]
pub struct DieselMatchRepository {
    pool: DbPool,
}

impl DieselMatchRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MatchRepositoryError {
    map_basic_pool_error(error, MatchRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MatchRepositoryError {
    map_basic_diesel_error(
        error,
        MatchRepositoryError::query,
        MatchRepositoryError::connection,
    )
}

fn values(fields: &MatchDraft) -> MatchValues<'_> {
    MatchValues {
        tournament_id: fields.tournament_id,
        team_a_id: fields.team_a_id,
        team_b_id: fields.team_b_id,
        title: &fields.title,
        week: fields.week,
        match_date: fields.match_date,
    }
}

/// Convert a database row into a validated domain match.
fn row_to_match(row: MatchRow) -> Result<Match, MatchRepositoryError> {
    let MatchRow {
        id,
        tournament_id,
        team_a_id,
        team_b_id,
        title,
        week,
        match_date,
    } = row;

    Match::new(
        id,
        MatchDraft {
            tournament_id,
            team_a_id,
            team_b_id,
            title,
            week,
            match_date,
        },
    )
    .map_err(|err| MatchRepositoryError::query(err.to_string()))
}

#[async_trait]
impl MatchRepository for DieselMatchRepository {
    async fn insert(&self, new_match: &NewMatch) -> Result<Match, MatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: MatchRow = diesel::insert_into(sport_match::table)
            .values(values(new_match.fields()))
            .returning(MatchRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_match(row)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Match>, MatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        sport_match::table
            .filter(sport_match::id.eq(id))
            .select(MatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_match)
            .transpose()
    }

    async fn update(&self, updated: &Match) -> Result<Option<Match>, MatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let fields = MatchDraft {
            tournament_id: updated.tournament_id(),
            team_a_id: updated.team_a_id(),
            team_b_id: updated.team_b_id(),
            title: updated.title().to_owned(),
            week: updated.week(),
            match_date: updated.match_date(),
        };

        diesel::update(sport_match::table.filter(sport_match::id.eq(updated.id())))
            .set(values(&fields))
            .returning(MatchRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_match)
            .transpose()
    }

    async fn delete(&self, id: i32) -> Result<Option<MatchDeletion>, MatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let scoreboard_ids: Vec<i32> =
                        diesel::delete(scoreboard::table.filter(scoreboard::match_id.eq(id)))
                            .returning(scoreboard::id)
                            .get_results(conn)
                            .await?;
                    let gameclock_ids: Vec<i32> =
                        diesel::delete(gameclock::table.filter(gameclock::match_id.eq(id)))
                            .returning(gameclock::id)
                            .get_results(conn)
                            .await?;
                    let playclock_ids: Vec<i32> =
                        diesel::delete(playclock::table.filter(playclock::match_id.eq(id)))
                            .returning(playclock::id)
                            .get_results(conn)
                            .await?;
                    let removed: Option<MatchRow> =
                        diesel::delete(sport_match::table.filter(sport_match::id.eq(id)))
                            .returning(MatchRow::as_returning())
                            .get_result(conn)
                            .await
                            .optional()?;

                    // An unknown id must not leave orphan deletions behind.
                    if removed.is_none() {
                        return Err(diesel::result::Error::RollbackTransaction);
                    }
                    Ok((removed, scoreboard_ids, gameclock_ids, playclock_ids))
                }
                .scope_boxed()
            })
            .await;

        let (removed, scoreboard_ids, gameclock_ids, playclock_ids) = match outcome {
            Ok(parts) => parts,
            Err(diesel::result::Error::RollbackTransaction) => {
                debug!(match_id = id, "match delete found no row");
                return Ok(None);
            }
            Err(err) => return Err(map_diesel_error(err)),
        };

        let Some(row) = removed else {
            return Ok(None);
        };
        Ok(Some(MatchDeletion {
            removed: row_to_match(row)?,
            scoreboard_ids,
            gameclock_ids,
            playclock_ids,
        }))
    }
}
