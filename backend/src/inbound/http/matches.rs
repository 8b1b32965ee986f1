//! Match HTTP handlers.
//!
//! ```text
//! POST   /api/v1/matches
//! GET    /api/v1/matches/{id}
//! PATCH  /api/v1/matches/{id}
//! DELETE /api/v1/matches/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Match, MatchDraft, MatchPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_rfc3339_timestamp, require};

const MATCH_DATE: FieldName = FieldName::new("matchDate");

/// Request payload for creating a match.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub tournament_id: Option<i32>,
    pub team_a_id: Option<i32>,
    pub team_b_id: Option<i32>,
    pub title: Option<String>,
    /// Defaults to 0.
    pub week: Option<i32>,
    /// RFC 3339 kick-off time.
    #[schema(example = "2026-05-02T18:30:00Z")]
    pub match_date: Option<String>,
}

/// Request payload for patching a match; absent fields are unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchRequest {
    pub tournament_id: Option<i32>,
    pub team_a_id: Option<i32>,
    pub team_b_id: Option<i32>,
    pub title: Option<String>,
    pub week: Option<i32>,
    pub match_date: Option<String>,
}

/// Match representation returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub id: i32,
    pub tournament_id: i32,
    pub team_a_id: i32,
    pub team_b_id: i32,
    pub title: String,
    pub week: i32,
    pub match_date: Option<String>,
}

impl From<Match> for MatchResponse {
    fn from(value: Match) -> Self {
        Self {
            id: value.id(),
            tournament_id: value.tournament_id(),
            team_a_id: value.team_a_id(),
            team_b_id: value.team_b_id(),
            title: value.title().to_owned(),
            week: value.week(),
            match_date: value.match_date().map(|date| date.to_rfc3339()),
        }
    }
}

fn parse_create_request(payload: CreateMatchRequest) -> Result<MatchDraft, Error> {
    Ok(MatchDraft {
        tournament_id: require(payload.tournament_id, FieldName::new("tournamentId"))?,
        team_a_id: require(payload.team_a_id, FieldName::new("teamAId"))?,
        team_b_id: require(payload.team_b_id, FieldName::new("teamBId"))?,
        title: require(payload.title, FieldName::new("title"))?,
        week: payload.week.unwrap_or(0),
        match_date: parse_optional_rfc3339_timestamp(payload.match_date, MATCH_DATE)?,
    })
}

fn parse_update_request(payload: UpdateMatchRequest) -> Result<MatchPatch, Error> {
    Ok(MatchPatch {
        tournament_id: payload.tournament_id,
        team_a_id: payload.team_a_id,
        team_b_id: payload.team_b_id,
        title: payload.title,
        week: payload.week,
        match_date: parse_optional_rfc3339_timestamp(payload.match_date, MATCH_DATE)?,
    })
}

/// Create a match.
#[utoipa::path(
    post,
    path = "/api/v1/matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match created", body = MatchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "createMatch"
)]
#[post("/matches")]
pub async fn create_match(
    state: web::Data<HttpState>,
    payload: web::Json<CreateMatchRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_create_request(payload.into_inner())?;
    let created = state.matches.create(draft).await?;
    Ok(HttpResponse::Created().json(MatchResponse::from(created)))
}

/// Fetch a match.
#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}",
    params(("id" = i32, Path, description = "Match id")),
    responses(
        (status = 200, description = "Match", body = MatchResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "getMatch"
)]
#[get("/matches/{id}")]
pub async fn get_match(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MatchResponse>> {
    let found = state.matches.get(path.into_inner()).await?;
    Ok(web::Json(MatchResponse::from(found)))
}

/// Patch a match.
#[utoipa::path(
    patch,
    path = "/api/v1/matches/{id}",
    params(("id" = i32, Path, description = "Match id")),
    request_body = UpdateMatchRequest,
    responses(
        (status = 200, description = "Updated match", body = MatchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "updateMatch"
)]
#[patch("/matches/{id}")]
pub async fn update_match(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateMatchRequest>,
) -> ApiResult<web::Json<MatchResponse>> {
    let patch = parse_update_request(payload.into_inner())?;
    let updated = state.matches.update(path.into_inner(), patch).await?;
    Ok(web::Json(MatchResponse::from(updated)))
}

/// Delete a match with its scoreboard and clocks.
#[utoipa::path(
    delete,
    path = "/api/v1/matches/{id}",
    params(("id" = i32, Path, description = "Match id")),
    responses(
        (status = 204, description = "Match deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "deleteMatch"
)]
#[delete("/matches/{id}")]
pub async fn delete_match(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state.matches.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "matches_tests.rs"]
mod tests;
