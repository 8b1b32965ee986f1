//! Scoreboard HTTP handlers.
//!
//! ```text
//! POST   /api/v1/scoreboards
//! GET    /api/v1/scoreboards/{id}
//! PATCH  /api/v1/scoreboards/{id}
//! DELETE /api/v1/scoreboards/{id}
//! GET    /api/v1/matches/{id}/scoreboard
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Scoreboard, ScoreboardDraft, ScoreboardPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Request payload for creating a scoreboard. Omitted fields start at
/// nil-nil in period one.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScoreboardRequest {
    pub match_id: Option<i32>,
    pub score_team_a: Option<i32>,
    pub score_team_b: Option<i32>,
    pub period: Option<i32>,
    pub is_flag: Option<bool>,
}

/// Partial scoreboard update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScoreboardRequest {
    pub score_team_a: Option<i32>,
    pub score_team_b: Option<i32>,
    pub period: Option<i32>,
    pub is_flag: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardResponse {
    pub id: i32,
    pub match_id: i32,
    pub score_team_a: i32,
    pub score_team_b: i32,
    pub period: i32,
    pub is_flag: bool,
}

impl From<Scoreboard> for ScoreboardResponse {
    fn from(value: Scoreboard) -> Self {
        Self {
            id: value.id(),
            match_id: value.match_id(),
            score_team_a: value.score_team_a(),
            score_team_b: value.score_team_b(),
            period: value.period(),
            is_flag: value.is_flag(),
        }
    }
}

impl From<UpdateScoreboardRequest> for ScoreboardPatch {
    fn from(value: UpdateScoreboardRequest) -> Self {
        Self {
            score_team_a: value.score_team_a,
            score_team_b: value.score_team_b,
            period: value.period,
            is_flag: value.is_flag,
        }
    }
}

/// Create the scoreboard of a match.
#[utoipa::path(
    post,
    path = "/api/v1/scoreboards",
    request_body = CreateScoreboardRequest,
    responses(
        (status = 201, description = "Scoreboard created", body = ScoreboardResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Match not found", body = ErrorSchema),
        (status = 409, description = "Match already has a scoreboard", body = ErrorSchema)
    ),
    tags = ["scoreboards"],
    operation_id = "createScoreboard"
)]
#[post("/scoreboards")]
pub async fn create_scoreboard(
    state: web::Data<HttpState>,
    payload: web::Json<CreateScoreboardRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let match_id = require(payload.match_id, FieldName::new("matchId"))?;
    let kickoff = ScoreboardDraft::kickoff(match_id);
    let draft = ScoreboardDraft {
        score_team_a: payload.score_team_a.unwrap_or(kickoff.score_team_a),
        score_team_b: payload.score_team_b.unwrap_or(kickoff.score_team_b),
        period: payload.period.unwrap_or(kickoff.period),
        is_flag: payload.is_flag.unwrap_or(kickoff.is_flag),
        ..kickoff
    };
    let created = state.scoreboards.create(draft).await?;
    Ok(HttpResponse::Created().json(ScoreboardResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/scoreboards/{id}",
    params(("id" = i32, Path, description = "Scoreboard id")),
    responses(
        (status = 200, description = "Scoreboard", body = ScoreboardResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["scoreboards"],
    operation_id = "getScoreboard"
)]
#[get("/scoreboards/{id}")]
pub async fn get_scoreboard(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<ScoreboardResponse>> {
    let found = state.scoreboards.get(path.into_inner()).await?;
    Ok(web::Json(found.into()))
}

/// Scoreboard of a match.
#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}/scoreboard",
    params(("id" = i32, Path, description = "Match id")),
    responses(
        (status = 200, description = "Scoreboard", body = ScoreboardResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["scoreboards"],
    operation_id = "getMatchScoreboard"
)]
#[get("/matches/{id}/scoreboard")]
pub async fn get_match_scoreboard(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<ScoreboardResponse>> {
    let found = state.scoreboards.get_by_match(path.into_inner()).await?;
    Ok(web::Json(found.into()))
}

/// Apply a score change.
#[utoipa::path(
    patch,
    path = "/api/v1/scoreboards/{id}",
    params(("id" = i32, Path, description = "Scoreboard id")),
    request_body = UpdateScoreboardRequest,
    responses(
        (status = 200, description = "Updated scoreboard", body = ScoreboardResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["scoreboards"],
    operation_id = "updateScoreboard"
)]
#[patch("/scoreboards/{id}")]
pub async fn update_scoreboard(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateScoreboardRequest>,
) -> ApiResult<web::Json<ScoreboardResponse>> {
    let updated = state
        .scoreboards
        .update(path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/scoreboards/{id}",
    params(("id" = i32, Path, description = "Scoreboard id")),
    responses(
        (status = 204, description = "Scoreboard deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["scoreboards"],
    operation_id = "deleteScoreboard"
)]
#[delete("/scoreboards/{id}")]
pub async fn delete_scoreboard(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state.scoreboards.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
