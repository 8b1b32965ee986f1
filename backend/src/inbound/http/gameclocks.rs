//! Game clock HTTP handlers.
//!
//! ```text
//! POST   /api/v1/gameclocks
//! GET    /api/v1/gameclocks/{id}
//! PATCH  /api/v1/gameclocks/{id}
//! DELETE /api/v1/gameclocks/{id}
//! POST   /api/v1/gameclocks/{id}/start
//! POST   /api/v1/gameclocks/{id}/pause
//! POST   /api/v1/gameclocks/{id}/reset
//! GET    /api/v1/matches/{id}/gameclock
//! ```
//!
//! Writes accept an optional `expectedVersion`; a stale value answers 409
//! with the current version in `details.actualVersion`.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ClockStatus, GameClock, GameClockDraft, GameClockPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_expected_version, parse_optional_body, parse_optional_status, require,
};

const STATUS: FieldName = FieldName::new("status");

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameClockRequest {
    pub match_id: Option<i32>,
    /// Full duration in seconds.
    pub gameclock_max: Option<i32>,
    /// Seconds shown; defaults to `gameclockMax`.
    pub gameclock: Option<i32>,
    #[schema(example = "stopped")]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameClockRequest {
    pub gameclock: Option<i32>,
    pub gameclock_max: Option<i32>,
    pub status: Option<String>,
    pub started_at_ms: Option<i64>,
    pub expected_version: Option<u32>,
}

/// Body of the start, pause and reset transitions.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockTransitionRequest {
    pub expected_version: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameClockResponse {
    pub id: i32,
    pub match_id: i32,
    pub gameclock: i32,
    pub gameclock_max: i32,
    pub status: String,
    /// Epoch milliseconds of the last start while running.
    pub started_at_ms: Option<i64>,
    pub version: u32,
}

impl From<GameClock> for GameClockResponse {
    fn from(value: GameClock) -> Self {
        Self {
            id: value.id(),
            match_id: value.match_id(),
            gameclock: value.gameclock(),
            gameclock_max: value.gameclock_max(),
            status: value.status().as_str().to_owned(),
            started_at_ms: value.started_at_ms(),
            version: value.version().get(),
        }
    }
}

#[derive(Clone, Copy)]
enum Transition {
    Start,
    Pause,
    Reset,
}

async fn transition(
    state: &HttpState,
    id: i32,
    body: &[u8],
    transition: Transition,
) -> ApiResult<web::Json<GameClockResponse>> {
    let request: ClockTransitionRequest = parse_optional_body(body)?;
    let expected = parse_expected_version(request.expected_version)?;
    let clock = match transition {
        Transition::Start => state.gameclocks.start(id, expected).await?,
        Transition::Pause => state.gameclocks.pause(id, expected).await?,
        Transition::Reset => state.gameclocks.reset(id, expected).await?,
    };
    Ok(web::Json(clock.into()))
}

/// Create the game clock of a match.
#[utoipa::path(
    post,
    path = "/api/v1/gameclocks",
    request_body = CreateGameClockRequest,
    responses(
        (status = 201, description = "Game clock created", body = GameClockResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Match not found", body = ErrorSchema),
        (status = 409, description = "Match already has a game clock", body = ErrorSchema)
    ),
    tags = ["gameclocks"],
    operation_id = "createGameClock"
)]
#[post("/gameclocks")]
pub async fn create_gameclock(
    state: web::Data<HttpState>,
    payload: web::Json<CreateGameClockRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let match_id = require(payload.match_id, FieldName::new("matchId"))?;
    let gameclock_max = require(payload.gameclock_max, FieldName::new("gameclockMax"))?;
    let full = GameClockDraft::full(match_id, gameclock_max);
    let draft = GameClockDraft {
        gameclock: payload.gameclock.unwrap_or(full.gameclock),
        status: parse_optional_status(payload.status, STATUS)?.unwrap_or(ClockStatus::Stopped),
        ..full
    };
    let created = state.gameclocks.create(draft).await?;
    Ok(HttpResponse::Created().json(GameClockResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/gameclocks/{id}",
    params(("id" = i32, Path, description = "Game clock id")),
    responses(
        (status = 200, description = "Game clock", body = GameClockResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["gameclocks"],
    operation_id = "getGameClock"
)]
#[get("/gameclocks/{id}")]
pub async fn get_gameclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<GameClockResponse>> {
    let found = state.gameclocks.get(path.into_inner()).await?;
    Ok(web::Json(found.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}/gameclock",
    params(("id" = i32, Path, description = "Match id")),
    responses(
        (status = 200, description = "Game clock", body = GameClockResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["gameclocks"],
    operation_id = "getMatchGameClock"
)]
#[get("/matches/{id}/gameclock")]
pub async fn get_match_gameclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<GameClockResponse>> {
    let found = state.gameclocks.get_by_match(path.into_inner()).await?;
    Ok(web::Json(found.into()))
}

/// Edit clock fields directly.
#[utoipa::path(
    patch,
    path = "/api/v1/gameclocks/{id}",
    params(("id" = i32, Path, description = "Game clock id")),
    request_body = UpdateGameClockRequest,
    responses(
        (status = 200, description = "Updated game clock", body = GameClockResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Version conflict", body = ErrorSchema)
    ),
    tags = ["gameclocks"],
    operation_id = "updateGameClock"
)]
#[patch("/gameclocks/{id}")]
pub async fn update_gameclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateGameClockRequest>,
) -> ApiResult<web::Json<GameClockResponse>> {
    let payload = payload.into_inner();
    let patch = GameClockPatch {
        gameclock: payload.gameclock,
        gameclock_max: payload.gameclock_max,
        status: parse_optional_status(payload.status, STATUS)?,
        started_at_ms: payload.started_at_ms,
    };
    let expected = parse_expected_version(payload.expected_version)?;
    let updated = state
        .gameclocks
        .update(path.into_inner(), patch, expected)
        .await?;
    Ok(web::Json(updated.into()))
}

/// Start counting down.
#[utoipa::path(
    post,
    path = "/api/v1/gameclocks/{id}/start",
    params(("id" = i32, Path, description = "Game clock id")),
    request_body(content = ClockTransitionRequest, description = "Optional precondition; may be empty"),
    responses(
        (status = 200, description = "Running game clock", body = GameClockResponse),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already running or version conflict", body = ErrorSchema)
    ),
    tags = ["gameclocks"],
    operation_id = "startGameClock"
)]
#[post("/gameclocks/{id}/start")]
pub async fn start_gameclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> ApiResult<web::Json<GameClockResponse>> {
    transition(&state, path.into_inner(), &body, Transition::Start).await
}

/// Pause, banking elapsed time.
#[utoipa::path(
    post,
    path = "/api/v1/gameclocks/{id}/pause",
    params(("id" = i32, Path, description = "Game clock id")),
    request_body(content = ClockTransitionRequest, description = "Optional precondition; may be empty"),
    responses(
        (status = 200, description = "Paused game clock", body = GameClockResponse),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Not running or version conflict", body = ErrorSchema)
    ),
    tags = ["gameclocks"],
    operation_id = "pauseGameClock"
)]
#[post("/gameclocks/{id}/pause")]
pub async fn pause_gameclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> ApiResult<web::Json<GameClockResponse>> {
    transition(&state, path.into_inner(), &body, Transition::Pause).await
}

/// Stop and restore the full duration.
#[utoipa::path(
    post,
    path = "/api/v1/gameclocks/{id}/reset",
    params(("id" = i32, Path, description = "Game clock id")),
    request_body(content = ClockTransitionRequest, description = "Optional precondition; may be empty"),
    responses(
        (status = 200, description = "Reset game clock", body = GameClockResponse),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Version conflict", body = ErrorSchema)
    ),
    tags = ["gameclocks"],
    operation_id = "resetGameClock"
)]
#[post("/gameclocks/{id}/reset")]
pub async fn reset_gameclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> ApiResult<web::Json<GameClockResponse>> {
    transition(&state, path.into_inner(), &body, Transition::Reset).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/gameclocks/{id}",
    params(("id" = i32, Path, description = "Game clock id")),
    responses(
        (status = 204, description = "Game clock deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["gameclocks"],
    operation_id = "deleteGameClock"
)]
#[delete("/gameclocks/{id}")]
pub async fn delete_gameclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state.gameclocks.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "gameclocks_tests.rs"]
mod tests;
