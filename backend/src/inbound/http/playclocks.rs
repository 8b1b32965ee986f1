//! Play clock HTTP handlers.
//!
//! ```text
//! POST   /api/v1/playclocks
//! GET    /api/v1/playclocks/{id}
//! PATCH  /api/v1/playclocks/{id}
//! DELETE /api/v1/playclocks/{id}
//! POST   /api/v1/playclocks/{id}/start
//! POST   /api/v1/playclocks/{id}/stop
//! GET    /api/v1/matches/{id}/playclock
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ClockStatus, PlayClock, PlayClockDraft, PlayClockPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::gameclocks::ClockTransitionRequest;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_expected_version, parse_optional_body, parse_optional_status, require,
};

const STATUS: FieldName = FieldName::new("status");

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayClockRequest {
    pub match_id: Option<i32>,
    pub playclock: Option<i32>,
    #[schema(example = "stopped")]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayClockRequest {
    pub playclock: Option<i32>,
    pub status: Option<String>,
    pub expected_version: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartPlayClockRequest {
    /// Countdown length, 1 to 300 seconds.
    pub seconds: Option<i32>,
    pub expected_version: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayClockResponse {
    pub id: i32,
    pub match_id: i32,
    /// Blank while stopped.
    pub playclock: Option<i32>,
    pub status: String,
    pub version: u32,
}

impl From<PlayClock> for PlayClockResponse {
    fn from(value: PlayClock) -> Self {
        Self {
            id: value.id(),
            match_id: value.match_id(),
            playclock: value.playclock(),
            status: value.status().as_str().to_owned(),
            version: value.version().get(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/playclocks",
    request_body = CreatePlayClockRequest,
    responses(
        (status = 201, description = "Play clock created", body = PlayClockResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Match not found", body = ErrorSchema),
        (status = 409, description = "Match already has a play clock", body = ErrorSchema)
    ),
    tags = ["playclocks"],
    operation_id = "createPlayClock"
)]
#[post("/playclocks")]
pub async fn create_playclock(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePlayClockRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let draft = PlayClockDraft {
        match_id: require(payload.match_id, FieldName::new("matchId"))?,
        playclock: payload.playclock,
        status: parse_optional_status(payload.status, STATUS)?.unwrap_or(ClockStatus::Stopped),
    };
    let created = state.playclocks.create(draft).await?;
    Ok(HttpResponse::Created().json(PlayClockResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/playclocks/{id}",
    params(("id" = i32, Path, description = "Play clock id")),
    responses(
        (status = 200, description = "Play clock", body = PlayClockResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["playclocks"],
    operation_id = "getPlayClock"
)]
#[get("/playclocks/{id}")]
pub async fn get_playclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<PlayClockResponse>> {
    let found = state.playclocks.get(path.into_inner()).await?;
    Ok(web::Json(found.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}/playclock",
    params(("id" = i32, Path, description = "Match id")),
    responses(
        (status = 200, description = "Play clock", body = PlayClockResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["playclocks"],
    operation_id = "getMatchPlayClock"
)]
#[get("/matches/{id}/playclock")]
pub async fn get_match_playclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<PlayClockResponse>> {
    let found = state.playclocks.get_by_match(path.into_inner()).await?;
    Ok(web::Json(found.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/playclocks/{id}",
    params(("id" = i32, Path, description = "Play clock id")),
    request_body = UpdatePlayClockRequest,
    responses(
        (status = 200, description = "Updated play clock", body = PlayClockResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Version conflict", body = ErrorSchema)
    ),
    tags = ["playclocks"],
    operation_id = "updatePlayClock"
)]
#[patch("/playclocks/{id}")]
pub async fn update_playclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdatePlayClockRequest>,
) -> ApiResult<web::Json<PlayClockResponse>> {
    let payload = payload.into_inner();
    let patch = PlayClockPatch {
        playclock: payload.playclock,
        status: parse_optional_status(payload.status, STATUS)?,
    };
    let expected = parse_expected_version(payload.expected_version)?;
    let updated = state
        .playclocks
        .update(path.into_inner(), patch, expected)
        .await?;
    Ok(web::Json(updated.into()))
}

/// Run the play clock for `seconds`.
#[utoipa::path(
    post,
    path = "/api/v1/playclocks/{id}/start",
    params(("id" = i32, Path, description = "Play clock id")),
    request_body = StartPlayClockRequest,
    responses(
        (status = 200, description = "Running play clock", body = PlayClockResponse),
        (status = 400, description = "Seconds out of range", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Version conflict", body = ErrorSchema)
    ),
    tags = ["playclocks"],
    operation_id = "startPlayClock"
)]
#[post("/playclocks/{id}/start")]
pub async fn start_playclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<StartPlayClockRequest>,
) -> ApiResult<web::Json<PlayClockResponse>> {
    let payload = payload.into_inner();
    let seconds = require(payload.seconds, FieldName::new("seconds"))?;
    let expected = parse_expected_version(payload.expected_version)?;
    let started = state
        .playclocks
        .start(path.into_inner(), seconds, expected)
        .await?;
    Ok(web::Json(started.into()))
}

/// Stop and blank the play clock.
#[utoipa::path(
    post,
    path = "/api/v1/playclocks/{id}/stop",
    params(("id" = i32, Path, description = "Play clock id")),
    request_body(content = ClockTransitionRequest, description = "Optional precondition; may be empty"),
    responses(
        (status = 200, description = "Stopped play clock", body = PlayClockResponse),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Version conflict", body = ErrorSchema)
    ),
    tags = ["playclocks"],
    operation_id = "stopPlayClock"
)]
#[post("/playclocks/{id}/stop")]
pub async fn stop_playclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> ApiResult<web::Json<PlayClockResponse>> {
    let request: ClockTransitionRequest = parse_optional_body(&body)?;
    let expected = parse_expected_version(request.expected_version)?;
    let stopped = state.playclocks.stop(path.into_inner(), expected).await?;
    Ok(web::Json(stopped.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/playclocks/{id}",
    params(("id" = i32, Path, description = "Play clock id")),
    responses(
        (status = 204, description = "Play clock deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["playclocks"],
    operation_id = "deletePlayClock"
)]
#[delete("/playclocks/{id}")]
pub async fn delete_playclock(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state.playclocks.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{Error, Version};
    use crate::inbound::http::test_utils::{MockServices, test_app};

    fn running(seconds: i32) -> PlayClock {
        PlayClock::new(
            6,
            Version::new(2).expect("valid version"),
            PlayClockDraft {
                match_id: 8,
                playclock: Some(seconds),
                status: ClockStatus::Running,
            },
        )
        .expect("valid clock")
    }

    #[actix_web::test]
    async fn start_requires_seconds() {
        let mut services = MockServices::default();
        services.playclocks.expect_start().times(0);
        let app = actix_test::init_service(test_app(services.into_state())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/playclocks/6/start")
            .set_json(json!({}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "seconds");
    }

    #[actix_web::test]
    async fn start_forwards_seconds_and_version() {
        let mut services = MockServices::default();
        services
            .playclocks
            .expect_start()
            .with(eq(6), eq(40), eq(Version::new(1)))
            .times(1)
            .returning(|_, seconds, _| Ok(running(seconds)));
        let app = actix_test::init_service(test_app(services.into_state())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/playclocks/6/start")
            .set_json(json!({ "seconds": 40, "expectedVersion": 1 }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["playclock"], 40);
        assert_eq!(body["version"], 2);
    }

    #[actix_web::test]
    async fn out_of_range_seconds_surface_as_400() {
        let mut services = MockServices::default();
        services
            .playclocks
            .expect_start()
            .returning(|_, _, _| Err(Error::invalid_request("play clock must be 1 to 300")));
        let app = actix_test::init_service(test_app(services.into_state())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/playclocks/6/start")
            .set_json(json!({ "seconds": 900 }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn stop_without_body_blanks_the_clock() {
        let mut services = MockServices::default();
        services
            .playclocks
            .expect_stop()
            .with(eq(6), eq(None))
            .times(1)
            .returning(|id, _| {
                Ok(PlayClock::new(
                    id,
                    Version::new(3).expect("valid version"),
                    PlayClockDraft {
                        match_id: 8,
                        playclock: None,
                        status: ClockStatus::Stopped,
                    },
                )
                .expect("valid clock"))
            });
        let app = actix_test::init_service(test_app(services.into_state())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/playclocks/6/stop")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["playclock"], Value::Null);
        assert_eq!(body["status"], "stopped");
    }
}
