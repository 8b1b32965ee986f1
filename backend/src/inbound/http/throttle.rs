//! Match statistics throttle HTTP handlers.
//!
//! ```text
//! GET    /api/v1/matches/{id}/stats-throttle
//! PUT    /api/v1/matches/{id}/stats-throttle
//! POST   /api/v1/matches/{id}/stats-throttle/acquire
//! DELETE /api/v1/matches/{id}/stats-throttle
//! ```
//!
//! `acquire` is what publishers call before sending a statistics
//! notification: `emit: false` means hold back for `retryAfterMs`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ThrottleDecision, ThrottleRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_body, parse_optional_rfc3339_timestamp,
};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TouchThrottleRequest {
    /// RFC 3339 timestamp; defaults to now.
    #[schema(example = "2026-05-02T18:30:00Z")]
    pub last_notified_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleResponse {
    pub match_id: i32,
    pub last_notified_at: String,
}

impl From<ThrottleRecord> for ThrottleResponse {
    fn from(value: ThrottleRecord) -> Self {
        Self {
            match_id: value.match_id(),
            last_notified_at: value.last_notified_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcquireResponse {
    pub emit: bool,
    pub last_notified_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

impl From<ThrottleDecision> for AcquireResponse {
    fn from(value: ThrottleDecision) -> Self {
        match value {
            ThrottleDecision::Emit { record } => Self {
                emit: true,
                last_notified_at: record.last_notified_at().to_rfc3339(),
                retry_after_ms: None,
            },
            ThrottleDecision::Suppress {
                last_notified_at,
                retry_after_ms,
            } => Self {
                emit: false,
                last_notified_at: last_notified_at.to_rfc3339(),
                retry_after_ms: Some(retry_after_ms),
            },
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}/stats-throttle",
    params(("id" = i32, Path, description = "Match id")),
    responses(
        (status = 200, description = "Throttle entry", body = ThrottleResponse),
        (status = 404, description = "No entry", body = ErrorSchema)
    ),
    tags = ["stats-throttle"],
    operation_id = "getStatsThrottle"
)]
#[get("/matches/{id}/stats-throttle")]
pub async fn get_stats_throttle(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<ThrottleResponse>> {
    let record = state.stats_throttle.get(path.into_inner()).await?;
    Ok(web::Json(record.into()))
}

/// Record a notification, creating the entry if needed.
#[utoipa::path(
    put,
    path = "/api/v1/matches/{id}/stats-throttle",
    params(("id" = i32, Path, description = "Match id")),
    request_body(content = TouchThrottleRequest, description = "Optional timestamp; may be empty"),
    responses(
        (status = 200, description = "Entry written", body = ThrottleResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["stats-throttle"],
    operation_id = "touchStatsThrottle"
)]
#[put("/matches/{id}/stats-throttle")]
pub async fn touch_stats_throttle(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> ApiResult<web::Json<ThrottleResponse>> {
    let request: TouchThrottleRequest = parse_optional_body(&body)?;
    let at = parse_optional_rfc3339_timestamp(
        request.last_notified_at,
        FieldName::new("lastNotifiedAt"),
    )?;
    let record = state.stats_throttle.touch(path.into_inner(), at).await?;
    Ok(web::Json(record.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/stats-throttle/acquire",
    params(("id" = i32, Path, description = "Match id")),
    responses(
        (status = 200, description = "Throttle decision", body = AcquireResponse),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["stats-throttle"],
    operation_id = "acquireStatsThrottle"
)]
#[post("/matches/{id}/stats-throttle/acquire")]
pub async fn acquire_stats_throttle(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<AcquireResponse>> {
    let decision = state.stats_throttle.try_acquire(path.into_inner()).await?;
    Ok(web::Json(decision.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/matches/{id}/stats-throttle",
    params(("id" = i32, Path, description = "Match id")),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "No entry", body = ErrorSchema)
    ),
    tags = ["stats-throttle"],
    operation_id = "clearStatsThrottle"
)]
#[delete("/matches/{id}/stats-throttle")]
pub async fn clear_stats_throttle(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state.stats_throttle.clear(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{DateTime, TimeZone, Utc};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use super::*;
    use crate::inbound::http::test_utils::{MockServices, test_app};

    #[fixture]
    fn kickoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 18, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[actix_web::test]
    async fn suppressed_acquire_reports_retry_after(kickoff: DateTime<Utc>) {
        let mut services = MockServices::default();
        services
            .stats_throttle
            .expect_try_acquire()
            .with(eq(9))
            .returning(move |_| {
                Ok(ThrottleDecision::Suppress {
                    last_notified_at: kickoff,
                    retry_after_ms: 400,
                })
            });
        let app = actix_test::init_service(test_app(services.into_state())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/matches/9/stats-throttle/acquire")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["emit"], false);
        assert_eq!(body["retryAfterMs"], 400);
        assert_eq!(body["lastNotifiedAt"], "2026-05-02T18:30:00+00:00");
    }

    #[rstest]
    #[actix_web::test]
    async fn emitted_acquire_omits_retry_after(kickoff: DateTime<Utc>) {
        let mut services = MockServices::default();
        services.stats_throttle.expect_try_acquire().returning(move |id| {
            Ok(ThrottleDecision::Emit {
                record: ThrottleRecord::new(id, kickoff),
            })
        });
        let app = actix_test::init_service(test_app(services.into_state())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/matches/9/stats-throttle/acquire")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["emit"], true);
        assert!(body.get("retryAfterMs").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn touch_parses_explicit_timestamp(kickoff: DateTime<Utc>) {
        let mut services = MockServices::default();
        services
            .stats_throttle
            .expect_touch()
            .with(eq(9), eq(Some(kickoff)))
            .times(1)
            .returning(move |id, _| Ok(ThrottleRecord::new(id, kickoff)));
        let app = actix_test::init_service(test_app(services.into_state())).await;

        let request = actix_test::TestRequest::put()
            .uri("/api/v1/matches/9/stats-throttle")
            .set_json(json!({ "lastNotifiedAt": "2026-05-02T18:30:00Z" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn touch_without_body_uses_store_default(kickoff: DateTime<Utc>) {
        let mut services = MockServices::default();
        services
            .stats_throttle
            .expect_touch()
            .with(eq(9), eq(None))
            .times(1)
            .returning(move |id, _| Ok(ThrottleRecord::new(id, kickoff)));
        let app = actix_test::init_service(test_app(services.into_state())).await;

        let request = actix_test::TestRequest::put()
            .uri("/api/v1/matches/9/stats-throttle")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn clearing_answers_204() {
        let mut services = MockServices::default();
        services
            .stats_throttle
            .expect_clear()
            .with(eq(9))
            .times(1)
            .returning(|_| Ok(()));
        let app = actix_test::init_service(test_app(services.into_state())).await;

        let request = actix_test::TestRequest::delete()
            .uri("/api/v1/matches/9/stats-throttle")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
