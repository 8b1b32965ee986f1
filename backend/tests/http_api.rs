//! End-to-end HTTP behaviour over the in-memory stores.
//!
//! Every request goes through the real `/api/v1` scope and real services, so
//! the recorded bus traffic is exactly what WebSocket subscribers would see.

use std::time::Duration;

use actix_http::Request;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test::{self, TestRequest},
    web,
};
use futures_util::StreamExt;
use league_backend::domain::ports::ChangeSubscriber;
use league_backend::domain::{ChangeOperation, Channel};
use league_backend::inbound::http;
use league_backend::test_support::{MemoryApp, memory_app};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const KICKOFF_MS: i64 = 1_777_746_600_000;

#[fixture]
fn league() -> MemoryApp {
    memory_app(KICKOFF_MS, Duration::from_secs(1))
}

async fn init_app(
    league: &MemoryApp,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(league.http.clone()))
            .configure(http::configure),
    )
    .await
}

async fn send<S>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, req.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("numeric id")
}

async fn create_match<S>(app: &S) -> i64
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        TestRequest::post().uri("/api/v1/matches").set_json(json!({
            "tournamentId": 1,
            "teamAId": 10,
            "teamBId": 11,
            "title": "Harbour Derby",
            "week": 3,
            "matchDate": "2026-05-02T18:30:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    id_of(&body)
}

#[rstest]
#[actix_rt::test]
async fn match_lifecycle_cascades_to_dependants(league: MemoryApp) {
    let app = init_app(&league).await;
    let match_id = create_match(&app).await;

    let (status, board) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/scoreboards")
            .set_json(json!({ "matchId": match_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(board["scoreTeamA"], 0);
    assert_eq!(board["period"], 1);

    let (status, clock) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/gameclocks")
            .set_json(json!({ "matchId": match_id, "gameclockMax": 720 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(clock["gameclock"], 720);

    let (status, by_match) = send(
        &app,
        TestRequest::get().uri(&format!("/api/v1/matches/{match_id}/scoreboard")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_match["id"], board["id"]);

    let (status, _) = send(
        &app,
        TestRequest::delete().uri(&format!("/api/v1/matches/{match_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for uri in [
        format!("/api/v1/matches/{match_id}"),
        format!("/api/v1/scoreboards/{}", id_of(&board)),
        format!("/api/v1/gameclocks/{}", id_of(&clock)),
    ] {
        let (status, body) = send(&app, TestRequest::get().uri(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["code"], "not_found");
    }
}

#[rstest]
#[actix_rt::test]
async fn duplicate_scoreboard_for_match_conflicts(league: MemoryApp) {
    let app = init_app(&league).await;
    let match_id = create_match(&app).await;
    let create = || {
        TestRequest::post()
            .uri("/api/v1/scoreboards")
            .set_json(json!({ "matchId": match_id }))
    };

    let (first, _) = send(&app, create()).await;
    let (second, body) = send(&app, create()).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[actix_rt::test]
async fn dependants_of_missing_match_are_not_found(league: MemoryApp) {
    let app = init_app(&league).await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/playclocks")
            .set_json(json!({ "matchId": 404 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_rt::test]
async fn game_clock_runs_on_the_injected_clock(league: MemoryApp) {
    let app = init_app(&league).await;
    let match_id = create_match(&app).await;
    let (_, clock) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/gameclocks")
            .set_json(json!({ "matchId": match_id, "gameclockMax": 600 })),
    )
    .await;
    let clock_id = id_of(&clock);

    let (status, started) = send(
        &app,
        TestRequest::post()
            .uri(&format!("/api/v1/gameclocks/{clock_id}/start"))
            .set_json(json!({ "expectedVersion": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["status"], "running");
    assert_eq!(started["startedAtMs"], KICKOFF_MS);
    assert_eq!(started["version"], 2);

    league.clock.advance_millis(90_000);
    let (status, paused) = send(
        &app,
        TestRequest::post().uri(&format!("/api/v1/gameclocks/{clock_id}/pause")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paused["status"], "paused");
    assert_eq!(paused["gameclock"], 510);

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri(&format!("/api/v1/gameclocks/{clock_id}/reset"))
            .set_json(json!({ "expectedVersion": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["expectedVersion"], 2);
    assert_eq!(body["details"]["actualVersion"], 3);
}

#[rstest]
#[actix_rt::test]
async fn play_clock_start_and_stop(league: MemoryApp) {
    let app = init_app(&league).await;
    let match_id = create_match(&app).await;
    let (status, clock) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/playclocks")
            .set_json(json!({ "matchId": match_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(clock["playclock"].is_null());
    let clock_id = id_of(&clock);

    let (status, running) = send(
        &app,
        TestRequest::post()
            .uri(&format!("/api/v1/playclocks/{clock_id}/start"))
            .set_json(json!({ "seconds": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(running["playclock"], 40);
    assert_eq!(running["status"], "running");

    let (status, stopped) = send(
        &app,
        TestRequest::post().uri(&format!("/api/v1/playclocks/{clock_id}/stop")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stopped["status"], "stopped");
    assert!(stopped["playclock"].is_null());
}

#[rstest]
#[actix_rt::test]
async fn stats_throttle_suppresses_within_interval(league: MemoryApp) {
    let app = init_app(&league).await;
    let acquire = || TestRequest::post().uri("/api/v1/matches/9/stats-throttle/acquire");

    let (status, first) = send(&app, acquire()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["emit"], true);
    assert!(first.get("retryAfterMs").is_none());

    league.clock.advance_millis(400);
    let (_, second) = send(&app, acquire()).await;
    assert_eq!(second["emit"], false);
    assert_eq!(second["retryAfterMs"], 600);
    assert_eq!(second["lastNotifiedAt"], first["lastNotifiedAt"]);

    league.clock.advance_millis(600);
    let (_, third) = send(&app, acquire()).await;
    assert_eq!(third["emit"], true);

    let (status, _) = send(
        &app,
        TestRequest::delete().uri("/api/v1/matches/9/stats-throttle"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, TestRequest::get().uri("/api/v1/matches/9/stats-throttle")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_rt::test]
async fn scoreboard_patch_publishes_one_update(league: MemoryApp) {
    let app = init_app(&league).await;
    let match_id = create_match(&app).await;
    let (_, board) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/scoreboards")
            .set_json(json!({ "matchId": match_id })),
    )
    .await;
    let mut subscription = league.bus.subscribe(&[Channel::ScoreboardChange]);

    let (status, patched) = send(
        &app,
        TestRequest::patch()
            .uri(&format!("/api/v1/scoreboards/{}", id_of(&board)))
            .set_json(json!({ "scoreTeamA": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["scoreTeamA"], 7);

    let (channel, event) = subscription.next().await.expect("scoreboard event");
    assert_eq!(channel, Channel::ScoreboardChange);
    assert_eq!(event.operation, ChangeOperation::Update);
    assert_eq!(event.new_id.map(i64::from), Some(id_of(&board)));
    assert_eq!(event.match_id.map(i64::from), Some(match_id));
}

#[rstest]
#[case::non_numeric_id(TestRequest::get().uri("/api/v1/matches/abc"), "invalid_path")]
#[case::malformed_json(
    TestRequest::post()
        .uri("/api/v1/matches")
        .insert_header(("content-type", "application/json"))
        .set_payload("{"),
    "invalid_body"
)]
#[actix_rt::test]
async fn extractor_failures_use_error_envelope(
    league: MemoryApp,
    #[case] req: TestRequest,
    #[case] detail: &str,
) {
    let app = init_app(&league).await;

    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], detail);
}
