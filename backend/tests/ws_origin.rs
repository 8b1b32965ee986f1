//! Behavioural tests for WebSocket upgrade validation.

#[path = "support/ws.rs"]
mod ws_support;

use actix_http::Request;
use actix_web::http::header::HeaderValue;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::{StatusCode, header},
    test::TestRequest,
    web,
};
use actix_web::test as actix_test;
use league_backend::inbound::ws;
use league_backend::inbound::ws::state::WsState;
use rstest::{fixture, rstest};

// Example Sec-WebSocket-Key from RFC 6455 section 1.3 used to satisfy handshake requirements.
const RFC6455_SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";

#[fixture]
fn ws_state() -> WsState {
    ws_support::ws_state().0
}

async fn init_app(
    state: WsState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(ws::ws_entry),
    )
    .await
}

fn handshake_request(uri: &str) -> TestRequest {
    TestRequest::get()
        .uri(uri)
        .insert_header((header::UPGRADE, "websocket"))
        .insert_header((header::CONNECTION, "Upgrade"))
        .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
        .insert_header((header::SEC_WEBSOCKET_KEY, RFC6455_SAMPLE_KEY))
}

#[derive(Debug, Clone, Copy)]
/// Upgrade requests that must be refused.
enum RejectedCase {
    /// No Origin header present.
    MissingOrigin,
    /// Origin not in the allow-list.
    UnlistedOrigin,
    /// Multiple Origin headers (forbidden by RFC 6455).
    MultipleOrigins,
    /// Origin header that is not valid UTF-8.
    MalformedOrigin,
    /// Localhost with port 0.
    LocalhostZeroPort,
    /// Allowed origin asking for a channel the service never publishes on.
    UnknownChannel,
}

fn rejected_request(case: RejectedCase) -> Request {
    let base = handshake_request("/ws/changes");
    match case {
        RejectedCase::MissingOrigin => base.to_request(),
        RejectedCase::UnlistedOrigin => base
            .append_header((header::ORIGIN, "https://example.com"))
            .to_request(),
        RejectedCase::MultipleOrigins => base
            .append_header((header::ORIGIN, "https://league.example"))
            .append_header((header::ORIGIN, "https://example.com"))
            .to_request(),
        RejectedCase::MalformedOrigin => {
            let invalid = HeaderValue::from_bytes(&[0x80]).expect("opaque Origin header value");
            base.insert_header((header::ORIGIN, invalid)).to_request()
        }
        RejectedCase::LocalhostZeroPort => base
            .insert_header((header::ORIGIN, "http://localhost:0"))
            .to_request(),
        RejectedCase::UnknownChannel => handshake_request("/ws/changes?channels=score_change")
            .insert_header((header::ORIGIN, "https://league.example"))
            .to_request(),
    }
}

#[rstest]
#[case("https://league.example", "/ws/changes")]
#[case("https://scores.league.example", "/ws/changes?channels=")]
#[case("http://localhost:3000", "/ws/changes?channels=match_change,playclock_change")]
fn upgrades_when_request_is_valid(ws_state: WsState, #[case] origin: &str, #[case] uri: &str) {
    actix_rt::System::new().block_on(async move {
        let app = init_app(ws_state).await;

        let req = handshake_request(uri)
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let response = actix_test::call_service(&app, req).await;
        assert_eq!(
            response.status(),
            StatusCode::SWITCHING_PROTOCOLS,
            "origin {origin}, uri {uri}"
        );
    });
}

#[rstest]
#[case(RejectedCase::MissingOrigin, StatusCode::FORBIDDEN)]
#[case(RejectedCase::UnlistedOrigin, StatusCode::FORBIDDEN)]
#[case(RejectedCase::MultipleOrigins, StatusCode::BAD_REQUEST)]
#[case(RejectedCase::MalformedOrigin, StatusCode::BAD_REQUEST)]
#[case(RejectedCase::LocalhostZeroPort, StatusCode::FORBIDDEN)]
#[case(RejectedCase::UnknownChannel, StatusCode::BAD_REQUEST)]
fn rejects_invalid_upgrades(
    ws_state: WsState,
    #[case] case: RejectedCase,
    #[case] expected: StatusCode,
) {
    actix_rt::System::new().block_on(async move {
        let app = init_app(ws_state).await;

        let response = actix_test::call_service(&app, rejected_request(case)).await;
        assert_eq!(response.status(), expected, "{case:?}");
    });
}
