//! WebSocket relay for the change feed.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, channel selection)
//! - subscribe before the upgrade completes so no later event is missed
//! - hand the connection to the per-session relay loop

use actix_web::http::header::{HeaderValue, ORIGIN};
use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, warn};
use url::Url;

use crate::domain::{Channel, Error};

mod session;

pub mod messages;
pub mod state;

/// Query string of the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct ChangesQuery {
    /// Comma-separated channel names; empty or absent selects every channel.
    #[serde(default)]
    pub channels: Option<String>,
}

/// Upgrade `/ws/changes` and relay change events as JSON text frames.
#[get("/ws/changes")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    query: web::Query<ChangesQuery>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(origin_header)?;

    let channels = parse_channels(query.channels.as_deref())?;
    let subscription = state.subscriber.subscribe(&channels);
    debug!(channels = ?channels, "change subscriber connected");

    let (response, session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        error
    })?;
    actix_web::rt::spawn(session::handle_ws_session(subscription, session, messages));
    Ok(response)
}

/// Parse the `channels` selection.
///
/// Blank entries are skipped; an empty result means every channel.
fn parse_channels(raw: Option<&str>) -> Result<Vec<Channel>, Error> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<Channel>().map_err(|err| {
                Error::invalid_request(err.to_string()).with_details(json!({
                    "field": "channels",
                    "value": err.name,
                    "code": "unknown_channel",
                }))
            })
        })
        .collect()
}

fn validate_origin(origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if is_allowed_origin(&origin) {
        Ok(())
    } else {
        warn!(origin = origin_value, "Rejected WS upgrade due to disallowed Origin");
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

const PRIMARY_HOST: &str = "league.example";
const LOCALHOST: &str = "localhost";
const ALLOWED_SUBDOMAIN_SUFFIX: &str = ".league.example";

/// HTTPS from the league domain or its subdomains, or HTTP from localhost
/// with an explicit non-zero port.
fn is_allowed_origin(origin: &Url) -> bool {
    let Some(host) = origin.host_str() else {
        return false;
    };

    match origin.scheme() {
        "http" if host == LOCALHOST => matches!(origin.port(), Some(port) if port != 0),
        "https" if host == PRIMARY_HOST => true,
        "https" => host
            .strip_suffix(ALLOWED_SUBDOMAIN_SUFFIX)
            .is_some_and(|label| !label.is_empty()),
        _ => false,
    }
}
