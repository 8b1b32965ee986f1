//! Per-connection relay loop.
//!
//! Forwards every event from the subscription as a `ChangeFrame` text frame.
//! The public contract pings every 5s and drops a connection after 10s without
//! client traffic; tests shorten both. Text sent by the client is read and
//! ignored.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use futures_util::StreamExt;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::ports::ChangeSubscription;
use crate::domain::{ChangeEvent, Channel};
use crate::inbound::ws::messages::ChangeFrame;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    subscription: ChangeSubscription,
    session: Session,
    stream: MessageStream,
) {
    RelaySession::new(subscription).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    FeedClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

struct RelaySession {
    subscription: ChangeSubscription,
}

impl RelaySession {
    fn new(subscription: ChangeSubscription) -> Self {
        Self { subscription }
    }

    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                event = self.subscription.next() => {
                    relay_event(&mut session, event).await
                }
            };

            if let Err(error) = result {
                log_shutdown_reason(&error);
                close_session(session, close_reason_for(error)).await;
                return;
            }
        }
    }
}

async fn handle_heartbeat_tick(
    session: &mut Session,
    last_heartbeat: &Instant,
) -> Result<(), SessionError> {
    if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }
    session.ping(b"").await.map_err(SessionError::Network)
}

async fn handle_stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionError> {
    let Some(message) = message else {
        return Err(SessionError::StreamClosed);
    };

    match message.map_err(SessionError::Protocol)? {
        Message::Ping(payload) => {
            *last_heartbeat = Instant::now();
            session.pong(&payload).await.map_err(SessionError::Network)
        }
        Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        Message::Text(_)
        | Message::Pong(_)
        | Message::Binary(_)
        | Message::Continuation(_)
        | Message::Nop => {
            *last_heartbeat = Instant::now();
            Ok(())
        }
    }
}

async fn relay_event(
    session: &mut Session,
    event: Option<(Channel, ChangeEvent)>,
) -> Result<(), SessionError> {
    let Some(event) = event else {
        return Err(SessionError::FeedClosed);
    };
    let frame = ChangeFrame::from(event);
    match serde_json::to_string(&frame) {
        Ok(body) => session.text(body).await.map_err(SessionError::Network),
        Err(error) => {
            warn!(error = %error, channel = %frame.channel, "Failed to serialise change frame");
            Ok(())
        }
    }
}

fn log_shutdown_reason(error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!("WebSocket heartbeat timeout; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(error = %error, "WebSocket protocol error");
        }
        SessionError::Network(error) => {
            warn!(error = %error, "WebSocket send failed; closing connection");
        }
        SessionError::FeedClosed => {
            debug!("change feed closed; disconnecting subscriber");
        }
        SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
    }
}

fn close_reason_for(error: SessionError) -> Option<Option<CloseReason>> {
    match error {
        SessionError::HeartbeatTimeout => Some(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::Protocol(_) => Some(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::FeedClosed => Some(Some(CloseReason {
            code: CloseCode::Away,
            description: Some("change feed closed".to_owned()),
        })),
        SessionError::ClientClosed(reason) => Some(reason),
        SessionError::StreamClosed | SessionError::Network(_) => None,
    }
}

async fn close_session(session: Session, reason: Option<Option<CloseReason>>) {
    let Some(reason) = reason else {
        return;
    };
    if let Err(error) = session.close(reason).await {
        warn!(error = %error, "Failed to close WebSocket session");
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
