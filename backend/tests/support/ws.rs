//! WebSocket-focused test helpers.
//!
//! Integration tests under `backend/tests/` compile as separate crates, so
//! sharing small WebSocket setup helpers helps avoid copy/paste drift.

use std::sync::Arc;

use league_backend::inbound::ws::state::WsState;
use league_backend::outbound::notify::BroadcastChangeBus;

/// Build a `WsState` over a fresh bus, returning both.
pub fn ws_state() -> (WsState, Arc<BroadcastChangeBus>) {
    let bus = Arc::new(BroadcastChangeBus::default());
    (WsState::new(bus.clone()), bus)
}
