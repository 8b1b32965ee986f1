//! Shared WebSocket adapter state.
//!
//! The relay depends on the subscribing half of the change feed only, so tests
//! can hand it a bus they publish to directly.

use std::sync::Arc;

use crate::domain::ports::ChangeSubscriber;

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub subscriber: Arc<dyn ChangeSubscriber>,
}

impl WsState {
    pub fn new(subscriber: Arc<dyn ChangeSubscriber>) -> Self {
        Self { subscriber }
    }
}
