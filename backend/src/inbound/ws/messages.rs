//! Wire-level message definitions for the WebSocket adapter.

use serde::{Deserialize, Serialize};

use crate::domain::{ChangeEvent, Channel};

/// Text frame relayed to subscribers for every change event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFrame {
    /// Channel the event was published on.
    pub channel: Channel,
    pub payload: ChangeEvent,
}

impl From<(Channel, ChangeEvent)> for ChangeFrame {
    fn from((channel, payload): (Channel, ChangeEvent)) -> Self {
        Self { channel, payload }
    }
}
