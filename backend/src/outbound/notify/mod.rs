//! Fan-out of change events to external subscribers.

mod broadcast_bus;

pub use broadcast_bus::{BroadcastChangeBus, DEFAULT_CHANNEL_CAPACITY};
