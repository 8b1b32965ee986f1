//! Inbound adapters translating external requests into domain service calls.
//!
//! [`http`] serves the REST surface for matches, scoreboards, clocks and the
//! stats throttle. [`ws`] relays change events to subscribed sockets.

pub mod http;
pub mod ws;
