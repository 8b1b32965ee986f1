//! Ports for publishing and subscribing to row change notifications.
//!
//! Publishing is fire-and-forget. Adapters must swallow delivery problems
//! (including the absence of subscribers) so a committed write never fails
//! because nobody was listening.

use std::pin::Pin;

use futures_util::Stream;

use crate::domain::{ChangeEvent, Channel};

/// Stream of events relayed to one subscriber.
///
/// Events a slow subscriber misses are skipped; the stream only ends when the
/// publisher side is dropped.
pub type ChangeSubscription = Pin<Box<dyn Stream<Item = (Channel, ChangeEvent)> + Send>>;

/// Publishing half of the change feed.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeNotifier: Send + Sync {
    /// Make one delivery attempt of `event` on `channel`.
    fn publish(&self, channel: Channel, event: &ChangeEvent);
}

/// Listening half of the change feed.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeSubscriber: Send + Sync {
    /// Start listening on `channels`.
    ///
    /// Only events published after this call returns are delivered.
    fn subscribe(&self, channels: &[Channel]) -> ChangeSubscription;
}

/// Notifier that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChangeNotifier;

impl ChangeNotifier for NoopChangeNotifier {
    fn publish(&self, _channel: Channel, _event: &ChangeEvent) {}
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::{RowChange, WatchedTable};

    #[rstest]
    fn noop_notifier_accepts_events() {
        let event = ChangeEvent::from_row_change(&RowChange::inserted(WatchedTable::Match, 1, None));
        NoopChangeNotifier.publish(Channel::MatchChange, &event);
    }
}
