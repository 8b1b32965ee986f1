//! `tokio::sync::broadcast` backed change bus.
//!
//! Each [`Channel`] owns one broadcast sender. Publishing never blocks and
//! never fails: with no subscribers the event is simply dropped, and a
//! subscriber that falls more than `capacity` events behind skips ahead to
//! the oldest retained event.

use std::collections::BTreeMap;

use futures_util::stream::{self, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{trace, warn};

use crate::domain::ports::{ChangeNotifier, ChangeSubscriber, ChangeSubscription};
use crate::domain::{ChangeEvent, Channel};

/// Buffered events per channel when no capacity is configured.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// In-process pub/sub bus for change events.
#[derive(Debug, Clone)]
pub struct BroadcastChangeBus {
    senders: BTreeMap<Channel, broadcast::Sender<ChangeEvent>>,
}

impl BroadcastChangeBus {
    /// Create a bus buffering up to `capacity` events per channel.
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let senders = Channel::ALL
            .iter()
            .map(|channel| (*channel, broadcast::channel(capacity).0))
            .collect();
        Self { senders }
    }

    /// Number of live subscriptions on `channel`.
    pub fn receiver_count(&self, channel: Channel) -> usize {
        self.senders
            .get(&channel)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    fn receive(channel: Channel, receiver: broadcast::Receiver<ChangeEvent>) -> ChangeSubscription {
        stream::unfold(receiver, move |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => return Some(((channel, event), receiver)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%channel, skipped, "change subscriber lagged; events dropped");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

impl Default for BroadcastChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl ChangeNotifier for BroadcastChangeBus {
    fn publish(&self, channel: Channel, event: &ChangeEvent) {
        let Some(sender) = self.senders.get(&channel) else {
            return;
        };
        match sender.send(event.clone()) {
            Ok(receivers) => trace!(%channel, receivers, "change event published"),
            Err(_) => trace!(%channel, "change event dropped: no subscribers"),
        }
    }
}

impl ChangeSubscriber for BroadcastChangeBus {
    fn subscribe(&self, channels: &[Channel]) -> ChangeSubscription {
        let wanted: &[Channel] = if channels.is_empty() {
            &Channel::ALL
        } else {
            channels
        };
        let mut seen = Vec::with_capacity(wanted.len());
        let streams: Vec<ChangeSubscription> = wanted
            .iter()
            .filter(|channel| {
                if seen.contains(*channel) {
                    false
                } else {
                    seen.push(**channel);
                    true
                }
            })
            .filter_map(|channel| {
                self.senders
                    .get(channel)
                    .map(|sender| Self::receive(*channel, sender.subscribe()))
            })
            .collect();
        stream::select_all(streams).boxed()
    }
}
