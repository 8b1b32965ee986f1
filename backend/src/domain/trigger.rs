//! Mutation triggers and the change feed that fires them.
//!
//! A [`MutationTrigger`] binds one watched table to a channel. The
//! [`ChangeFeed`] keeps at most one trigger per table and, when a service
//! reports a committed [`RowChange`], builds the payload and makes exactly one
//! publish attempt through the [`ChangeNotifier`] port.
//!
//! Services call [`ChangeFeed::fire`] only after the repository write has
//! returned, so listeners never observe a change that was rolled back.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::domain::ports::ChangeNotifier;
use crate::domain::{ChangeEvent, Channel, RowChange, WatchedTable};

/// Row-level trigger firing on INSERT, UPDATE and DELETE of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTrigger {
    name: String,
    table: WatchedTable,
    channel: Channel,
}

impl MutationTrigger {
    /// Bind `table` to `channel` under `name`.
    pub fn new(name: impl Into<String>, table: WatchedTable, channel: Channel) -> Self {
        Self {
            name: name.into(),
            table,
            channel,
        }
    }

    /// Current trigger for `table`, named `<table>_change_trigger` and
    /// publishing on the table's own channel.
    #[must_use]
    pub fn for_table(table: WatchedTable) -> Self {
        Self::new(
            format!("{}_change_trigger", table.table_name()),
            table,
            table.channel(),
        )
    }

    /// First-generation play clock trigger, superseded by
    /// [`MutationTrigger::for_table`].
    #[must_use]
    pub fn legacy_playclock() -> Self {
        Self::new(
            "playclock_notify_trigger",
            WatchedTable::PlayClock,
            Channel::PlayClockChange,
        )
    }

    /// Trigger name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Watched table.
    #[must_use]
    pub fn table(&self) -> WatchedTable {
        self.table
    }

    /// Channel notifications are published on.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }
}

/// Outcome of binding a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCreation {
    /// No trigger was bound to the table before.
    Created,
    /// A trigger was already bound; nothing changed.
    AlreadyExists,
    /// An existing trigger was swapped for the new one.
    Replaced,
}

/// Registry of mutation triggers plus the publisher they fire into.
pub struct ChangeFeed {
    notifier: Arc<dyn ChangeNotifier>,
    triggers: RwLock<BTreeMap<WatchedTable, MutationTrigger>>,
}

impl ChangeFeed {
    /// Feed with no triggers bound.
    pub fn new(notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self {
            notifier,
            triggers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Feed with the trigger history applied: the legacy play clock trigger,
    /// then the match, scoreboard and game clock triggers, then the play clock
    /// replacement.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use league_backend::domain::ChangeFeed;
    /// use league_backend::domain::ports::NoopChangeNotifier;
    ///
    /// let feed = ChangeFeed::with_default_triggers(Arc::new(NoopChangeNotifier));
    /// assert_eq!(feed.trigger_count(), 4);
    /// ```
    pub fn with_default_triggers(notifier: Arc<dyn ChangeNotifier>) -> Self {
        let feed = Self::new(notifier);
        feed.create_trigger(MutationTrigger::legacy_playclock());
        for table in [
            WatchedTable::Match,
            WatchedTable::Scoreboard,
            WatchedTable::GameClock,
        ] {
            feed.create_trigger(MutationTrigger::for_table(table));
        }
        feed.create_or_replace_trigger(MutationTrigger::for_table(WatchedTable::PlayClock));
        feed
    }

    /// Bind `trigger` unless its table already has one.
    ///
    /// Applying the same step twice is not an error and leaves exactly one
    /// trigger on the table.
    pub fn create_trigger(&self, trigger: MutationTrigger) -> TriggerCreation {
        let mut triggers = self.write();
        if let Some(existing) = triggers.get(&trigger.table) {
            debug!(
                trigger = existing.name(),
                table = %trigger.table,
                "trigger already bound"
            );
            return TriggerCreation::AlreadyExists;
        }
        info!(trigger = trigger.name(), table = %trigger.table, "trigger created");
        triggers.insert(trigger.table, trigger);
        TriggerCreation::Created
    }

    /// Bind `trigger`, replacing any trigger already on its table.
    pub fn create_or_replace_trigger(&self, trigger: MutationTrigger) -> TriggerCreation {
        let table = trigger.table;
        let name = trigger.name.clone();
        match self.write().insert(table, trigger) {
            Some(previous) => {
                info!(trigger = %name, replaced = previous.name(), %table, "trigger replaced");
                TriggerCreation::Replaced
            }
            None => {
                info!(trigger = %name, %table, "trigger created");
                TriggerCreation::Created
            }
        }
    }

    /// Unbind the trigger on `table`. Returns whether one was bound.
    pub fn drop_trigger(&self, table: WatchedTable) -> bool {
        self.write().remove(&table).is_some()
    }

    /// Snapshot of the bound triggers, ordered by table.
    #[must_use]
    pub fn bound_triggers(&self) -> Vec<MutationTrigger> {
        self.read().values().cloned().collect()
    }

    /// Number of bound triggers.
    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.read().len()
    }

    /// Fire the trigger bound to the change's table.
    ///
    /// Returns the published payload, or `None` when the table has no trigger.
    /// Delivery is best-effort and never reported back to the caller.
    pub fn fire(&self, change: &RowChange) -> Option<ChangeEvent> {
        let channel = self.read().get(&change.table()).map(MutationTrigger::channel)?;
        let event = ChangeEvent::from_row_change(change);
        debug!(
            %channel,
            table = %event.table,
            operation = %event.operation,
            old_id = event.old_id,
            "publishing row change"
        );
        self.notifier.publish(channel, &event);
        Some(event)
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<WatchedTable, MutationTrigger>> {
        self.triggers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<WatchedTable, MutationTrigger>> {
        self.triggers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("triggers", &self.bound_triggers())
            .finish_non_exhaustive()
    }
}
