//! Delayed script actions
//!
//! Pending actions are kept ordered by trigger time. Actions scheduled for
//! the same millisecond keep the order they were scheduled in.
//!
//! A tick drains the queue one action at a time with [`ActionQueue::pop_ready`],
//! so an action that clears other pending work takes effect on the rest of
//! the same tick. Actions scheduled during the drain wait for the next tick.

use aurora_core::ObjectRef;
use aurora_scripting::ScriptState;
use std::collections::BTreeMap;

/// A script resumption waiting for its time
#[derive(Debug, Clone)]
pub struct ScheduledAction {
    /// Game time (ms) at which the action becomes due
    pub timestamp: u64,
    /// Script to resume
    pub script: String,
    /// Saved frame to resume from
    pub state: ScriptState,
    /// Object the script runs as
    pub owner: ObjectRef,
    /// Object that caused the script to run
    pub triggerer: ObjectRef,
}

/// Time-ordered, stable queue of pending actions
#[derive(Debug, Default)]
pub struct ActionQueue {
    pending: BTreeMap<(u64, u64), ScheduledAction>,
    next_seq: u64,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: ScheduledAction) {
        let key = (action.timestamp, self.next_seq);
        self.next_seq += 1;
        self.pending.insert(key, action);
    }

    /// Remove and return every action due at `now`, earliest first
    pub fn take_ready(&mut self, now: u64) -> Vec<ScheduledAction> {
        let later = match now.checked_add(1) {
            Some(bound) => self.pending.split_off(&(bound, 0)),
            None => BTreeMap::new(),
        };
        let ready = std::mem::replace(&mut self.pending, later);
        ready.into_values().collect()
    }

    /// Sequence number the next pushed action will get
    ///
    /// Taken at the start of a drain to tell the actions that were already
    /// pending from those scheduled while draining.
    pub fn next_sequence(&self) -> u64 {
        self.next_seq
    }

    /// Remove and return the earliest action due at `now` that was scheduled
    /// before sequence number `scheduled_before`
    pub fn pop_ready(&mut self, now: u64, scheduled_before: u64) -> Option<ScheduledAction> {
        let key = self
            .pending
            .keys()
            .take_while(|(timestamp, _)| *timestamp <= now)
            .find(|(_, seq)| *seq < scheduled_before)
            .copied()?;
        self.pending.remove(&key)
    }

    /// Drop every pending action owned by `owner`
    pub fn remove_owned_by(&mut self, owner: ObjectRef) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, action| action.owner != owner);
        before - self.pending.len()
    }

    /// Time of the earliest pending action
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|(timestamp, _)| *timestamp)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledAction> {
        self.pending.values()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
