//! Event queue
//!
//! Events are handled in arrival order, one batch per tick. Whatever is
//! raised while a batch is being handled waits for the next tick.

use crate::module::Module;
use aurora_core::ObjectRef;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Where an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOrigin {
    Input,
    World,
    Ui,
}

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Quit,
    Key { code: u32, pressed: bool },
    MouseMotion { x: i32, y: i32 },
    MouseButton { button: u8, pressed: bool },
    ObjectClicked(ObjectRef),
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub origin: EventOrigin,
    pub kind: EventKind,
}

impl Event {
    pub fn new(origin: EventOrigin, kind: EventKind) -> Self {
        Self { origin, kind }
    }

    pub fn quit() -> Self {
        Self::new(EventOrigin::Ui, EventKind::Quit)
    }
}

/// FIFO of events waiting for the next drain
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Take everything queued so far, leaving the queue empty
    pub fn take_batch(&mut self) -> VecDeque<Event> {
        std::mem::take(&mut self.queue)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Handles the events the module does not consume itself
///
/// New events go through [`Module::add_event`] and are seen next tick.
pub trait EventConsumer {
    fn handle_event(&mut self, module: &mut Module, event: Event);
}

/// Consumer that only logs what it is given
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingConsumer;

impl EventConsumer for LoggingConsumer {
    fn handle_event(&mut self, _module: &mut Module, event: Event) {
        tracing::trace!("Unhandled event: {:?}", event);
    }
}
