//! # Aurora Module Runtime
//!
//! Everything that happens per tick once a module is loaded.
//!
//! ## Features
//! - Module lifecycle: load, enter, leave, deferred module switch
//! - Event FIFO drained once per tick
//! - Delayed script actions with liveness checks on their objects
//! - The host-function catalogue bound into the VM call table

pub mod actions;
pub mod content;
pub mod engine;
pub mod events;
pub mod functions;
pub mod module;

pub use actions::{ActionQueue, ScheduledAction};
pub use content::{AreaTemplate, ChangeId, ContentLoader, ModuleInfo, PlacedObject, StaticContent};
pub use engine::Engine;
pub use events::{Event, EventConsumer, EventKind, EventOrigin, EventQueue, LoggingConsumer};
pub use functions::{get_random, Location, ScriptFunctions, MAX_RANDOM_ROLLS};
pub use module::{Module, ModuleState, PendingModule};
