//! # Aurora Areas
//!
//! World objects and the areas they live in.
//!
//! ## Features
//! - Generational object container with tag lookup
//! - Object reference resolution (self sentinel, stale handles)
//! - Renderer seam guarded by a frame lock
//! - Area transitions with model streaming

pub mod area;
pub mod graphics;
pub mod object;
pub mod resolve;
pub mod transition;
pub mod world;

pub use area::Area;
pub use graphics::{FrameGuard, FrameLock, HeadlessRenderer, RenderOp, Renderer};
pub use object::{Object, ObjectState};
pub use resolve::resolve_ref;
pub use transition::{move_object, Streaming, Transition};
pub use world::World;
