//! Areas
//!
//! An area is an object in its own right (scripts receive it as an
//! `object`) plus the bookkeeping for its loaded resource.

use aurora_core::ObjectHandle;
use std::sync::atomic::{AtomicBool, Ordering};

/// One loaded area
#[derive(Debug)]
pub struct Area {
    handle: ObjectHandle,
    resref: String,
    name: String,
    visible: AtomicBool,
}

impl Area {
    pub fn new(handle: ObjectHandle, resref: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            handle,
            resref: resref.into(),
            name: name.into(),
            visible: AtomicBool::new(false),
        }
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Resource name the area was loaded from
    pub fn resref(&self) -> &str {
        &self.resref
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the area currently being rendered
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
    }
}
