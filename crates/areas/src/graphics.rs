//! Renderer seam
//!
//! The render thread reads object visibility, models and positions every
//! frame. The simulation side takes the [`FrameLock`] around any mutation of
//! that state so a frame never observes it half-updated.

use aurora_core::ObjectHandle;
use parking_lot::{Mutex, MutexGuard};

/// Short, non-reentrant lock shared with the render thread
#[derive(Debug, Default)]
pub struct FrameLock {
    lock: Mutex<()>,
}

/// Held frame lock; released on drop
#[must_use = "the frame lock is released as soon as the guard is dropped"]
pub struct FrameGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl FrameLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the current frame is done, then hold off the next one
    pub fn acquire(&self) -> FrameGuard<'_> {
        FrameGuard {
            _guard: self.lock.lock(),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }
}

/// What the simulation needs from the renderer
pub trait Renderer: Send + Sync {
    fn frame_lock(&self) -> &FrameLock;

    fn show(&self, object: ObjectHandle);

    fn hide(&self, object: ObjectHandle);

    fn load_model(&self, object: ObjectHandle);

    fn unload_model(&self, object: ObjectHandle);
}

/// One renderer call, as seen by [`HeadlessRenderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOp {
    Show(ObjectHandle),
    Hide(ObjectHandle),
    LoadModel(ObjectHandle),
    UnloadModel(ObjectHandle),
}

/// Renderer without a window
///
/// Records every call together with whether the frame lock was held at the
/// time. Used by the headless runner and by tests.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frame_lock: FrameLock,
    ops: Mutex<Vec<(RenderOp, bool)>>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls, oldest first
    pub fn ops(&self) -> Vec<RenderOp> {
        self.ops.lock().iter().map(|(op, _)| *op).collect()
    }

    /// Whether every recorded call happened under the frame lock
    pub fn all_locked(&self) -> bool {
        self.ops.lock().iter().all(|(_, locked)| *locked)
    }

    pub fn clear(&self) {
        self.ops.lock().clear();
    }

    fn record(&self, op: RenderOp) {
        tracing::trace!("render: {:?}", op);
        let locked = self.frame_lock.is_locked();
        self.ops.lock().push((op, locked));
    }
}

impl Renderer for HeadlessRenderer {
    fn frame_lock(&self) -> &FrameLock {
        &self.frame_lock
    }

    fn show(&self, object: ObjectHandle) {
        self.record(RenderOp::Show(object));
    }

    fn hide(&self, object: ObjectHandle) {
        self.record(RenderOp::Hide(object));
    }

    fn load_model(&self, object: ObjectHandle) {
        self.record(RenderOp::LoadModel(object));
    }

    fn unload_model(&self, object: ObjectHandle) {
        self.record(RenderOp::UnloadModel(object));
    }
}
