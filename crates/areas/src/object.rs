//! # World Objects
//!
//! Everything a script can hold a reference to: creatures, placeables,
//! doors, waypoints, areas and the module itself.

use crate::graphics::Renderer;
use aurora_core::{ObjectHandle, ObjectType, Vector3};
use parking_lot::RwLock;

/// Mutable object state read by the render thread
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectState {
    /// Area the object currently belongs to
    pub area: Option<ObjectHandle>,

    /// Position within that area
    pub position: Vector3,

    /// Facing, in degrees
    pub orientation: f32,

    /// Whether the renderer is currently drawing the object
    pub visible: bool,

    /// Whether the renderable model is loaded
    pub model_loaded: bool,
}

/// Individual world object
///
/// # Thread Safety
/// State sits behind a `RwLock` so the render side can sample it while the
/// simulation holds only shared references.
#[derive(Debug)]
pub struct Object {
    handle: ObjectHandle,
    object_type: ObjectType,
    tag: String,
    state: RwLock<ObjectState>,
}

impl Object {
    /// Create a new object
    ///
    /// # Arguments
    /// * `handle` - Identity allocated by the world
    /// * `object_type` - Kind of object
    /// * `tag` - Script-visible tag
    pub fn new(handle: ObjectHandle, object_type: ObjectType, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        tracing::trace!("Creating {} {} \"{}\"", object_type.as_str(), handle, tag);

        Self {
            handle,
            object_type,
            tag,
            state: RwLock::new(ObjectState::default()),
        }
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ObjectState {
        self.state.read().clone()
    }

    pub fn area(&self) -> Option<ObjectHandle> {
        self.state.read().area
    }

    pub fn set_area(&self, area: Option<ObjectHandle>) {
        self.state.write().area = area;
    }

    pub fn position(&self) -> Vector3 {
        self.state.read().position
    }

    pub fn set_position(&self, position: Vector3) {
        self.state.write().position = position;
    }

    pub fn orientation(&self) -> f32 {
        self.state.read().orientation
    }

    pub fn set_orientation(&self, degrees: f32) {
        self.state.write().orientation = degrees.rem_euclid(360.0);
    }

    pub fn is_visible(&self) -> bool {
        self.state.read().visible
    }

    pub fn is_model_loaded(&self) -> bool {
        self.state.read().model_loaded
    }

    /// Load the renderable model, if this kind of object has one.
    /// The caller holds the frame lock.
    pub fn load_model(&self, gfx: &dyn Renderer) {
        if !self.object_type.is_renderable() {
            return;
        }

        let mut state = self.state.write();
        if !state.model_loaded {
            gfx.load_model(self.handle);
            state.model_loaded = true;
        }
    }

    pub fn unload_model(&self, gfx: &dyn Renderer) {
        let mut state = self.state.write();
        if state.model_loaded {
            state.visible = false;
            gfx.unload_model(self.handle);
            state.model_loaded = false;
        }
    }

    /// Start drawing the object. Needs a loaded model.
    pub fn show(&self, gfx: &dyn Renderer) {
        let mut state = self.state.write();
        if state.model_loaded && !state.visible {
            gfx.show(self.handle);
            state.visible = true;
        }
    }

    pub fn hide(&self, gfx: &dyn Renderer) {
        let mut state = self.state.write();
        if state.visible {
            gfx.hide(self.handle);
            state.visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{HeadlessRenderer, RenderOp};
    use aurora_core::ObjectId;

    fn object(object_type: ObjectType) -> Object {
        Object::new(ObjectHandle::new(ObjectId::new(3), 0), object_type, "barrel")
    }

    #[test]
    fn test_object_creation() {
        let obj = object(ObjectType::Placeable);
        assert_eq!(obj.tag(), "barrel");
        assert_eq!(obj.area(), None);
        assert!(!obj.is_visible());
        assert!(!obj.is_model_loaded());
    }

    #[test]
    fn test_show_needs_model() {
        let gfx = HeadlessRenderer::new();
        let obj = object(ObjectType::Placeable);

        obj.show(&gfx);
        assert!(!obj.is_visible());

        obj.load_model(&gfx);
        obj.show(&gfx);
        obj.show(&gfx);
        assert!(obj.is_visible());
        assert_eq!(
            gfx.ops(),
            vec![RenderOp::LoadModel(obj.handle()), RenderOp::Show(obj.handle())]
        );
    }

    #[test]
    fn test_waypoints_have_no_model() {
        let gfx = HeadlessRenderer::new();
        let obj = object(ObjectType::Waypoint);
        obj.load_model(&gfx);
        assert!(!obj.is_model_loaded());
        assert!(gfx.ops().is_empty());
    }

    #[test]
    fn test_orientation_wraps() {
        let obj = object(ObjectType::Creature);
        obj.set_orientation(450.0);
        assert_eq!(obj.orientation(), 90.0);
        obj.set_orientation(-90.0);
        assert_eq!(obj.orientation(), 270.0);
    }
}
