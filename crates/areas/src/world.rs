//! # Object Container
//!
//! Owns every live object and area. Everything else holds handles and
//! looks objects up again at the point of use.

use crate::area::Area;
use crate::graphics::{FrameGuard, Renderer};
use crate::object::Object;
use crate::resolve::resolve_ref;
use aurora_core::{IdGenerator, ObjectHandle, ObjectId, ObjectRef, ObjectType, Vector3};
use dashmap::DashMap;
use std::sync::Arc;

/// All live objects, keyed by slot ID
///
/// # Thread Safety
/// Backed by `DashMap`, so lookups from the render side never block the
/// simulation for long.
pub struct World {
    ids: IdGenerator,
    objects: DashMap<ObjectId, Arc<Object>>,
    areas: DashMap<ObjectId, Arc<Area>>,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        tracing::debug!("Creating World");

        Self {
            ids: IdGenerator::new(),
            objects: DashMap::new(),
            areas: DashMap::new(),
        }
    }

    /// Create an object and place it
    ///
    /// # Arguments
    /// * `object_type` - Kind of object
    /// * `tag` - Script-visible tag
    /// * `area` - Area the object starts in, if any
    /// * `position` - Starting position
    ///
    /// # Returns
    /// The new object. Its handle is only valid until it is destroyed.
    pub fn spawn(
        &self,
        object_type: ObjectType,
        tag: impl Into<String>,
        area: Option<ObjectHandle>,
        position: Vector3,
    ) -> Arc<Object> {
        let handle = self.ids.allocate();
        let object = Arc::new(Object::new(handle, object_type, tag));
        object.set_area(area);
        object.set_position(position);

        self.objects.insert(handle.id, object.clone());
        object
    }

    /// Create an area, registering it as an object too
    ///
    /// # Arguments
    /// * `resref` - Resource name, also used as the area object's tag
    /// * `name` - Display name
    pub fn create_area(&self, resref: impl Into<String>, name: impl Into<String>) -> Arc<Area> {
        let resref = resref.into();
        let object = self.spawn(ObjectType::Area, resref.clone(), None, Vector3::ZERO);
        let area = Arc::new(Area::new(object.handle(), resref, name));

        tracing::debug!("Created area {} \"{}\"", area.handle(), area.resref());
        self.areas.insert(area.handle().id, area.clone());
        area
    }

    /// Destroy an object (or area). Outstanding handles stop resolving.
    ///
    /// # Returns
    /// `false` if the handle was already stale
    pub fn destroy(&self, handle: ObjectHandle) -> bool {
        if self.get(handle).is_none() {
            return false;
        }

        self.objects.remove(&handle.id);
        self.areas.remove(&handle.id);
        self.ids.release(handle)
    }

    /// Look up a live object by exact handle
    pub fn get(&self, handle: ObjectHandle) -> Option<Arc<Object>> {
        self.objects
            .get(&handle.id)
            .filter(|entry| entry.handle() == handle)
            .map(|entry| entry.clone())
    }

    /// Look up a live area by its object handle
    pub fn area(&self, handle: ObjectHandle) -> Option<Arc<Area>> {
        self.areas
            .get(&handle.id)
            .filter(|entry| entry.handle() == handle)
            .map(|entry| entry.clone())
    }

    /// Resolve a script reference
    ///
    /// The self sentinel becomes `caller`. Stale handles and objects of the
    /// invalid type resolve to `None`.
    pub fn resolve(&self, object: ObjectRef, caller: ObjectRef) -> Option<Arc<Object>> {
        let handle = resolve_ref(object, caller).as_handle()?;
        self.get(handle)
            .filter(|object| object.object_type() != ObjectType::Invalid)
    }

    /// The `nth` (zero-based) live object carrying `tag`, in creation order
    pub fn find_by_tag(&self, tag: &str, nth: usize) -> Option<Arc<Object>> {
        let mut matches: Vec<Arc<Object>> = self
            .objects
            .iter()
            .filter(|entry| entry.tag() == tag && entry.object_type() != ObjectType::Invalid)
            .map(|entry| entry.clone())
            .collect();
        matches.sort_by_key(|object| object.handle().id);
        matches.into_iter().nth(nth)
    }

    /// Every object currently in `area`, in creation order
    pub fn objects_in(&self, area: ObjectHandle) -> Vec<Arc<Object>> {
        let mut objects: Vec<Arc<Object>> = self
            .objects
            .iter()
            .filter(|entry| entry.area() == Some(area))
            .map(|entry| entry.clone())
            .collect();
        objects.sort_by_key(|object| object.handle().id);
        objects
    }

    /// Every live area
    pub fn areas(&self) -> Vec<Arc<Area>> {
        let mut areas: Vec<Arc<Area>> = self.areas.iter().map(|entry| entry.clone()).collect();
        areas.sort_by_key(|area| area.handle().id);
        areas
    }

    /// Make an area the rendered one: load and show everything in it
    pub fn show_area(&self, area: &Area, gfx: &dyn Renderer) {
        let objects = self.objects_in(area.handle());
        {
            let frame = gfx.frame_lock().acquire();
            Self::show_objects(area, &objects, gfx, &frame);
        }
        tracing::debug!("Showing area \"{}\" ({} objects)", area.resref(), objects.len());
    }

    /// Show `objects` of `area` while the caller already holds the frame lock
    pub fn show_objects(area: &Area, objects: &[Arc<Object>], gfx: &dyn Renderer, _frame: &FrameGuard<'_>) {
        for object in objects {
            object.load_model(gfx);
            object.show(gfx);
        }
        area.set_visible(true);
    }

    /// Stop rendering an area: hide and release everything in it
    pub fn hide_area(&self, area: &Area, gfx: &dyn Renderer) {
        let objects = self.objects_in(area.handle());
        {
            let _frame = gfx.frame_lock().acquire();
            for object in &objects {
                object.hide(gfx);
                object.unload_model(gfx);
            }
            area.set_visible(false);
        }
        tracing::debug!("Hiding area \"{}\"", area.resref());
    }

    /// Number of live objects, areas included
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
