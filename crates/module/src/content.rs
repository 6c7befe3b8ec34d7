//! # Content Loading
//!
//! The module never reads game files itself. Resources, module
//! descriptors, areas and surface tables come from a [`ContentLoader`].

use aurora_core::{AuroraError, ObjectType, Result, Vector3};
use serde::Deserialize;
use std::collections::HashMap;

/// Token for a set of resources added to the resource manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeId(pub u64);

/// Module descriptor
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModuleInfo {
    /// Display name
    pub name: String,
    /// Areas making up the module
    pub areas: Vec<String>,
    /// Area the player starts in
    pub entry_area: String,
    pub entry_position: Vector3,
    /// Facing at the entry point, in degrees
    pub entry_orientation: f32,
    /// Script run once the module is entered
    pub on_module_load: Option<String>,
    /// Script run when the player enters
    pub on_client_enter: Option<String>,
}

/// Object placed in an area by the content
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacedObject {
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub tag: String,
    #[serde(default)]
    pub position: Vector3,
    #[serde(default)]
    pub orientation: f32,
}

/// Area as loaded from content
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AreaTemplate {
    pub name: String,
    pub objects: Vec<PlacedObject>,
}

/// Resource manager and file loaders, as seen by the module
pub trait ContentLoader: Send {
    /// Make a module's resources available
    fn add_module_resources(&mut self, module: &str) -> Result<ChangeId>;

    /// Make a texture pack (0..=3) available
    fn add_texture_pack(&mut self, pack: u8) -> Result<ChangeId>;

    /// Revert a previously added resource set
    fn remove_resources(&mut self, change: ChangeId);

    fn load_ifo(&self, module: &str) -> Result<ModuleInfo>;

    fn load_area(&self, resref: &str) -> Result<AreaTemplate>;

    /// Walkability per surface type index
    fn load_surface_types(&self) -> Result<Vec<bool>>;
}

/// In-memory content, usually deserialized from JSON
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StaticContent {
    pub modules: HashMap<String, ModuleInfo>,
    pub areas: HashMap<String, AreaTemplate>,
    pub surfaces: Vec<bool>,

    #[serde(skip)]
    active: Vec<(ChangeId, String)>,
    #[serde(skip)]
    next_change: u64,
}

impl StaticContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse content from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AuroraError::Content(e.to_string()))
    }

    pub fn with_module(mut self, key: impl Into<String>, info: ModuleInfo) -> Self {
        self.modules.insert(key.into(), info);
        self
    }

    pub fn with_area(mut self, resref: impl Into<String>, area: AreaTemplate) -> Self {
        self.areas.insert(resref.into(), area);
        self
    }

    /// Names of the resource sets currently added, oldest first
    pub fn active_resources(&self) -> Vec<&str> {
        self.active.iter().map(|(_, name)| name.as_str()).collect()
    }

    fn add(&mut self, name: String) -> ChangeId {
        let change = ChangeId(self.next_change);
        self.next_change += 1;
        tracing::trace!("Adding resources {} ({:?})", name, change);
        self.active.push((change, name));
        change
    }
}

impl ContentLoader for StaticContent {
    fn add_module_resources(&mut self, module: &str) -> Result<ChangeId> {
        if !self.modules.contains_key(module) {
            return Err(AuroraError::NotFound(format!("module \"{}\"", module)));
        }
        Ok(self.add(format!("module:{}", module)))
    }

    fn add_texture_pack(&mut self, pack: u8) -> Result<ChangeId> {
        if pack > 3 {
            return Err(AuroraError::InvalidData(format!("texture pack {}", pack)));
        }
        Ok(self.add(format!("textures:{}", pack)))
    }

    fn remove_resources(&mut self, change: ChangeId) {
        self.active.retain(|(id, _)| *id != change);
    }

    fn load_ifo(&self, module: &str) -> Result<ModuleInfo> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| AuroraError::NotFound(format!("module.ifo for \"{}\"", module)))
    }

    fn load_area(&self, resref: &str) -> Result<AreaTemplate> {
        self.areas
            .get(resref)
            .cloned()
            .ok_or_else(|| AuroraError::NotFound(format!("area \"{}\"", resref)))
    }

    fn load_surface_types(&self) -> Result<Vec<bool>> {
        Ok(self.surfaces.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "modules": {
            "tutorial": {
                "name": "Tutorial",
                "areas": ["docks"],
                "entry_area": "docks",
                "entry_position": {"x": 1.0, "y": 2.0, "z": 0.0},
                "on_client_enter": "tut_enter"
            }
        },
        "areas": {
            "docks": {
                "name": "The Docks",
                "objects": [{"type": "waypoint", "tag": "wp_start"}]
            }
        },
        "surfaces": [true, false, true]
    }"#;

    #[test]
    fn test_from_json() {
        let content = StaticContent::from_json(JSON).unwrap();
        let ifo = content.load_ifo("tutorial").unwrap();
        assert_eq!(ifo.name, "Tutorial");
        assert_eq!(ifo.entry_position, Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(ifo.on_client_enter.as_deref(), Some("tut_enter"));
        assert_eq!(ifo.on_module_load, None);

        let docks = content.load_area("docks").unwrap();
        assert_eq!(docks.objects[0].object_type, ObjectType::Waypoint);
        assert_eq!(content.load_surface_types().unwrap(), vec![true, false, true]);
    }

    #[test]
    fn test_resource_sets() {
        let mut content = StaticContent::from_json(JSON).unwrap();
        let module = content.add_module_resources("tutorial").unwrap();
        let textures = content.add_texture_pack(2).unwrap();
        assert_eq!(content.active_resources(), vec!["module:tutorial", "textures:2"]);

        content.remove_resources(module);
        assert_eq!(content.active_resources(), vec!["textures:2"]);
        content.remove_resources(textures);
        assert!(content.active_resources().is_empty());

        assert!(content.add_module_resources("missing").is_err());
        assert!(content.add_texture_pack(4).is_err());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            StaticContent::from_json("{\"modules\": 3}"),
            Err(AuroraError::Content(_))
        ));
    }
}
