//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Object slot ID (32-bit unsigned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ObjectId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Identity of one live object: slot ID plus the generation the slot had
/// when the object was created.
///
/// A handle never owns the object. Once the object is destroyed the slot
/// generation moves on and the handle stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectHandle {
    pub id: ObjectId,
    pub generation: u32,
}

impl ObjectHandle {
    pub const fn new(id: ObjectId, generation: u32) -> Self {
        Self { id, generation }
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.id.0, self.generation)
    }
}

/// Script-visible object reference
///
/// Scripts pass objects around either by concrete identity or symbolically
/// as "the caller" (`OBJECT_SELF`). `None` is `OBJECT_INVALID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObjectRef {
    #[default]
    None,
    /// The reserved self sentinel, meaning whoever is executing the call
    Caller,
    Handle(ObjectHandle),
}

impl ObjectRef {
    pub const fn handle(handle: ObjectHandle) -> Self {
        Self::Handle(handle)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Substitute the self sentinel with the concrete caller.
    ///
    /// This never looks at the world: whether the result is still alive is
    /// decided by whoever resolves it.
    pub fn or_caller(self, caller: ObjectRef) -> ObjectRef {
        match self {
            Self::Caller => caller,
            other => other,
        }
    }

    pub fn as_handle(&self) -> Option<ObjectHandle> {
        match self {
            Self::Handle(handle) => Some(*handle),
            _ => None,
        }
    }
}

impl From<ObjectHandle> for ObjectRef {
    fn from(handle: ObjectHandle) -> Self {
        Self::Handle(handle)
    }
}

impl From<Option<ObjectHandle>> for ObjectRef {
    fn from(handle: Option<ObjectHandle>) -> Self {
        handle.map_or(Self::None, Self::Handle)
    }
}

/// Kind of world object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Invalid,
    Module,
    Area,
    Creature,
    Placeable,
    Door,
    Waypoint,
    Trigger,
    Item,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Module => "module",
            Self::Area => "area",
            Self::Creature => "creature",
            Self::Placeable => "placeable",
            Self::Door => "door",
            Self::Waypoint => "waypoint",
            Self::Trigger => "trigger",
            Self::Item => "item",
        }
    }

    /// Objects that own a renderable model
    pub fn is_renderable(&self) -> bool {
        matches!(
            self,
            Self::Creature | Self::Placeable | Self::Door | Self::Item
        )
    }
}
