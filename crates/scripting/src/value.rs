//! Script values
//!
//! The closed set of kinds a script can pass to or receive from a host
//! function. Scalars are plain values; objects, structures, engine types and
//! saved script states are handles whose equality is identity.

use aurora_core::{ObjectRef, Vector3};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

fn unit_payload() -> Arc<dyn Any + Send + Sync> {
    static UNIT: OnceLock<Arc<dyn Any + Send + Sync>> = OnceLock::new();
    UNIT.get_or_init(|| Arc::new(())).clone()
}

/// Type tag of a script value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Void,
    Int,
    Float,
    String,
    Object,
    Vector,
    Struct,
    EngineType,
    ScriptState,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Void => "void",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Object => "object",
            ValueType::Vector => "vector",
            ValueType::Struct => "struct",
            ValueType::EngineType => "engine",
            ValueType::ScriptState => "state",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque engine-defined value (a location, an effect, ...)
#[derive(Clone)]
pub struct EngineType {
    kind: &'static str,
    payload: Arc<dyn Any + Send + Sync>,
}

impl EngineType {
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            kind: std::any::type_name::<T>(),
            payload: Arc::new(payload),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// The empty engine value every unset engine-type slot shares
    pub fn null() -> Self {
        Self {
            kind: "()",
            payload: unit_payload(),
        }
    }

    /// Rust type name of the payload
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn ptr_eq(&self, other: &EngineType) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineType({})", self.kind)
    }
}

/// Saved script frame, resumed later by the VM
///
/// Only the VM knows what is inside; the runtime just carries it around.
#[derive(Clone)]
pub struct ScriptState {
    payload: Arc<dyn Any + Send + Sync>,
}

impl ScriptState {
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            payload: Arc::new(payload),
        }
    }

    /// A state carrying no saved frame
    pub fn empty() -> Self {
        Self {
            payload: unit_payload(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is::<()>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &ScriptState) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl Default for ScriptState {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ScriptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("ScriptState(empty)")
        } else {
            f.write_str("ScriptState(..)")
        }
    }
}

/// Script structure, fields in declaration order
#[derive(Debug, Clone, Default)]
pub struct StructValue {
    fields: Arc<Vec<Value>>,
}

impl StructValue {
    pub fn new(fields: Vec<Value>) -> Self {
        Self {
            fields: Arc::new(fields),
        }
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Identity comparison; all empty structures are the same structure
    pub fn ptr_eq(&self, other: &StructValue) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
            || (self.fields.is_empty() && other.fields.is_empty())
    }
}

/// A script value
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Void,
    Int(i32),
    Float(f32),
    String(String),
    Object(ObjectRef),
    Vector(Vector3),
    Struct(StructValue),
    EngineType(EngineType),
    ScriptState(ScriptState),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Void => ValueType::Void,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Object(_) => ValueType::Object,
            Value::Vector(_) => ValueType::Vector,
            Value::Struct(_) => ValueType::Struct,
            Value::EngineType(_) => ValueType::EngineType,
            Value::ScriptState(_) => ValueType::ScriptState,
        }
    }

    /// The zero value of a type: what an unimplemented function returns
    pub fn zero(value_type: ValueType) -> Value {
        match value_type {
            ValueType::Void => Value::Void,
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::Object => Value::Object(ObjectRef::None),
            ValueType::Vector => Value::Vector(Vector3::ZERO),
            ValueType::Struct => Value::Struct(StructValue::default()),
            ValueType::EngineType => Value::EngineType(EngineType::null()),
            ValueType::ScriptState => Value::ScriptState(ScriptState::empty()),
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            Value::Object(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vector3> {
        match self {
            Value::Vector(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a.ptr_eq(b),
            (Value::EngineType(a), Value::EngineType(b)) => a.ptr_eq(b),
            (Value::ScriptState(a), Value::ScriptState(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

impl From<Vector3> for Value {
    fn from(v: Vector3) -> Self {
        Value::Vector(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Int(v as i32)
    }
}
