//! Function signatures and default arguments

use crate::error::{Result, ScriptError};
use crate::value::{Value, ValueType};
use aurora_core::{ObjectRef, Vector3};
use std::fmt;

/// Parameter and return types of one host function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub return_type: ValueType,
    pub parameters: Vec<ValueType>,
}

impl Signature {
    pub fn new(return_type: ValueType, parameters: Vec<ValueType>) -> Self {
        Self {
            return_type,
            parameters,
        }
    }

    /// Build a signature from a catalogue row
    ///
    /// The row ends at the first `Void`. Anything but `Void` after that is a
    /// catalogue defect.
    pub fn from_row(id: u32, name: &str, return_type: ValueType, row: &[ValueType]) -> Result<Self> {
        let end = row
            .iter()
            .position(|t| *t == ValueType::Void)
            .unwrap_or(row.len());

        if row[end..].iter().any(|t| *t != ValueType::Void) {
            return Err(ScriptError::CatalogueTypeAfterVoid {
                id,
                name: name.to_string(),
            });
        }

        Ok(Self::new(return_type, row[..end].to_vec()))
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.return_type)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")
    }
}

/// Default argument as written in a static catalogue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Int(i32),
    Float(f32),
    Str(&'static str),
    Object(ObjectRef),
    Vector(Vector3),
}

impl DefaultValue {
    /// `OBJECT_SELF`
    pub const OBJECT_SELF: DefaultValue = DefaultValue::Object(ObjectRef::Caller);
    /// `OBJECT_INVALID`
    pub const OBJECT_INVALID: DefaultValue = DefaultValue::Object(ObjectRef::None);

    pub fn value_type(&self) -> ValueType {
        match self {
            DefaultValue::Int(_) => ValueType::Int,
            DefaultValue::Float(_) => ValueType::Float,
            DefaultValue::Str(_) => ValueType::String,
            DefaultValue::Object(_) => ValueType::Object,
            DefaultValue::Vector(_) => ValueType::Vector,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DefaultValue::Int(v) => Value::Int(*v),
            DefaultValue::Float(v) => Value::Float(*v),
            DefaultValue::Str(v) => Value::String((*v).to_string()),
            DefaultValue::Object(v) => Value::Object(*v),
            DefaultValue::Vector(v) => Value::Vector(*v),
        }
    }
}

/// Copy a catalogue defaults row up to its first absent entry and check it
/// against the trailing parameters it stands in for
pub fn defaults_from_row(
    name: &str,
    signature: &Signature,
    row: &[Option<DefaultValue>],
) -> Result<Vec<Value>> {
    let defaults: Vec<DefaultValue> = row.iter().map_while(|d| *d).collect();

    if defaults.len() > signature.arity() {
        return Err(ScriptError::CatalogueDefaults {
            name: name.to_string(),
            message: format!(
                "{} defaults for {} parameters",
                defaults.len(),
                signature.arity()
            ),
        });
    }

    let first_defaulted = signature.arity() - defaults.len();
    for (offset, default) in defaults.iter().enumerate() {
        let expected = signature.parameters[first_defaulted + offset];
        if default.value_type() != expected {
            return Err(ScriptError::CatalogueDefaults {
                name: name.to_string(),
                message: format!(
                    "default for parameter {} is {}, parameter is {}",
                    first_defaulted + offset,
                    default.value_type(),
                    expected
                ),
            });
        }
    }

    Ok(defaults.iter().map(DefaultValue::to_value).collect())
}
