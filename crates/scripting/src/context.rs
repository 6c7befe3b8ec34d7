//! Per-call execution context
//!
//! One `CallContext` exists for the duration of a single host function call.
//! It holds the already validated argument list and the return slot.

use crate::error::{Result, ScriptError};
use crate::value::{EngineType, ScriptState, Value, ValueType};
use aurora_core::{ObjectRef, Vector3};

/// Where a call comes from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallSite {
    /// Script currently executing
    pub script: String,
    /// Object running the script (`OBJECT_SELF`)
    pub caller: ObjectRef,
    /// Object that caused the script to run
    pub triggerer: ObjectRef,
}

impl CallSite {
    pub fn new(script: impl Into<String>, caller: ObjectRef, triggerer: ObjectRef) -> Self {
        Self {
            script: script.into(),
            caller,
            triggerer,
        }
    }
}

/// Host function call context
#[derive(Debug)]
pub struct CallContext {
    id: u32,
    name: String,
    site: CallSite,
    params: Vec<Value>,
    return_type: ValueType,
    return_value: Value,
}

impl CallContext {
    /// Create a context with the return slot preset to the zero value
    pub fn new(
        id: u32,
        name: impl Into<String>,
        site: CallSite,
        params: Vec<Value>,
        return_type: ValueType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            site,
            params,
            return_type,
            return_value: Value::zero(return_type),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn caller(&self) -> ObjectRef {
        self.site.caller
    }

    pub fn triggerer(&self) -> ObjectRef {
        self.site.triggerer
    }

    pub fn script(&self) -> &str {
        &self.site.script
    }

    pub fn site(&self) -> &CallSite {
        &self.site
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn param(&self, index: usize) -> Result<&Value> {
        self.params.get(index).ok_or_else(|| ScriptError::MissingArgument {
            name: self.name.clone(),
            index,
        })
    }

    pub fn int(&self, index: usize) -> Result<i32> {
        match self.param(index)? {
            Value::Int(v) => Ok(*v),
            other => Err(self.mismatch(index, ValueType::Int, other)),
        }
    }

    pub fn float(&self, index: usize) -> Result<f32> {
        match self.param(index)? {
            Value::Float(v) => Ok(*v),
            other => Err(self.mismatch(index, ValueType::Float, other)),
        }
    }

    pub fn string(&self, index: usize) -> Result<&str> {
        match self.param(index)? {
            Value::String(v) => Ok(v),
            other => Err(self.mismatch(index, ValueType::String, other)),
        }
    }

    /// Raw object argument; the self sentinel is left in place
    pub fn object(&self, index: usize) -> Result<ObjectRef> {
        match self.param(index)? {
            Value::Object(v) => Ok(*v),
            other => Err(self.mismatch(index, ValueType::Object, other)),
        }
    }

    pub fn vector(&self, index: usize) -> Result<Vector3> {
        match self.param(index)? {
            Value::Vector(v) => Ok(*v),
            other => Err(self.mismatch(index, ValueType::Vector, other)),
        }
    }

    pub fn engine(&self, index: usize) -> Result<&EngineType> {
        match self.param(index)? {
            Value::EngineType(v) => Ok(v),
            other => Err(self.mismatch(index, ValueType::EngineType, other)),
        }
    }

    pub fn state(&self, index: usize) -> Result<&ScriptState> {
        match self.param(index)? {
            Value::ScriptState(v) => Ok(v),
            other => Err(self.mismatch(index, ValueType::ScriptState, other)),
        }
    }

    pub fn return_type(&self) -> ValueType {
        self.return_type
    }

    /// Store the call's result
    pub fn set_return(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if value.value_type() != self.return_type {
            return Err(ScriptError::ReturnTypeMismatch {
                name: self.name.clone(),
                expected: self.return_type,
                found: value.value_type(),
            });
        }
        self.return_value = value;
        Ok(())
    }

    pub fn return_value(&self) -> &Value {
        &self.return_value
    }

    pub fn into_return(self) -> Value {
        self.return_value
    }

    fn mismatch(&self, index: usize, expected: ValueType, found: &Value) -> ScriptError {
        ScriptError::TypeMismatch {
            name: self.name.clone(),
            index,
            expected,
            found: found.value_type(),
        }
    }
}
