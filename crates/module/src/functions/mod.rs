//! # Script Functions
//!
//! The engine's host-function catalogue and the object binding it into the
//! VM's call table. Creating [`ScriptFunctions`] registers every entry;
//! dropping it removes exactly those entries again.

mod commands;
mod math;
mod movement;
mod objects;
mod output;
pub mod tables;

use crate::module::Module;
use aurora_areas::Object;
use aurora_core::{ObjectHandle, Vector3};
use aurora_scripting::{
    CallContext, CallTable, EngineType, FunctionRegistry, Registration, Result, Value,
};
use rand::Rng;
use std::sync::Arc;

/// Engine binding of the host-function catalogue
pub struct ScriptFunctions {
    registration: Registration<Module>,
}

impl ScriptFunctions {
    /// Build the catalogue and register it into `call_table`
    ///
    /// Fails if the catalogue is malformed or clashes with entries already
    /// in the table.
    pub fn install(call_table: &Arc<CallTable<Module>>) -> Result<Self> {
        let table = FunctionRegistry::build(&tables::catalogue())?;
        let unimplemented = table.unimplemented_count();
        let registration = table.install(call_table)?;

        tracing::info!(
            "Registered {} script functions ({} unimplemented)",
            registration.len(),
            unimplemented
        );

        Ok(Self { registration })
    }

    /// IDs this binding registered
    pub fn ids(&self) -> &[u32] {
        self.registration.ids()
    }

    pub fn len(&self) -> usize {
        self.registration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registration.is_empty()
    }
}

/// A place in the world, as scripts pass it around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub area: Option<ObjectHandle>,
    pub position: Vector3,
    /// Facing, in degrees
    pub orientation: f32,
}

impl Location {
    pub fn of(object: &Object) -> Self {
        Self {
            area: object.area(),
            position: object.position(),
            orientation: object.orientation(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::EngineType(EngineType::new(self))
    }
}

/// Resolve an object parameter against the module's world
pub(crate) fn get_param_object(module: &Module, ctx: &CallContext, n: usize) -> Result<Option<Arc<Object>>> {
    Ok(module.world().resolve(ctx.object(n)?, ctx.caller()))
}

/// The object running the current script, if it still exists
pub(crate) fn get_caller(module: &Module, ctx: &CallContext) -> Option<Arc<Object>> {
    module
        .world()
        .resolve(aurora_core::ObjectRef::Caller, ctx.caller())
}

/// Most dice a single roll may throw
pub const MAX_RANDOM_ROLLS: i32 = 1000;

/// Sum of `n` uniform rolls in `min..=max`, saturating at the `i32` range
///
/// `n` is clamped to `1..=MAX_RANDOM_ROLLS`.
pub fn get_random(min: i32, max: i32, n: i32) -> i32 {
    let mut rng = rand::thread_rng();
    let max = max.max(min);
    let total: i64 = (0..n.clamp(1, MAX_RANDOM_ROLLS))
        .map(|_| i64::from(rng.gen_range(min..=max)))
        .sum();
    total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Script delays are in seconds, the clock in milliseconds
pub(crate) fn seconds_to_ms(seconds: f32) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}
