//! Jumps, locations and module changes

use super::{get_caller, get_param_object, Location};
use crate::module::Module;
use aurora_core::ObjectType;
use aurora_scripting::{CallContext, Result, ScriptError};

/// `JumpToObject(target)`: move the caller next to `target`
pub(super) fn jump_to_object(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let Some(target) = get_param_object(module, ctx, 0)? else {
        return Ok(());
    };
    let Some(caller) = get_caller(module, ctx) else {
        return Ok(());
    };

    let area = target.area().and_then(|handle| module.world().area(handle));
    module.jump_to(&caller, area.as_deref(), target.position());
    Ok(())
}

/// `JumpToLocation(location)`: move the caller to a location
pub(super) fn jump_to_location(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let Some(location) = ctx.engine(0)?.downcast_ref::<Location>().copied() else {
        tracing::debug!("JumpToLocation(): not a location");
        return Ok(());
    };
    let Some(caller) = get_caller(module, ctx) else {
        return Ok(());
    };

    let area = location.area.and_then(|handle| module.world().area(handle));
    if module.jump_to(&caller, area.as_deref(), location.position).is_some() {
        let _frame = module.renderer().frame_lock().acquire();
        caller.set_orientation(location.orientation);
    }
    Ok(())
}

/// `Location(area, position, orientation)`
pub(super) fn location(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let area = get_param_object(module, ctx, 0)?
        .filter(|object| object.object_type() == ObjectType::Area)
        .map(|object| object.handle());

    let location = Location {
        area,
        position: ctx.vector(1)?,
        orientation: ctx.float(2)?,
    };
    ctx.set_return(location.into_value())
}

pub(super) fn get_location(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let location = match get_param_object(module, ctx, 0)? {
        Some(object) => Location::of(&object),
        None => Location {
            area: None,
            position: Default::default(),
            orientation: 0.0,
        },
    };
    ctx.set_return(location.into_value())
}

/// `StartNewModule(name)`: switch modules once the current tick is done
pub(super) fn start_new_module(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let name = ctx.string(0)?.to_string();
    module
        .load(&name, None)
        .map_err(|err| ScriptError::RuntimeError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::tests::running;
    use aurora_core::{ObjectRef, Vector3};
    use aurora_scripting::{CallSite, Value, ValueType};

    #[test]
    fn test_get_location_of_object() {
        let mut f = running();
        let guard = f.module.world().find_by_tag("guard", 0).unwrap();
        let site = CallSite::new("s", ObjectRef::None, ObjectRef::None);
        let mut ctx = CallContext::new(
            21,
            "GetLocation",
            site,
            vec![Value::Object(ObjectRef::Handle(guard.handle()))],
            ValueType::EngineType,
        );

        get_location(&mut f.module, &mut ctx).unwrap();
        let value = ctx.into_return();
        let Value::EngineType(engine) = value else {
            panic!("expected an engine value");
        };
        let location = engine.downcast_ref::<Location>().unwrap();
        assert_eq!(location.area, guard.area());
        assert_eq!(location.position, Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_jump_to_object_moves_caller() {
        let mut f = running();
        let guard = f.module.world().find_by_tag("guard", 0).unwrap();
        let site = CallSite::new("s", f.module.pc_ref(), ObjectRef::None);
        let mut ctx = CallContext::new(
            18,
            "JumpToObject",
            site,
            vec![Value::Object(ObjectRef::Handle(guard.handle())), Value::Int(1)],
            ValueType::Void,
        );

        jump_to_object(&mut f.module, &mut ctx).unwrap();
        assert_eq!(f.module.pc().unwrap().position(), guard.position());
        assert_eq!(f.module.moved_pc_count(), 1);
    }
}
