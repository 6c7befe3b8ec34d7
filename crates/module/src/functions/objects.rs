//! Object queries

use super::{get_caller, get_param_object};
use crate::module::Module;
use aurora_core::{ObjectRef, Vector3};
use aurora_scripting::{CallContext, Result};

pub(super) fn set_facing(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let direction = ctx.float(0)?;
    if let Some(caller) = get_caller(module, ctx) {
        caller.set_orientation(direction);
    }
    Ok(())
}

pub(super) fn get_tag(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let tag = get_param_object(module, ctx, 0)?
        .map(|object| object.tag().to_string())
        .unwrap_or_default();
    ctx.set_return(tag)
}

pub(super) fn get_is_object_valid(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let valid = get_param_object(module, ctx, 0)?.is_some();
    ctx.set_return(valid)
}

pub(super) fn get_position(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let position = get_param_object(module, ctx, 0)?
        .map(|object| object.position())
        .unwrap_or(Vector3::ZERO);
    ctx.set_return(position)
}

pub(super) fn get_area(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let area = get_param_object(module, ctx, 0)?.and_then(|object| object.area());
    ctx.set_return(ObjectRef::from(area))
}

pub(super) fn get_module(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    ctx.set_return(module.module_ref())
}

pub(super) fn get_first_pc(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    ctx.set_return(module.pc_ref())
}

/// Distance between two objects in the same area, 0 otherwise
pub(super) fn get_distance_between(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let a = get_param_object(module, ctx, 0)?;
    let b = get_param_object(module, ctx, 1)?;

    let distance = match (a, b) {
        (Some(a), Some(b)) if a.area().is_some() && a.area() == b.area() => {
            a.position().distance_to(b.position())
        }
        _ => 0.0,
    };
    ctx.set_return(distance)
}

pub(super) fn get_object_by_tag(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let tag = ctx.string(0)?;
    let nth = ctx.int(1)?.max(0) as usize;
    let object = module.world().find_by_tag(tag, nth).map(|object| object.handle());
    ctx.set_return(ObjectRef::from(object))
}
