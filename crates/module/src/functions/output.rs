//! Printing and string conversion

use crate::module::Module;
use aurora_scripting::{format_float, format_tag, CallContext, Result, ScriptHost};

pub(super) fn print_string(_module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    tracing::info!(target: "aurora::script", "{}", ctx.string(0)?);
    Ok(())
}

pub(super) fn print_float(_module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let text = format_float(ctx.float(0)?, ctx.int(1)?, ctx.int(2)?);
    tracing::info!(target: "aurora::script", "{}", text);
    Ok(())
}

pub(super) fn float_to_string(_module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let text = format_float(ctx.float(0)?, ctx.int(1)?, ctx.int(2)?);
    ctx.set_return(text)
}

pub(super) fn print_integer(_module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    tracing::info!(target: "aurora::script", "{}", ctx.int(0)?);
    Ok(())
}

pub(super) fn print_object(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let tag = module.object_tag(ctx.object(0)?, ctx.caller());
    tracing::info!(target: "aurora::script", "object<{}>", format_tag(tag.as_deref()));
    Ok(())
}

pub(super) fn int_to_string(_module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let text = ctx.int(0)?.to_string();
    ctx.set_return(text)
}
