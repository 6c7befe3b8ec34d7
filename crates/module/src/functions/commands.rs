//! Deferred script execution

use super::{get_param_object, seconds_to_ms};
use crate::module::Module;
use aurora_core::ObjectRef;
use aurora_scripting::{CallContext, Result, ScriptState};

/// `AssignCommand(object, action)`: run the action as `object`
pub(super) fn assign_command(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let state = ctx.state(1)?.clone();
    let Some(object) = get_param_object(module, ctx, 0)? else {
        return Ok(());
    };

    module.delay_script(ctx.script(), state, ObjectRef::Handle(object.handle()), ctx.triggerer(), 0);
    Ok(())
}

/// `DelayCommand(seconds, action)`: run the action as the caller, later
pub(super) fn delay_command(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let delay = seconds_to_ms(ctx.float(0)?);
    let state = ctx.state(1)?.clone();

    module.delay_script(ctx.script(), state, ctx.caller(), ctx.triggerer(), delay);
    Ok(())
}

/// `ExecuteScript(script, target)`: run a whole script as `target`
pub(super) fn execute_script(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let script = ctx.string(0)?.to_string();
    let Some(target) = get_param_object(module, ctx, 1)? else {
        tracing::debug!("ExecuteScript(\"{}\"): no target", script);
        return Ok(());
    };

    module.delay_script(&script, ScriptState::empty(), ObjectRef::Handle(target.handle()), ctx.caller(), 0);
    Ok(())
}

/// `ClearAllActions()`: drop the caller's pending actions
pub(super) fn clear_all_actions(module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let removed = module.clear_actions(ctx.caller());
    tracing::trace!("Cleared {} actions", removed);
    Ok(())
}
