//! Dice and small value constructors

use super::get_random;
use crate::module::Module;
use aurora_core::Vector3;
use aurora_scripting::{CallContext, Result};

/// `Random(n)`: uniform in `0..n`, 0 for `n <= 0`
pub(super) fn random(_module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let max = ctx.int(0)?;
    let value = if max > 0 { get_random(0, max - 1, 1) } else { 0 };
    ctx.set_return(value)
}

pub(super) fn d20(_module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let value = get_random(1, 20, ctx.int(0)?);
    ctx.set_return(value)
}

pub(super) fn d6(_module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let value = get_random(1, 6, ctx.int(0)?);
    ctx.set_return(value)
}

pub(super) fn vector(_module: &mut Module, ctx: &mut CallContext) -> Result<()> {
    let value = Vector3::new(ctx.float(0)?, ctx.float(1)?, ctx.float(2)?);
    ctx.set_return(value)
}
