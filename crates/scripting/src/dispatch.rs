//! Argument preparation and host function invocation

use crate::context::{CallContext, CallSite};
use crate::error::{Result, ScriptError};
use crate::format::format_params;
use crate::host::ScriptHost;
use crate::registry::{Binding, FunctionDescriptor};
use crate::value::Value;

/// Check supplied arguments against a signature and fill in defaults
///
/// Omitted trailing arguments take the descriptor's right-aligned
/// defaults. Types must match exactly.
pub fn prepare_arguments<H>(descriptor: &FunctionDescriptor<H>, mut args: Vec<Value>) -> Result<Vec<Value>> {
    let parameters = &descriptor.signature.parameters;
    if args.len() > parameters.len() {
        return Err(ScriptError::TooManyArguments {
            name: descriptor.name.clone(),
            given: args.len(),
            max: parameters.len(),
        });
    }

    for (index, (arg, expected)) in args.iter().zip(parameters.iter()).enumerate() {
        if arg.value_type() != *expected {
            return Err(ScriptError::TypeMismatch {
                name: descriptor.name.clone(),
                index,
                expected: *expected,
                found: arg.value_type(),
            });
        }
    }

    let first_defaulted = descriptor.first_defaulted();
    for index in args.len()..parameters.len() {
        if index < first_defaulted {
            return Err(ScriptError::MissingArgument {
                name: descriptor.name.clone(),
                index,
            });
        }
        args.push(descriptor.defaults[index - first_defaulted].clone());
    }

    Ok(args)
}

/// Run one host function call and return its result
pub fn invoke<H: ScriptHost>(
    descriptor: &FunctionDescriptor<H>,
    host: &mut H,
    args: Vec<Value>,
    site: CallSite,
) -> Result<Value> {
    let params = prepare_arguments(descriptor, args)?;
    let mut ctx = CallContext::new(
        descriptor.id,
        descriptor.name.as_str(),
        site,
        params,
        descriptor.signature.return_type,
    );

    match descriptor.binding {
        Binding::Native(func) => func(host, &mut ctx)?,
        Binding::Unimplemented => unimplemented_function(host, &mut ctx),
    }

    Ok(ctx.into_return())
}

/// Stub for functions without an implementation
///
/// Emits one warning naming the call and leaves the zero return value.
pub fn unimplemented_function<H: ScriptHost + ?Sized>(host: &mut H, ctx: &mut CallContext) {
    let message = format!("TODO: {}({})", ctx.name(), format_params(ctx, &*host));
    host.diagnostics().warning(&message);
}
