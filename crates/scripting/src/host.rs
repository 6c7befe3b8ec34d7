//! Seams between the binding layer, the engine and the script VM

use crate::error::Result;
use crate::value::ScriptState;
use aurora_core::{DiagnosticSink, ObjectRef};

/// What the dispatcher needs from the engine it runs host functions for
pub trait ScriptHost {
    /// Tag of the object a reference names, `None` if it does not resolve.
    /// The self sentinel stands for `caller`.
    fn object_tag(&self, object: ObjectRef, caller: ObjectRef) -> Option<String>;

    /// Where non-fatal diagnostics go
    fn diagnostics(&self) -> &dyn DiagnosticSink;
}

/// The script VM, as seen by the runtime
///
/// The VM owns parsing and execution. The runtime only asks it to run a
/// named script, optionally resuming a saved state, on behalf of an owner.
pub trait ScriptVm<H> {
    fn run(
        &mut self,
        host: &mut H,
        script: &str,
        state: &ScriptState,
        owner: ObjectRef,
        triggerer: ObjectRef,
    ) -> Result<()>;
}
