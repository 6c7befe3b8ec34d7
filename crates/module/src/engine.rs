//! Tick driver
//!
//! Ties the module to the script VM, the function binding and the event
//! consumer, and advances all of them one tick at a time.

use crate::events::EventConsumer;
use crate::functions::ScriptFunctions;
use crate::module::Module;
use aurora_core::Result;
use aurora_scripting::{CallTable, ScriptVm};
use std::sync::Arc;

/// One running engine instance
pub struct Engine {
    functions: ScriptFunctions,
    call_table: Arc<CallTable<Module>>,
    module: Module,
    vm: Box<dyn ScriptVm<Module>>,
    consumer: Box<dyn EventConsumer>,
    ticks: u64,
}

impl Engine {
    /// Register the host functions into `call_table` and take ownership of
    /// the module, VM and event consumer
    pub fn new(
        call_table: Arc<CallTable<Module>>,
        module: Module,
        vm: Box<dyn ScriptVm<Module>>,
        consumer: Box<dyn EventConsumer>,
    ) -> Result<Self> {
        let functions = ScriptFunctions::install(&call_table)?;

        Ok(Self {
            functions,
            call_table,
            module,
            vm,
            consumer,
            ticks: 0,
        })
    }

    /// Create the player, load a module and enter it
    pub fn start(&mut self, module: &str, entry_location: Option<String>, pc_tag: &str) -> Result<()> {
        self.module.use_pc(pc_tag);
        self.module.load(module, entry_location)?;
        self.module.enter()
    }

    /// Run one tick at game time `now` (ms)
    ///
    /// Returns `false` once the module asked to exit.
    pub fn tick(&mut self, now: u64) -> bool {
        self.ticks += 1;
        self.module
            .process(now, self.vm.as_mut(), self.consumer.as_mut());
        !self.module.exit_requested()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    pub fn call_table(&self) -> &Arc<CallTable<Module>> {
        &self.call_table
    }

    pub fn functions(&self) -> &ScriptFunctions {
        &self.functions
    }

    /// Unload everything and stop
    pub fn shutdown(&mut self) {
        self.module.leave();
        self.module.unload(true);
        tracing::info!("Engine stopped after {} ticks", self.ticks);
    }
}
