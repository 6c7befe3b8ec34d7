//! The VM's shared call table
//!
//! Exactly one call table is shared by the VM and every engine binding. An
//! installed [`RegisteredTable`] is represented by a [`Registration`] guard;
//! dropping the guard removes precisely the entries it added.

use crate::context::CallSite;
use crate::dispatch;
use crate::error::{Result, ScriptError};
use crate::host::ScriptHost;
use crate::registry::{FunctionDescriptor, RegisteredTable};
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

struct Entries<H> {
    by_id: HashMap<u32, Arc<FunctionDescriptor<H>>>,
    by_name: HashMap<String, u32>,
}

/// Name/ID indexed table of callable host functions
pub struct CallTable<H> {
    entries: RwLock<Entries<H>>,
}

impl<H> CallTable<H> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                by_id: HashMap::new(),
                by_name: HashMap::new(),
            }),
        }
    }

    /// Add one descriptor under its name and ID
    pub fn register(&self, descriptor: Arc<FunctionDescriptor<H>>) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.by_id.contains_key(&descriptor.id) || entries.by_name.contains_key(&descriptor.name) {
            return Err(ScriptError::DuplicateFunction {
                id: descriptor.id,
                name: descriptor.name.clone(),
            });
        }

        entries.by_name.insert(descriptor.name.clone(), descriptor.id);
        entries.by_id.insert(descriptor.id, descriptor);
        Ok(())
    }

    /// Remove one entry. Returns `false` if the ID was not registered.
    pub fn unregister(&self, id: u32) -> bool {
        let mut entries = self.entries.write();
        match entries.by_id.remove(&id) {
            Some(descriptor) => {
                entries.by_name.remove(&descriptor.name);
                true
            }
            None => false,
        }
    }

    /// Remove the entry under `id` only if it is `descriptor` itself
    pub fn unregister_if(&self, id: u32, descriptor: &Arc<FunctionDescriptor<H>>) -> bool {
        let mut entries = self.entries.write();
        if !entries.by_id.get(&id).is_some_and(|current| Arc::ptr_eq(current, descriptor)) {
            return false;
        }

        entries.by_id.remove(&id);
        entries.by_name.remove(&descriptor.name);
        true
    }

    pub fn get(&self, id: u32) -> Option<Arc<FunctionDescriptor<H>>> {
        self.entries.read().by_id.get(&id).cloned()
    }

    pub fn find(&self, name: &str) -> Option<Arc<FunctionDescriptor<H>>> {
        let entries = self.entries.read();
        let id = entries.by_name.get(name)?;
        entries.by_id.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().by_id.is_empty()
    }
}

impl<H: ScriptHost> CallTable<H> {
    /// Call a host function by ID
    pub fn invoke(&self, host: &mut H, id: u32, args: Vec<Value>, site: CallSite) -> Result<Value> {
        let descriptor = self.get(id).ok_or(ScriptError::UnknownFunctionId(id))?;
        dispatch::invoke(&descriptor, host, args, site)
    }

    /// Call a host function by name
    pub fn invoke_by_name(&self, host: &mut H, name: &str, args: Vec<Value>, site: CallSite) -> Result<Value> {
        let descriptor = self
            .find(name)
            .ok_or_else(|| ScriptError::UnknownFunction(name.to_string()))?;
        dispatch::invoke(&descriptor, host, args, site)
    }
}

impl<H> Default for CallTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RegisteredTable<H> {
    /// Register every descriptor into the shared call table
    ///
    /// Either all entries are added or, on a clash, none are.
    pub fn install(self, table: &Arc<CallTable<H>>) -> Result<Registration<H>> {
        let mut installed: Vec<Arc<FunctionDescriptor<H>>> = Vec::with_capacity(self.len());
        for descriptor in self.into_descriptors() {
            if let Err(err) = table.register(Arc::clone(&descriptor)) {
                for added in &installed {
                    table.unregister_if(added.id, added);
                }
                return Err(err);
            }
            installed.push(descriptor);
        }

        tracing::debug!("Registered {} host functions", installed.len());

        Ok(Registration {
            table: Arc::clone(table),
            ids: installed.iter().map(|descriptor| descriptor.id).collect(),
            installed,
        })
    }
}

/// Live registration of a function table; unregisters on drop
///
/// Only the descriptors this registration installed are removed. An id that
/// was freed and taken over by another binding in the meantime is left alone.
pub struct Registration<H> {
    table: Arc<CallTable<H>>,
    ids: Vec<u32>,
    installed: Vec<Arc<FunctionDescriptor<H>>>,
}

impl<H> Registration<H> {
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn table(&self) -> &Arc<CallTable<H>> {
        &self.table
    }
}

impl<H> Drop for Registration<H> {
    fn drop(&mut self) {
        let removed = self
            .installed
            .iter()
            .filter(|descriptor| self.table.unregister_if(descriptor.id, descriptor))
            .count();
        tracing::debug!("Unregistered {} host functions", removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Catalogue, FunctionDefaults, FunctionPointer, FunctionRegistry, FunctionSignature};
    use crate::value::ValueType;
    use aurora_core::{DiagnosticSink, ObjectRef, RecordedDiagnostics};

    #[derive(Default)]
    struct Host {
        diagnostics: RecordedDiagnostics,
    }

    impl ScriptHost for Host {
        fn object_tag(&self, _object: ObjectRef, _caller: ObjectRef) -> Option<String> {
            None
        }

        fn diagnostics(&self) -> &dyn DiagnosticSink {
            &self.diagnostics
        }
    }

    const POINTERS: &[FunctionPointer<Host>] = &[
        FunctionPointer { id: 0, name: "GetZero", func: None },
        FunctionPointer { id: 1, name: "GetOne", func: None },
    ];
    const SIGNATURES: &[FunctionSignature] = &[
        FunctionSignature { id: 0, return_type: ValueType::Int, parameters: &[] },
        FunctionSignature { id: 1, return_type: ValueType::Int, parameters: &[] },
    ];
    const DEFAULTS: &[FunctionDefaults] = &[
        FunctionDefaults { id: 0, defaults: &[] },
        FunctionDefaults { id: 1, defaults: &[] },
    ];

    fn build() -> RegisteredTable<Host> {
        FunctionRegistry::build(&Catalogue::new(POINTERS, SIGNATURES, DEFAULTS)).unwrap()
    }

    #[test]
    fn test_install_registers_by_id_and_name() {
        let table = Arc::new(CallTable::new());
        let registration = build().install(&table).unwrap();

        assert_eq!(registration.len(), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).unwrap().name, "GetOne");
        assert_eq!(table.find("GetZero").unwrap().id, 0);
    }

    #[test]
    fn test_drop_removes_exactly_own_entries() {
        let table = Arc::new(CallTable::new());

        let other_pointers = [FunctionPointer { id: 50, name: "Foreign", func: None }];
        let other_signatures = [FunctionSignature { id: 50, return_type: ValueType::Void, parameters: &[] }];
        let other_defaults = [FunctionDefaults { id: 50, defaults: &[] }];
        let foreign = FunctionRegistry::build(&Catalogue::new(&other_pointers, &other_signatures, &other_defaults))
            .unwrap()
            .install(&table)
            .unwrap();

        let registration = build().install(&table).unwrap();
        assert_eq!(table.len(), 3);

        drop(registration);
        assert_eq!(table.len(), 1);
        assert!(table.find("Foreign").is_some());
        assert!(table.get(0).is_none());

        drop(foreign);
        assert!(table.is_empty());
    }

    #[test]
    fn test_drop_leaves_entry_that_took_over_an_id() {
        let table = Arc::new(CallTable::new());
        let first = build().install(&table).unwrap();

        assert!(table.unregister(0));
        let pointers = [FunctionPointer { id: 0, name: "Replacement", func: None }];
        let signatures = [FunctionSignature { id: 0, return_type: ValueType::Int, parameters: &[] }];
        let defaults = [FunctionDefaults { id: 0, defaults: &[] }];
        let _second = FunctionRegistry::build(&Catalogue::new(&pointers, &signatures, &defaults))
            .unwrap()
            .install(&table)
            .unwrap();

        drop(first);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().name, "Replacement");
        assert!(table.find("GetOne").is_none());
    }

    #[test]
    fn test_unregister_if_checks_identity() {
        let table = Arc::new(CallTable::new());
        let _registration = build().install(&table).unwrap();
        let other = build().into_descriptors().remove(0);

        assert!(!table.unregister_if(0, &other));
        assert!(table.get(0).is_some());

        let current = table.get(0).unwrap();
        assert!(table.unregister_if(0, &current));
        assert!(table.find("GetZero").is_none());
    }

    #[test]
    fn test_clashing_install_rolls_back() {
        let table = Arc::new(CallTable::new());
        let _first = build().install(&table).unwrap();

        let err = build().install(&table).err().unwrap();
        assert!(matches!(err, ScriptError::DuplicateFunction { id: 0, .. }));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_invoke_unknown_id() {
        let table: Arc<CallTable<Host>> = Arc::new(CallTable::new());
        let mut host = Host::default();
        let err = table.invoke(&mut host, 99, vec![], CallSite::default()).unwrap_err();
        assert!(matches!(err, ScriptError::UnknownFunctionId(99)));
    }

    #[test]
    fn test_invoke_unbound_by_name_uses_stub() {
        let table = Arc::new(CallTable::new());
        let _registration = build().install(&table).unwrap();
        let mut host = Host::default();

        let value = table
            .invoke_by_name(&mut host, "GetOne", vec![], CallSite::default())
            .unwrap();
        assert_eq!(value, Value::Int(0));
        assert_eq!(host.diagnostics.messages(), vec!["TODO: GetOne()"]);
    }
}
