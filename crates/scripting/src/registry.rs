//! Function registry
//!
//! Host functions are declared in three parallel static rows (native
//! pointers, signatures, default values) indexed by function ID. The
//! registry checks that the rows line up and turns every entry into an
//! immutable [`FunctionDescriptor`]. A missing native pointer binds the
//! descriptor to [`Binding::Unimplemented`], the diagnostic stub.

use crate::context::CallContext;
use crate::error::{Result, ScriptError};
use crate::signature::{defaults_from_row, DefaultValue, Signature};
use crate::value::{Value, ValueType};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Native implementation of a host function
pub type NativeFn<H> = fn(&mut H, &mut CallContext) -> Result<()>;

/// Catalogue row: ID, name and optional implementation
pub struct FunctionPointer<H> {
    pub id: u32,
    pub name: &'static str,
    pub func: Option<NativeFn<H>>,
}

/// Catalogue row: return type and `Void`-terminated parameter types
#[derive(Debug, Clone, Copy)]
pub struct FunctionSignature {
    pub id: u32,
    pub return_type: ValueType,
    pub parameters: &'static [ValueType],
}

/// Catalogue row: defaults for the trailing parameters, ended by `None`
#[derive(Debug, Clone, Copy)]
pub struct FunctionDefaults {
    pub id: u32,
    pub defaults: &'static [Option<DefaultValue>],
}

/// The three co-indexed catalogue rows
pub struct Catalogue<'a, H> {
    pub pointers: &'a [FunctionPointer<H>],
    pub signatures: &'a [FunctionSignature],
    pub defaults: &'a [FunctionDefaults],
}

impl<'a, H> Catalogue<'a, H> {
    pub fn new(
        pointers: &'a [FunctionPointer<H>],
        signatures: &'a [FunctionSignature],
        defaults: &'a [FunctionDefaults],
    ) -> Self {
        Self {
            pointers,
            signatures,
            defaults,
        }
    }
}

/// What a descriptor runs when called
pub enum Binding<H> {
    Native(NativeFn<H>),
    /// No implementation: log the call and return the zero value
    Unimplemented,
}

impl<H> Clone for Binding<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Binding<H> {}

impl<H> Binding<H> {
    pub fn is_implemented(&self) -> bool {
        matches!(self, Binding::Native(_))
    }
}

impl<H> fmt::Debug for Binding<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Native(_) => f.write_str("Native"),
            Binding::Unimplemented => f.write_str("Unimplemented"),
        }
    }
}

/// One host-callable operation
pub struct FunctionDescriptor<H> {
    pub id: u32,
    pub name: String,
    pub signature: Signature,
    /// Right-aligned defaults: the last one belongs to the last parameter
    pub defaults: Vec<Value>,
    pub binding: Binding<H>,
}

impl<H> FunctionDescriptor<H> {
    /// Index of the first parameter that may be omitted
    pub fn first_defaulted(&self) -> usize {
        self.signature.arity() - self.defaults.len()
    }
}

impl<H> fmt::Debug for FunctionDescriptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("defaults", &self.defaults)
            .field("binding", &self.binding)
            .finish()
    }
}

/// Validated, immutable set of descriptors, looked up by ID or name
pub struct RegisteredTable<H> {
    descriptors: Vec<Arc<FunctionDescriptor<H>>>,
    by_id: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

impl<H> RegisteredTable<H> {
    pub fn get(&self, id: u32) -> Option<&Arc<FunctionDescriptor<H>>> {
        self.by_id.get(&id).map(|&index| &self.descriptors[index])
    }

    pub fn find(&self, name: &str) -> Option<&Arc<FunctionDescriptor<H>>> {
        self.by_name.get(name).map(|&index| &self.descriptors[index])
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FunctionDescriptor<H>>> {
        self.descriptors.iter()
    }

    /// Number of entries bound to the diagnostic stub
    pub fn unimplemented_count(&self) -> usize {
        self.descriptors
            .iter()
            .filter(|d| !d.binding.is_implemented())
            .count()
    }

    pub(crate) fn into_descriptors(self) -> Vec<Arc<FunctionDescriptor<H>>> {
        self.descriptors
    }
}

impl<H> fmt::Debug for RegisteredTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.descriptors.iter()).finish()
    }
}

/// Builds descriptor tables from static catalogues
pub struct FunctionRegistry;

impl FunctionRegistry {
    /// Validate a catalogue and build its descriptors
    ///
    /// Misaligned rows, types after the void terminator, ill-fitting
    /// defaults and duplicate IDs or names are all catalogue defects and
    /// fail the whole build.
    pub fn build<H>(catalogue: &Catalogue<'_, H>) -> Result<RegisteredTable<H>> {
        let Catalogue {
            pointers,
            signatures,
            defaults,
        } = catalogue;

        if pointers.len() != signatures.len() || pointers.len() != defaults.len() {
            return Err(ScriptError::CatalogueLength {
                pointers: pointers.len(),
                signatures: signatures.len(),
                defaults: defaults.len(),
            });
        }

        let mut table = RegisteredTable {
            descriptors: Vec::with_capacity(pointers.len()),
            by_id: HashMap::with_capacity(pointers.len()),
            by_name: HashMap::with_capacity(pointers.len()),
        };

        for (index, ((pointer, sig), def)) in pointers
            .iter()
            .zip(signatures.iter())
            .zip(defaults.iter())
            .enumerate()
        {
            let id = pointer.id;
            if sig.id != id || def.id != id {
                return Err(ScriptError::CatalogueMismatch {
                    index,
                    pointer_id: id,
                    signature_id: sig.id,
                    defaults_id: def.id,
                });
            }

            let signature = Signature::from_row(id, pointer.name, sig.return_type, sig.parameters)?;
            let default_values = defaults_from_row(pointer.name, &signature, def.defaults)?;

            let binding = match pointer.func {
                Some(func) => Binding::Native(func),
                None => Binding::Unimplemented,
            };

            if table.by_id.contains_key(&id) || table.by_name.contains_key(pointer.name) {
                return Err(ScriptError::DuplicateFunction {
                    id,
                    name: pointer.name.to_string(),
                });
            }

            table.by_id.insert(id, table.descriptors.len());
            table.by_name.insert(pointer.name.to_string(), table.descriptors.len());
            table.descriptors.push(Arc::new(FunctionDescriptor {
                id,
                name: pointer.name.to_string(),
                signature,
                defaults: default_values,
                binding,
            }));
        }

        tracing::debug!(
            "Built function table: {} functions, {} unimplemented",
            table.len(),
            table.unimplemented_count()
        );

        Ok(table)
    }
}
