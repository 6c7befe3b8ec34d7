//! # Aurora Scripting Bindings
//!
//! The layer between a script VM and the engine: value and signature model,
//! static function catalogues, the shared call table, argument dispatch and
//! the diagnostic stub for functions nobody has implemented yet.

pub mod context;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod host;
pub mod registry;
pub mod signature;
pub mod table;
pub mod value;

pub use context::{CallContext, CallSite};
pub use dispatch::{invoke, prepare_arguments, unimplemented_function};
pub use error::{Result, ScriptError};
pub use format::{format_float, format_params, format_tag};
pub use host::{ScriptHost, ScriptVm};
pub use registry::{
    Binding, Catalogue, FunctionDefaults, FunctionDescriptor, FunctionPointer, FunctionRegistry,
    FunctionSignature, NativeFn, RegisteredTable,
};
pub use signature::{DefaultValue, Signature};
pub use table::{CallTable, Registration};
pub use value::{EngineType, ScriptState, StructValue, Value, ValueType};
