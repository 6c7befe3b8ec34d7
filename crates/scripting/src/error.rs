//! Error types for the scripting crate

use crate::value::ValueType;
use aurora_core::AuroraError;

/// Script-specific error types
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The three catalogue rows have different lengths
    #[error("Catalogue rows differ in length: {pointers} pointers, {signatures} signatures, {defaults} defaults")]
    CatalogueLength {
        pointers: usize,
        signatures: usize,
        defaults: usize,
    },

    /// The three catalogue rows disagree on the ID at one index
    #[error("Catalogue rows misaligned at index {index}: pointer {pointer_id}, signature {signature_id}, defaults {defaults_id}")]
    CatalogueMismatch {
        index: usize,
        pointer_id: u32,
        signature_id: u32,
        defaults_id: u32,
    },

    /// A parameter type follows the void terminator
    #[error("Catalogue entry {name} ({id}): parameter type after void terminator")]
    CatalogueTypeAfterVoid { id: u32, name: String },

    /// Default values do not fit the parameter list
    #[error("Catalogue entry {name}: {message}")]
    CatalogueDefaults { name: String, message: String },

    /// Name or ID registered twice
    #[error("Function {name} ({id}) is already registered")]
    DuplicateFunction { id: u32, name: String },

    /// No function with this name
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// No function with this ID
    #[error("Unknown function id: {0}")]
    UnknownFunctionId(u32),

    /// More arguments than parameters
    #[error("{name}: {given} arguments given, at most {max} accepted")]
    TooManyArguments {
        name: String,
        given: usize,
        max: usize,
    },

    /// An omitted argument has no default
    #[error("{name}: argument {index} omitted and has no default")]
    MissingArgument { name: String, index: usize },

    /// Argument of the wrong type
    #[error("{name}: argument {index} should be {expected}, got {found}")]
    TypeMismatch {
        name: String,
        index: usize,
        expected: ValueType,
        found: ValueType,
    },

    /// Return value of the wrong type
    #[error("{name}: return value should be {expected}, got {found}")]
    ReturnTypeMismatch {
        name: String,
        expected: ValueType,
        found: ValueType,
    },

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl ScriptError {
    /// Whether this is a defect in the static catalogue rather than a
    /// problem with one call
    pub fn is_catalogue_error(&self) -> bool {
        matches!(
            self,
            ScriptError::CatalogueLength { .. }
                | ScriptError::CatalogueMismatch { .. }
                | ScriptError::CatalogueTypeAfterVoid { .. }
                | ScriptError::CatalogueDefaults { .. }
                | ScriptError::DuplicateFunction { .. }
        )
    }
}

impl From<ScriptError> for AuroraError {
    fn from(err: ScriptError) -> Self {
        AuroraError::Script(err.to_string())
    }
}

/// Result type for scripting operations
pub type Result<T> = std::result::Result<T, ScriptError>;
