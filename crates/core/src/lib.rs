//! Aurora Core - Fundamental types and utilities shared by the runtime crates

mod error;
mod types;
mod idgen;
mod positions;
mod diagnostics;

pub use error::*;
pub use types::*;
pub use idgen::*;
pub use positions::*;
pub use diagnostics::*;
