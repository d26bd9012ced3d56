//! PyPlus Translator - Common Types and Utilities
//! 
//! This crate contains shared types, error definitions, and utilities
//! used across all components of the PyPlus translator.

pub mod error;
pub mod types;
pub mod source_loc;

pub use error::{Diagnostic, ErrorReporter, PyPlusError, Severity};
pub use types::StaticType;
pub use source_loc::{SourceLocation, SourceSpan};
