//! Static types assigned during translation
//!
//! Source programs carry no types; the engine derives one of these for
//! every translated expression and every bound identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of types the engine reasons about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaticType {
    Integer,
    FloatingPoint,
    Boolean,
    String,
    Void,
    /// Type could not be determined (duck-typed values, template parameters)
    Unresolved,
}

impl StaticType {
    /// Spelling of this type in the emitted C++
    pub fn cpp_name(&self) -> &'static str {
        match self {
            StaticType::Integer => "int",
            StaticType::FloatingPoint => "double",
            StaticType::Boolean => "bool",
            StaticType::String => "std::string",
            StaticType::Void => "void",
            StaticType::Unresolved => "auto",
        }
    }

    /// Map a source-level type annotation onto a static type
    pub fn from_annotation(annotation: &str) -> Self {
        match annotation.trim() {
            "int" => StaticType::Integer,
            "float" => StaticType::FloatingPoint,
            "bool" => StaticType::Boolean,
            "str" => StaticType::String,
            "None" => StaticType::Void,
            _ => StaticType::Unresolved,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, StaticType::Integer | StaticType::FloatingPoint | StaticType::Boolean)
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, StaticType::Integer | StaticType::Boolean)
    }

    pub fn is_determinate(&self) -> bool {
        !matches!(self, StaticType::Unresolved)
    }

    /// Result type of arithmetic between two operands.
    ///
    /// Returns `None` when the operands cannot be combined at all
    /// (string with number, anything with void).
    pub fn promote(left: StaticType, right: StaticType) -> Option<StaticType> {
        use StaticType::*;
        match (left, right) {
            (Void, _) | (_, Void) => None,
            (Unresolved, _) | (_, Unresolved) => Some(Unresolved),
            (String, String) => Some(String),
            (String, _) | (_, String) => None,
            (FloatingPoint, _) | (_, FloatingPoint) => Some(FloatingPoint),
            _ => Some(Integer),
        }
    }

    /// Whether a value of `self` can be stored into a `to` slot without losing precision
    pub fn widens_to(&self, to: StaticType) -> bool {
        matches!((self, to), (StaticType::Integer, StaticType::FloatingPoint))
    }
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StaticType::Integer => "Integer",
            StaticType::FloatingPoint => "FloatingPoint",
            StaticType::Boolean => "Boolean",
            StaticType::String => "String",
            StaticType::Void => "Void",
            StaticType::Unresolved => "Unresolved",
        };
        write!(f, "{}", name)
    }
}
