//! Operator definitions for the source language
//! 
//! Operators are displayed with their source spelling so that builder-made
//! nodes can carry readable original text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary arithmetic and bitwise operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add, Sub, Mult, Div, FloorDiv, Mod, Pow,

    // Bitwise
    LShift, RShift, BitOr, BitAnd, BitXor,

    // Matrix multiplication (no target equivalent)
    MatMult,
}

impl BinaryOp {
    pub fn is_bitwise(&self) -> bool {
        matches!(
            self,
            BinaryOp::LShift
                | BinaryOp::RShift
                | BinaryOp::BitOr
                | BinaryOp::BitAnd
                | BinaryOp::BitXor
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mult => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::BitOr => "|",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::MatMult => "@",
        };
        write!(f, "{}", op_str)
    }
}

/// Short-circuit boolean operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOpKind {
    And,
    Or,
}

impl fmt::Display for BoolOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOpKind::And => write!(f, "and"),
            BoolOpKind::Or => write!(f, "or"),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Invert,
    UAdd,
    USub,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            UnaryOp::Not => "not ",
            UnaryOp::Invert => "~",
            UnaryOp::UAdd => "+",
            UnaryOp::USub => "-",
        };
        write!(f, "{}", op_str)
    }
}

/// Comparison operators (may be chained: `a < b < c`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq, NotEq, Lt, LtE, Gt, GtE,

    // Identity and membership
    Is, IsNot, In, NotIn,
}

impl CompareOp {
    /// Identity and membership tests have no value-level target equivalent
    pub fn is_identity_or_membership(&self) -> bool {
        matches!(self, CompareOp::Is | CompareOp::IsNot | CompareOp::In | CompareOp::NotIn)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtE => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtE => ">=",
            CompareOp::Is => "is",
            CompareOp::IsNot => "is not",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
        };
        write!(f, "{}", op_str)
    }
}
