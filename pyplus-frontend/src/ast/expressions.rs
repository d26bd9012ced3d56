//! Expression AST nodes for the source language
//!
//! This module defines expression nodes in the source syntax tree.

use super::ops::{BinaryOp, BoolOpKind, CompareOp, UnaryOp};
use crate::ast::NodeId;
use pyplus_common::SourceSpan;
use serde::{Deserialize, Serialize};

/// Source expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    #[serde(default)]
    pub node_id: NodeId,
    pub kind: ExpressionKind,
    #[serde(default = "SourceSpan::dummy")]
    pub span: SourceSpan,
    /// Original source text of this node, byte-for-byte
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    NoneLiteral,

    /// Identifier reference
    Name(String),

    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// `a and b and c`
    BoolOp {
        op: BoolOpKind,
        values: Vec<Expression>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// `left op0 c0 op1 c1 ...`
    Compare {
        left: Box<Expression>,
        ops: Vec<CompareOp>,
        comparators: Vec<Expression>,
    },

    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
        #[serde(default)]
        keywords: Vec<Keyword>,
    },

    /// `object.attr`
    Attribute {
        object: Box<Expression>,
        attr: String,
    },

    List(Vec<Expression>),
    Tuple(Vec<Expression>),
    Set(Vec<Expression>),
    Dict {
        keys: Vec<Expression>,
        values: Vec<Expression>,
    },

    /// Assignment expression `target := value`
    NamedExpr {
        target: Box<Expression>,
        value: Box<Expression>,
    },

    /// Any construct the parser recognises but this tree does not model
    /// (subscripts, lambdas, comprehensions, f-strings, ...)
    Other { construct: String },
}

/// Keyword argument at a call site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    pub value: Expression,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: SourceSpan, text: impl Into<String>) -> Self {
        Self {
            node_id: 0,
            kind,
            span,
            text: text.into(),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Int(_)
                | ExpressionKind::Float(_)
                | ExpressionKind::Bool(_)
                | ExpressionKind::Str(_)
                | ExpressionKind::NoneLiteral
        )
    }

    /// Identifier name if this is a bare name
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Direct sub-expressions in evaluation order
    pub fn children(&self) -> Vec<&Expression> {
        match &self.kind {
            ExpressionKind::Int(_)
            | ExpressionKind::Float(_)
            | ExpressionKind::Bool(_)
            | ExpressionKind::Str(_)
            | ExpressionKind::NoneLiteral
            | ExpressionKind::Name(_)
            | ExpressionKind::Other { .. } => Vec::new(),
            ExpressionKind::Binary { left, right, .. } => vec![&**left, &**right],
            ExpressionKind::BoolOp { values, .. } => values.iter().collect(),
            ExpressionKind::Unary { operand, .. } => vec![&**operand],
            ExpressionKind::Compare { left, comparators, .. } => {
                std::iter::once(&**left).chain(comparators.iter()).collect()
            }
            ExpressionKind::Call {
                function,
                arguments,
                keywords,
            } => std::iter::once(&**function)
                .chain(arguments.iter())
                .chain(keywords.iter().map(|k| &k.value))
                .collect(),
            ExpressionKind::Attribute { object, .. } => vec![&**object],
            ExpressionKind::List(items)
            | ExpressionKind::Tuple(items)
            | ExpressionKind::Set(items) => items.iter().collect(),
            ExpressionKind::Dict { keys, values } => keys.iter().chain(values.iter()).collect(),
            ExpressionKind::NamedExpr { target, value } => vec![&**target, &**value],
        }
    }

    /// Mutable access to direct sub-expressions
    pub fn children_mut(&mut self) -> Vec<&mut Expression> {
        match &mut self.kind {
            ExpressionKind::Int(_)
            | ExpressionKind::Float(_)
            | ExpressionKind::Bool(_)
            | ExpressionKind::Str(_)
            | ExpressionKind::NoneLiteral
            | ExpressionKind::Name(_)
            | ExpressionKind::Other { .. } => Vec::new(),
            ExpressionKind::Binary { left, right, .. } => vec![&mut **left, &mut **right],
            ExpressionKind::BoolOp { values, .. } => values.iter_mut().collect(),
            ExpressionKind::Unary { operand, .. } => vec![&mut **operand],
            ExpressionKind::Compare { left, comparators, .. } => {
                std::iter::once(&mut **left).chain(comparators.iter_mut()).collect()
            }
            ExpressionKind::Call {
                function,
                arguments,
                keywords,
            } => std::iter::once(&mut **function)
                .chain(arguments.iter_mut())
                .chain(keywords.iter_mut().map(|k| &mut k.value))
                .collect(),
            ExpressionKind::Attribute { object, .. } => vec![&mut **object],
            ExpressionKind::List(items)
            | ExpressionKind::Tuple(items)
            | ExpressionKind::Set(items) => items.iter_mut().collect(),
            ExpressionKind::Dict { keys, values } => {
                keys.iter_mut().chain(values.iter_mut()).collect()
            }
            ExpressionKind::NamedExpr { target, value } => vec![&mut **target, &mut **value],
        }
    }

    /// Whether any node in this subtree satisfies `predicate`
    pub fn any(&self, predicate: &dyn Fn(&Expression) -> bool) -> bool {
        predicate(self) || self.children().into_iter().any(|child| child.any(predicate))
    }

    pub fn contains_call(&self) -> bool {
        self.any(&|e| matches!(e.kind, ExpressionKind::Call { .. }))
    }

    pub fn contains_named_expr(&self) -> bool {
        self.any(&|e| matches!(e.kind, ExpressionKind::NamedExpr { .. }))
    }
}
