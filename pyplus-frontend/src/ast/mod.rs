//! Abstract syntax tree definitions for the source language
//!
//! The tree is produced by an external parser (serialised as JSON) or by
//! the `builder` module, and is read-only for the translator.

pub mod ops;
pub mod expressions;
pub mod statements;

// Re-export commonly used types at module level
pub use ops::{BinaryOp, BoolOpKind, CompareOp, UnaryOp};
pub use expressions::{Expression, ExpressionKind, Keyword};
pub use statements::{Module, Parameter, ParameterKind, Statement, StatementKind};

use pyplus_common::SourceSpan;

/// Unique identifier for AST nodes
pub type NodeId = u32;

/// Node ID generator for AST nodes
#[derive(Debug, Clone, Default)]
pub struct NodeIdGenerator {
    next_id: NodeId,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn next(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Common view over statements and expressions
pub trait SourceNode {
    fn node_id(&self) -> NodeId;
    fn span(&self) -> &SourceSpan;
    /// Original source text, byte-for-byte
    fn text(&self) -> &str;
}

impl SourceNode for Statement {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn span(&self) -> &SourceSpan {
        &self.span
    }

    fn text(&self) -> &str {
        &self.text
    }
}

impl SourceNode for Expression {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn span(&self) -> &SourceSpan {
        &self.span
    }

    fn text(&self) -> &str {
        &self.text
    }
}

impl Module {
    /// Give every node a fresh id in pre-order (the module itself is 0)
    pub fn assign_node_ids(&mut self) {
        let mut ids = NodeIdGenerator::new();
        self.node_id = ids.next();
        for stmt in &mut self.body {
            number_statement(stmt, &mut ids);
        }
    }
}

fn number_statement(stmt: &mut Statement, ids: &mut NodeIdGenerator) {
    stmt.node_id = ids.next();
    for expr in stmt.expressions_mut() {
        number_expression(expr, ids);
    }
    for block in stmt.blocks_mut() {
        for child in block.iter_mut() {
            number_statement(child, ids);
        }
    }
}

fn number_expression(expr: &mut Expression, ids: &mut NodeIdGenerator) {
    expr.node_id = ids.next();
    for child in expr.children_mut() {
        number_expression(child, ids);
    }
}
