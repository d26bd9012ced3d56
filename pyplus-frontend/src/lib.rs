//! PyPlus translator - Frontend
//!
//! This crate provides the source side of the translator:
//! - AST: the syntax tree of the scripting language, with its JSON schema
//! - Frontend: loads a parser-produced JSON tree and attaches original text
//! - Builder: constructs trees programmatically for tests and tooling
//!
//! Parsing script text is done by an external parser.

pub mod ast;
pub mod builder;

pub use ast::{
    BinaryOp, BoolOpKind, CompareOp, Expression, ExpressionKind, Keyword, Module, NodeId,
    NodeIdGenerator, Parameter, ParameterKind, SourceNode, Statement, StatementKind, UnaryOp,
};

use log::debug;
use pyplus_common::PyPlusError;
use std::path::Path;

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Deserialise a JSON syntax tree and number its nodes
    pub fn load_json(json: &str) -> Result<Module, PyPlusError> {
        let mut module: Module = serde_json::from_str(json)?;
        module.assign_node_ids();
        debug!(
            "Loaded syntax tree for '{}' with {} top-level statements",
            module.filename,
            module.body.len()
        );
        Ok(module)
    }

    /// Read and deserialise a JSON syntax tree from disk
    pub fn load_file(path: &Path) -> Result<Module, PyPlusError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            PyPlusError::load_error(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let mut module = Self::load_json(&json)?;
        if module.filename.is_empty() {
            module.filename = path.display().to_string();
        }
        Ok(module)
    }

    /// Fill every empty `text` field from the script the tree was parsed from.
    ///
    /// Nodes whose span falls outside `source` keep an empty text. Returns
    /// the number of nodes that received text.
    pub fn attach_source(module: &mut Module, source: &str) -> usize {
        let mut filled = 0;
        for stmt in &mut module.body {
            filled += attach_statement(stmt, source);
        }
        debug!("Attached source text to {} nodes of '{}'", filled, module.filename);
        filled
    }
}

fn attach_statement(stmt: &mut Statement, source: &str) -> usize {
    let mut filled = fill_text(&mut stmt.text, &stmt.span, source);
    for expr in stmt.expressions_mut() {
        filled += attach_expression(expr, source);
    }
    for block in stmt.blocks_mut() {
        for child in block.iter_mut() {
            filled += attach_statement(child, source);
        }
    }
    filled
}

fn attach_expression(expr: &mut Expression, source: &str) -> usize {
    let mut filled = fill_text(&mut expr.text, &expr.span, source);
    for child in expr.children_mut() {
        filled += attach_expression(child, source);
    }
    filled
}

fn fill_text(text: &mut String, span: &pyplus_common::SourceSpan, source: &str) -> usize {
    if !text.is_empty() {
        return 0;
    }
    match span.extract(source) {
        Some(slice) => {
            text.push_str(slice);
            1
        }
        None => 0,
    }
}
