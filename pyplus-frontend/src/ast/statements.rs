//! Statement AST nodes for the source language
//!
//! This module defines statement nodes, function parameters and the module root.

use super::expressions::{Expression, ExpressionKind};
use super::ops::BinaryOp;
use crate::ast::NodeId;
use pyplus_common::SourceSpan;
use serde::{Deserialize, Serialize};

/// Source statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(default)]
    pub node_id: NodeId,
    pub kind: StatementKind,
    #[serde(default = "SourceSpan::dummy")]
    pub span: SourceSpan,
    /// Original source text of this node, byte-for-byte
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// Expression statement
    Expression(Expression),

    /// `t0 = t1 = ... = value`
    Assign {
        targets: Vec<Expression>,
        value: Expression,
    },

    /// `target op= value`
    AugAssign {
        target: Expression,
        op: BinaryOp,
        value: Expression,
    },

    /// `if`/`elif`/`else`; an `elif` is an `orelse` holding exactly one `If`
    If {
        condition: Expression,
        body: Vec<Statement>,
        #[serde(default)]
        orelse: Vec<Statement>,
    },

    While {
        condition: Expression,
        body: Vec<Statement>,
        #[serde(default)]
        orelse: Vec<Statement>,
    },

    For {
        target: Expression,
        iter: Expression,
        body: Vec<Statement>,
        #[serde(default)]
        orelse: Vec<Statement>,
    },

    FunctionDef {
        name: String,
        parameters: Vec<Parameter>,
        #[serde(default)]
        returns: Option<String>,
        #[serde(default)]
        decorators: Vec<Expression>,
        body: Vec<Statement>,
    },

    Return(Option<Expression>),
    Break,
    Continue,
    Pass,

    /// `import a, b`
    Import { names: Vec<String> },

    /// `from module import a, b`
    ImportFrom { module: String, names: Vec<String> },

    /// Doc-string in statement position
    DocString(String),

    /// Comment line (without the leading `#`)
    Comment(String),

    /// Any statement the parser recognises but this tree does not model
    /// (class definitions, try, with, raise, global, ...)
    Other { construct: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterKind {
    #[default]
    Positional,
    /// `*args`
    VarArgs,
    /// `**kwargs`
    KwArgs,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub default: Option<Expression>,
    #[serde(default)]
    pub kind: ParameterKind,
}

/// Root of a source syntax tree (one script)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub node_id: NodeId,
    #[serde(default)]
    pub filename: String,
    pub body: Vec<Statement>,
    #[serde(default = "SourceSpan::dummy")]
    pub span: SourceSpan,
}

impl Statement {
    pub fn new(kind: StatementKind, span: SourceSpan, text: impl Into<String>) -> Self {
        Self {
            node_id: 0,
            kind,
            span,
            text: text.into(),
        }
    }

    /// Expressions held directly by this statement (not by nested statements)
    pub fn expressions(&self) -> Vec<&Expression> {
        match &self.kind {
            StatementKind::Expression(expr) => vec![expr],
            StatementKind::Assign { targets, value } => {
                targets.iter().chain(std::iter::once(value)).collect()
            }
            StatementKind::AugAssign { target, value, .. } => vec![target, value],
            StatementKind::If { condition, .. } | StatementKind::While { condition, .. } => {
                vec![condition]
            }
            StatementKind::For { target, iter, .. } => vec![target, iter],
            StatementKind::FunctionDef { parameters, decorators, .. } => decorators
                .iter()
                .chain(parameters.iter().filter_map(|p| p.default.as_ref()))
                .collect(),
            StatementKind::Return(value) => value.iter().collect(),
            _ => Vec::new(),
        }
    }

    pub fn expressions_mut(&mut self) -> Vec<&mut Expression> {
        match &mut self.kind {
            StatementKind::Expression(expr) => vec![expr],
            StatementKind::Assign { targets, value } => {
                targets.iter_mut().chain(std::iter::once(value)).collect()
            }
            StatementKind::AugAssign { target, value, .. } => vec![target, value],
            StatementKind::If { condition, .. } | StatementKind::While { condition, .. } => {
                vec![condition]
            }
            StatementKind::For { target, iter, .. } => vec![target, iter],
            StatementKind::FunctionDef { parameters, decorators, .. } => decorators
                .iter_mut()
                .chain(parameters.iter_mut().filter_map(|p| p.default.as_mut()))
                .collect(),
            StatementKind::Return(value) => value.iter_mut().collect(),
            _ => Vec::new(),
        }
    }

    /// Nested statement blocks, in source order
    pub fn blocks(&self) -> Vec<&Vec<Statement>> {
        match &self.kind {
            StatementKind::If { body, orelse, .. }
            | StatementKind::While { body, orelse, .. }
            | StatementKind::For { body, orelse, .. } => vec![body, orelse],
            StatementKind::FunctionDef { body, .. } => vec![body],
            _ => Vec::new(),
        }
    }

    /// Whether this statement, or any statement nested in it, stores into `name`
    pub fn assigns_to(&self, name: &str) -> bool {
        let mentions = |expr: &Expression| expr.any(&|e| e.as_name() == Some(name));
        let stores = match &self.kind {
            StatementKind::Assign { targets, .. } => targets.iter().any(mentions),
            StatementKind::AugAssign { target, .. } | StatementKind::For { target, .. } => {
                mentions(target)
            }
            _ => false,
        };
        let walrus = self.expressions().into_iter().any(|expr| {
            expr.any(&|e| match &e.kind {
                ExpressionKind::NamedExpr { target, .. } => target.as_name() == Some(name),
                _ => false,
            })
        });
        stores
            || walrus
            || self
                .blocks()
                .into_iter()
                .flatten()
                .any(|stmt| stmt.assigns_to(name))
    }

    /// Nested statement blocks, in source order
    pub fn blocks_mut(&mut self) -> Vec<&mut Vec<Statement>> {
        match &mut self.kind {
            StatementKind::If { body, orelse, .. }
            | StatementKind::While { body, orelse, .. }
            | StatementKind::For { body, orelse, .. } => vec![body, orelse],
            StatementKind::FunctionDef { body, .. } => vec![body],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExpressionKind;

    #[test]
    fn test_statement_json_defaults() {
        let json = r#"{"kind": {"If": {
            "condition": {"kind": {"Bool": true}},
            "body": [{"kind": "Break"}]}}}"#;
        let stmt: Statement = serde_json::from_str(json).unwrap();
        match &stmt.kind {
            StatementKind::If { body, orelse, .. } => {
                assert_eq!(body.len(), 1);
                assert!(orelse.is_empty());
            }
            _ => panic!("Expected if statement"),
        }
        assert_eq!(stmt.expressions()[0].kind, ExpressionKind::Bool(true));
    }

    #[test]
    fn test_assigns_to_looks_into_nested_blocks() {
        use crate::builder::*;

        let stmt = while_stmt(
            boolean(true),
            vec![if_stmt(
                boolean(true),
                vec![aug_assign("i", BinaryOp::Add, int(1))],
                Vec::new(),
            )],
        );
        assert!(stmt.assigns_to("i"));
        assert!(!stmt.assigns_to("j"));

        let walrus = expr_stmt(call_named("print", vec![named_expr("j", int(2))]));
        assert!(walrus.assigns_to("j"));
        assert!(!walrus.assigns_to("print"));
    }

    #[test]
    fn test_parameter_defaults() {
        let param: Parameter = serde_json::from_str(r#"{"name": "a"}"#).unwrap();
        assert_eq!(param.kind, ParameterKind::Positional);
        assert!(param.annotation.is_none());
        assert!(param.default.is_none());
    }
}
