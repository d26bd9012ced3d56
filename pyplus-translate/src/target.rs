//! Target (C++) syntax tree
//!
//! Every expression node carries the static type the engine derived for it.
//! The tree is serialised by `pyplus-codegen`.

use crate::classifier::ReasonCode;
use pyplus_common::StaticType;
use pyplus_frontend::{Expression, ExpressionKind, UnaryOp};
use std::collections::BTreeSet;
use std::fmt;

/// Typed target expression
#[derive(Debug, Clone, PartialEq)]
pub enum CppExpr {
    IntLiteral {
        value: i64,
        expr_type: StaticType,
    },

    FloatLiteral {
        value: f64,
        expr_type: StaticType,
    },

    BoolLiteral {
        value: bool,
        expr_type: StaticType,
    },

    StringLiteral {
        value: String,
        expr_type: StaticType,
    },

    Variable {
        name: String,
        expr_type: StaticType,
    },

    Binary {
        op: CppBinaryOp,
        left: Box<CppExpr>,
        right: Box<CppExpr>,
        expr_type: StaticType,
    },

    Unary {
        op: CppUnaryOp,
        operand: Box<CppExpr>,
        expr_type: StaticType,
    },

    /// Call of a free function (`std::pow`, `add`, ...)
    Call {
        function: String,
        arguments: Vec<CppExpr>,
        expr_type: StaticType,
    },

    /// `static_cast<T>(operand)`
    Cast {
        operand: Box<CppExpr>,
        target_type: StaticType,
        expr_type: StaticType,
    },
}

impl CppExpr {
    pub fn get_type(&self) -> StaticType {
        match self {
            CppExpr::IntLiteral { expr_type, .. }
            | CppExpr::FloatLiteral { expr_type, .. }
            | CppExpr::BoolLiteral { expr_type, .. }
            | CppExpr::StringLiteral { expr_type, .. }
            | CppExpr::Variable { expr_type, .. }
            | CppExpr::Binary { expr_type, .. }
            | CppExpr::Unary { expr_type, .. }
            | CppExpr::Call { expr_type, .. }
            | CppExpr::Cast { expr_type, .. } => *expr_type,
        }
    }

    pub fn int(value: i64) -> Self {
        CppExpr::IntLiteral {
            value,
            expr_type: StaticType::Integer,
        }
    }

    pub fn float(value: f64) -> Self {
        CppExpr::FloatLiteral {
            value,
            expr_type: StaticType::FloatingPoint,
        }
    }

    pub fn boolean(value: bool) -> Self {
        CppExpr::BoolLiteral {
            value,
            expr_type: StaticType::Boolean,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        CppExpr::StringLiteral {
            value: value.into(),
            expr_type: StaticType::String,
        }
    }

    pub fn variable(name: impl Into<String>, expr_type: StaticType) -> Self {
        CppExpr::Variable {
            name: name.into(),
            expr_type,
        }
    }

    pub fn binary(op: CppBinaryOp, left: CppExpr, right: CppExpr, expr_type: StaticType) -> Self {
        CppExpr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            expr_type,
        }
    }

    pub fn call(
        function: impl Into<String>,
        arguments: Vec<CppExpr>,
        expr_type: StaticType,
    ) -> Self {
        CppExpr::Call {
            function: function.into(),
            arguments,
            expr_type,
        }
    }

    pub fn cast(operand: CppExpr, target_type: StaticType) -> Self {
        CppExpr::Cast {
            operand: Box::new(operand),
            target_type,
            expr_type: target_type,
        }
    }

    /// Lower a literal source expression (optionally negated), as used for
    /// parameter defaults. Returns `None` for anything else.
    pub fn from_literal(expr: &Expression) -> Option<Self> {
        match &expr.kind {
            ExpressionKind::Int(value) => Some(CppExpr::int(*value)),
            ExpressionKind::Float(value) => Some(CppExpr::float(*value)),
            ExpressionKind::Bool(value) => Some(CppExpr::boolean(*value)),
            ExpressionKind::Str(value) => Some(CppExpr::string(value.clone())),
            ExpressionKind::Unary {
                op: UnaryOp::USub,
                operand,
            } => match operand.kind {
                ExpressionKind::Int(value) => Some(CppExpr::int(-value)),
                ExpressionKind::Float(value) => Some(CppExpr::float(-value)),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_string_literal(&self) -> bool {
        matches!(self, CppExpr::StringLiteral { .. })
    }

    /// Visit this expression and every sub-expression
    pub fn walk(&self, visit: &mut dyn FnMut(&CppExpr)) {
        visit(self);
        match self {
            CppExpr::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            CppExpr::Unary { operand, .. } | CppExpr::Cast { operand, .. } => operand.walk(visit),
            CppExpr::Call { arguments, .. } => {
                for arg in arguments {
                    arg.walk(visit);
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CppBinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LogicalAnd,
    LogicalOr,
}

impl fmt::Display for CppBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CppBinaryOp::Add => "+",
            CppBinaryOp::Sub => "-",
            CppBinaryOp::Mul => "*",
            CppBinaryOp::Div => "/",
            CppBinaryOp::Mod => "%",
            CppBinaryOp::Shl => "<<",
            CppBinaryOp::Shr => ">>",
            CppBinaryOp::BitAnd => "&",
            CppBinaryOp::BitOr => "|",
            CppBinaryOp::BitXor => "^",
            CppBinaryOp::Eq => "==",
            CppBinaryOp::Ne => "!=",
            CppBinaryOp::Lt => "<",
            CppBinaryOp::Le => "<=",
            CppBinaryOp::Gt => ">",
            CppBinaryOp::Ge => ">=",
            CppBinaryOp::LogicalAnd => "&&",
            CppBinaryOp::LogicalOr => "||",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CppUnaryOp {
    Not,
    BitNot,
    Plus,
    Neg,
}

impl fmt::Display for CppUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CppUnaryOp::Not => "!",
            CppUnaryOp::BitNot => "~",
            CppUnaryOp::Plus => "+",
            CppUnaryOp::Neg => "-",
        };
        write!(f, "{}", symbol)
    }
}

/// Comment pseudo-statements
#[derive(Debug, Clone, PartialEq)]
pub enum CppComment {
    /// Doc-string, one entry per line
    Doc(Vec<String>),
    /// Single source comment line
    Line(String),
    /// Construct left for manual porting
    Skipped { reason: ReasonCode, original: String },
}

/// Target statement
#[derive(Debug, Clone, PartialEq)]
pub enum CppStmt {
    Declaration {
        name: String,
        decl_type: StaticType,
        initializer: CppExpr,
    },

    Assignment {
        name: String,
        value: CppExpr,
    },

    Expression(CppExpr),

    /// `std::cout << a << " " << b << std::endl;`
    Print(Vec<CppExpr>),

    /// `if` followed by `else if` branches, in source order
    If {
        branches: Vec<(CppExpr, Vec<CppStmt>)>,
        else_body: Option<Vec<CppStmt>>,
    },

    While {
        condition: CppExpr,
        body: Vec<CppStmt>,
    },

    /// Counted loop `for (int v = start; v < end; v += step)`
    For {
        variable: String,
        start: CppExpr,
        end: CppExpr,
        step: i64,
        body: Vec<CppStmt>,
    },

    Return(Option<CppExpr>),
    Break,
    Continue,
    Comment(CppComment),
}

impl CppStmt {
    /// Visit every expression in this statement and its nested blocks
    pub fn walk_exprs(&self, visit: &mut dyn FnMut(&CppExpr)) {
        match self {
            CppStmt::Declaration { initializer: e, .. }
            | CppStmt::Assignment { value: e, .. }
            | CppStmt::Expression(e)
            | CppStmt::Return(Some(e)) => e.walk(visit),
            CppStmt::Print(args) => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            CppStmt::If { branches, else_body } => {
                for (condition, body) in branches {
                    condition.walk(visit);
                    walk_block(body, visit);
                }
                if let Some(body) = else_body {
                    walk_block(body, visit);
                }
            }
            CppStmt::While { condition, body } => {
                condition.walk(visit);
                walk_block(body, visit);
            }
            CppStmt::For { start, end, body, .. } => {
                start.walk(visit);
                end.walk(visit);
                walk_block(body, visit);
            }
            CppStmt::Return(None) | CppStmt::Break | CppStmt::Continue | CppStmt::Comment(_) => {}
        }
    }

    /// Visit this statement and every statement nested in it
    pub fn walk(&self, visit: &mut dyn FnMut(&CppStmt)) {
        visit(self);
        match self {
            CppStmt::If { branches, else_body } => {
                for (_, body) in branches {
                    body.iter().for_each(|s| s.walk(visit));
                }
                if let Some(body) = else_body {
                    body.iter().for_each(|s| s.walk(visit));
                }
            }
            CppStmt::While { body, .. } | CppStmt::For { body, .. } => {
                body.iter().for_each(|s| s.walk(visit));
            }
            _ => {}
        }
    }
}

fn walk_block(body: &[CppStmt], visit: &mut dyn FnMut(&CppExpr)) {
    for stmt in body {
        stmt.walk_exprs(visit);
    }
}

/// Parameter type: a mapped static type or a template type parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    Concrete(StaticType),
    Generic(String),
}

impl ParamType {
    /// Type the engine reasons with inside the function body
    pub fn static_type(&self) -> StaticType {
        match self {
            ParamType::Concrete(ty) => *ty,
            ParamType::Generic(_) => StaticType::Unresolved,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CppParam {
    pub name: String,
    pub param_type: ParamType,
    pub default: Option<CppExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CppFunction {
    pub name: String,
    pub return_type: StaticType,
    pub params: Vec<CppParam>,
    pub body: Vec<CppStmt>,
}

impl CppFunction {
    /// Template type parameter names, in declaration order
    pub fn template_params(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter_map(|p| match &p.param_type {
                ParamType::Generic(name) => Some(name.as_str()),
                ParamType::Concrete(_) => None,
            })
            .collect()
    }
}

/// Standard headers the emitted program needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Include {
    Iostream,
    String,
    Cmath,
}

impl Include {
    pub fn header(&self) -> &'static str {
        match self {
            Include::Iostream => "iostream",
            Include::String => "string",
            Include::Cmath => "cmath",
        }
    }
}

/// Top-level output item, in source order
#[derive(Debug, Clone, PartialEq)]
pub enum TargetItem {
    Function(CppFunction),
    /// Module-level statement, part of the generated `main`
    Statement(CppStmt),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetProgram {
    pub includes: BTreeSet<Include>,
    pub items: Vec<TargetItem>,
}

impl TargetProgram {
    pub fn functions(&self) -> impl Iterator<Item = &CppFunction> {
        self.items.iter().filter_map(|item| match item {
            TargetItem::Function(function) => Some(function),
            TargetItem::Statement(_) => None,
        })
    }

    /// Statements making up the body of `main`
    pub fn main_body(&self) -> impl Iterator<Item = &CppStmt> {
        self.items.iter().filter_map(|item| match item {
            TargetItem::Statement(stmt) => Some(stmt),
            TargetItem::Function(_) => None,
        })
    }
}
