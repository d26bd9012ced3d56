//! Programmatic construction of source trees
//!
//! Every builder renders the node's source text from its children, so trees
//! built here carry the same `text` a parser would attach. Spans are dummies
//! and node ids are assigned when the tree is wrapped with [`module`].

use crate::ast::*;
use pyplus_common::SourceSpan;

fn expr(kind: ExpressionKind, text: String) -> Expression {
    Expression::new(kind, SourceSpan::dummy(), text)
}

fn stmt(kind: StatementKind, text: String) -> Statement {
    Statement::new(kind, SourceSpan::dummy(), text)
}

/// Operand text, parenthesised when it is itself a compound expression
fn operand_text(e: &Expression) -> String {
    match e.kind {
        ExpressionKind::Binary { .. }
        | ExpressionKind::BoolOp { .. }
        | ExpressionKind::Compare { .. }
        | ExpressionKind::NamedExpr { .. } => format!("({})", e.text),
        _ => e.text.clone(),
    }
}

fn joined(items: &[Expression]) -> String {
    items.iter().map(|e| e.text.as_str()).collect::<Vec<_>>().join(", ")
}

fn block_text(header: String, body: &[Statement]) -> String {
    let mut text = header;
    for child in body {
        for line in child.text.lines() {
            text.push_str("\n    ");
            text.push_str(line);
        }
    }
    text
}

pub fn int(value: i64) -> Expression {
    expr(ExpressionKind::Int(value), value.to_string())
}

pub fn float(value: f64) -> Expression {
    expr(ExpressionKind::Float(value), format!("{:?}", value))
}

pub fn boolean(value: bool) -> Expression {
    expr(ExpressionKind::Bool(value), if value { "True" } else { "False" }.to_string())
}

pub fn string(value: &str) -> Expression {
    expr(ExpressionKind::Str(value.to_string()), format!("{:?}", value))
}

pub fn none() -> Expression {
    expr(ExpressionKind::NoneLiteral, "None".to_string())
}

pub fn name(id: &str) -> Expression {
    expr(ExpressionKind::Name(id.to_string()), id.to_string())
}

pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Expression {
    let text = format!("{} {} {}", operand_text(&left), op, operand_text(&right));
    expr(
        ExpressionKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        text,
    )
}

pub fn bool_op(op: BoolOpKind, values: Vec<Expression>) -> Expression {
    let text = values
        .iter()
        .map(operand_text)
        .collect::<Vec<_>>()
        .join(&format!(" {} ", op));
    expr(ExpressionKind::BoolOp { op, values }, text)
}

pub fn unary(op: UnaryOp, operand: Expression) -> Expression {
    let text = format!("{}{}", op, operand_text(&operand));
    expr(
        ExpressionKind::Unary {
            op,
            operand: Box::new(operand),
        },
        text,
    )
}

/// `left op0 c0 op1 c1 ...`
pub fn compare(left: Expression, rest: Vec<(CompareOp, Expression)>) -> Expression {
    let mut text = operand_text(&left);
    let mut ops = Vec::new();
    let mut comparators = Vec::new();
    for (op, comparator) in rest {
        text.push_str(&format!(" {} {}", op, operand_text(&comparator)));
        ops.push(op);
        comparators.push(comparator);
    }
    expr(
        ExpressionKind::Compare {
            left: Box::new(left),
            ops,
            comparators,
        },
        text,
    )
}

pub fn call(function: Expression, arguments: Vec<Expression>) -> Expression {
    call_with_keywords(function, arguments, Vec::new())
}

pub fn call_with_keywords(
    function: Expression,
    arguments: Vec<Expression>,
    keywords: Vec<(&str, Expression)>,
) -> Expression {
    let keywords: Vec<Keyword> = keywords
        .into_iter()
        .map(|(name, value)| Keyword {
            name: name.to_string(),
            value,
        })
        .collect();

    let mut rendered: Vec<String> = arguments.iter().map(|a| a.text.clone()).collect();
    rendered.extend(keywords.iter().map(|k| format!("{}={}", k.name, k.value.text)));
    let text = format!("{}({})", function.text, rendered.join(", "));

    expr(
        ExpressionKind::Call {
            function: Box::new(function),
            arguments,
            keywords,
        },
        text,
    )
}

/// Call of a plain function name
pub fn call_named(function: &str, arguments: Vec<Expression>) -> Expression {
    call(name(function), arguments)
}

pub fn attribute(object: Expression, attr: &str) -> Expression {
    let text = format!("{}.{}", object.text, attr);
    expr(
        ExpressionKind::Attribute {
            object: Box::new(object),
            attr: attr.to_string(),
        },
        text,
    )
}

pub fn list(items: Vec<Expression>) -> Expression {
    let text = format!("[{}]", joined(&items));
    expr(ExpressionKind::List(items), text)
}

pub fn tuple(items: Vec<Expression>) -> Expression {
    let text = format!("({})", joined(&items));
    expr(ExpressionKind::Tuple(items), text)
}

pub fn named_expr(target: &str, value: Expression) -> Expression {
    let text = format!("{} := {}", target, value.text);
    expr(
        ExpressionKind::NamedExpr {
            target: Box::new(name(target)),
            value: Box::new(value),
        },
        text,
    )
}

/// Expression the tree does not model, carried with its raw text
pub fn other_expr(construct: &str, text: &str) -> Expression {
    expr(
        ExpressionKind::Other {
            construct: construct.to_string(),
        },
        text.to_string(),
    )
}

pub fn expr_stmt(value: Expression) -> Statement {
    let text = value.text.clone();
    stmt(StatementKind::Expression(value), text)
}

pub fn assign(target: &str, value: Expression) -> Statement {
    chained_assign(vec![name(target)], value)
}

pub fn chained_assign(targets: Vec<Expression>, value: Expression) -> Statement {
    let mut text = String::new();
    for target in &targets {
        text.push_str(&target.text);
        text.push_str(" = ");
    }
    text.push_str(&value.text);
    stmt(StatementKind::Assign { targets, value }, text)
}

pub fn aug_assign(target: &str, op: BinaryOp, value: Expression) -> Statement {
    let text = format!("{} {}= {}", target, op, value.text);
    stmt(
        StatementKind::AugAssign {
            target: name(target),
            op,
            value,
        },
        text,
    )
}

pub fn if_stmt(condition: Expression, body: Vec<Statement>, orelse: Vec<Statement>) -> Statement {
    let mut text = block_text(format!("if {}:", condition.text), &body);
    if !orelse.is_empty() {
        text.push('\n');
        text.push_str(&block_text("else:".to_string(), &orelse));
    }
    stmt(StatementKind::If { condition, body, orelse }, text)
}

pub fn while_stmt(condition: Expression, body: Vec<Statement>) -> Statement {
    let text = block_text(format!("while {}:", condition.text), &body);
    stmt(
        StatementKind::While {
            condition,
            body,
            orelse: Vec::new(),
        },
        text,
    )
}

pub fn for_stmt(target: &str, iter: Expression, body: Vec<Statement>) -> Statement {
    let text = block_text(format!("for {} in {}:", target, iter.text), &body);
    stmt(
        StatementKind::For {
            target: name(target),
            iter,
            body,
            orelse: Vec::new(),
        },
        text,
    )
}

pub fn param(name: &str) -> Parameter {
    Parameter {
        name: name.to_string(),
        annotation: None,
        default: None,
        kind: ParameterKind::Positional,
    }
}

pub fn param_annotated(name: &str, annotation: &str) -> Parameter {
    Parameter {
        annotation: Some(annotation.to_string()),
        ..param(name)
    }
}

pub fn param_default(name: &str, default: Expression) -> Parameter {
    Parameter {
        default: Some(default),
        ..param(name)
    }
}

fn param_text(p: &Parameter) -> String {
    let prefix = match p.kind {
        ParameterKind::Positional => "",
        ParameterKind::VarArgs => "*",
        ParameterKind::KwArgs => "**",
    };
    let mut text = format!("{}{}", prefix, p.name);
    if let Some(annotation) = &p.annotation {
        text.push_str(&format!(": {}", annotation));
    }
    if let Some(default) = &p.default {
        text.push_str(&format!("={}", default.text));
    }
    text
}

pub fn function_def(
    name: &str,
    parameters: Vec<Parameter>,
    returns: Option<&str>,
    body: Vec<Statement>,
) -> Statement {
    let params = parameters.iter().map(param_text).collect::<Vec<_>>().join(", ");
    let header = match returns {
        Some(ret) => format!("def {}({}) -> {}:", name, params, ret),
        None => format!("def {}({}):", name, params),
    };
    let text = block_text(header, &body);
    stmt(
        StatementKind::FunctionDef {
            name: name.to_string(),
            parameters,
            returns: returns.map(str::to_string),
            decorators: Vec::new(),
            body,
        },
        text,
    )
}

pub fn ret(value: Option<Expression>) -> Statement {
    let text = match &value {
        Some(v) => format!("return {}", v.text),
        None => "return".to_string(),
    };
    stmt(StatementKind::Return(value), text)
}

pub fn break_stmt() -> Statement {
    stmt(StatementKind::Break, "break".to_string())
}

pub fn continue_stmt() -> Statement {
    stmt(StatementKind::Continue, "continue".to_string())
}

pub fn pass_stmt() -> Statement {
    stmt(StatementKind::Pass, "pass".to_string())
}

pub fn import(names: &[&str]) -> Statement {
    let text = format!("import {}", names.join(", "));
    stmt(
        StatementKind::Import {
            names: names.iter().map(|n| n.to_string()).collect(),
        },
        text,
    )
}

pub fn import_from(module: &str, names: &[&str]) -> Statement {
    let text = format!("from {} import {}", module, names.join(", "));
    stmt(
        StatementKind::ImportFrom {
            module: module.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        },
        text,
    )
}

pub fn doc_string(text: &str) -> Statement {
    stmt(StatementKind::DocString(text.to_string()), format!("\"\"\"{}\"\"\"", text))
}

pub fn comment(text: &str) -> Statement {
    stmt(StatementKind::Comment(text.to_string()), format!("#{}", text))
}

/// Statement the tree does not model, carried with its raw text
pub fn other_stmt(construct: &str, text: &str) -> Statement {
    stmt(
        StatementKind::Other {
            construct: construct.to_string(),
        },
        text.to_string(),
    )
}

/// Wrap statements into a module and number its nodes
pub fn module(body: Vec<Statement>) -> Module {
    let mut module = Module {
        node_id: 0,
        filename: "script.py".to_string(),
        body,
        span: SourceSpan::dummy(),
    };
    module.assign_node_ids();
    module
}
