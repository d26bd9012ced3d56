//! Serialisation of the target tree as C++ source text
//!
//! Layout of a printed program:
//! - `#include` lines for the headers the program needs
//! - one prototype per function, carrying its default arguments
//! - the function definitions, in source order
//! - `int main(int argc, char **argv)` holding the module-level statements

use pyplus_common::StaticType;
use pyplus_translate::{
    CppComment, CppExpr, CppFunction, CppParam, CppStmt, ParamType, TargetProgram,
};

const INDENT: &str = "    ";

pub struct CppPrinter {
    output: String,
    level: usize,
}

impl Default for CppPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl CppPrinter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            level: 0,
        }
    }

    /// Print a whole program and return its text
    pub fn print_program(mut self, program: &TargetProgram) -> String {
        if !program.includes.is_empty() {
            for include in &program.includes {
                self.line(&format!("#include <{}>", include.header()));
            }
            self.blank();
        }

        let functions: Vec<&CppFunction> = program.functions().collect();
        if !functions.is_empty() {
            for function in &functions {
                self.template_line(function);
                self.line(&format!("{};", signature(function, true)));
            }
            self.blank();

            for function in &functions {
                self.template_line(function);
                self.line(&signature(function, false));
                self.block(&function.body);
                self.blank();
            }
        }

        self.line("int main(int argc, char **argv)");
        let main_body: Vec<CppStmt> = program.main_body().cloned().collect();
        self.block(&main_body);
        self.output
    }

    /// Print a single statement at the current indentation
    pub fn print_statement(mut self, stmt: &CppStmt) -> String {
        self.statement(stmt);
        self.output
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn blank(&mut self) {
        self.output.push('\n');
    }

    fn template_line(&mut self, function: &CppFunction) {
        let params = function.template_params();
        if !params.is_empty() {
            let list: Vec<String> = params.iter().map(|p| format!("typename {}", p)).collect();
            self.line(&format!("template <{}>", list.join(", ")));
        }
    }

    fn block(&mut self, body: &[CppStmt]) {
        self.line("{");
        self.level += 1;
        for stmt in body {
            self.statement(stmt);
        }
        self.level -= 1;
        self.line("}");
    }

    fn statement(&mut self, stmt: &CppStmt) {
        match stmt {
            CppStmt::Declaration {
                name,
                decl_type,
                initializer,
            } => self.line(&format!(
                "{} {} = {};",
                decl_type.cpp_name(),
                name,
                expression_bare(initializer)
            )),

            CppStmt::Assignment { name, value } => {
                self.line(&format!("{} = {};", name, expression_bare(value)))
            }

            CppStmt::Expression(expr) => self.line(&format!("{};", expression_bare(expr))),

            CppStmt::Print(arguments) => {
                let mut text = String::from("std::cout");
                for (index, arg) in arguments.iter().enumerate() {
                    if index > 0 {
                        text.push_str(" << \" \"");
                    }
                    text.push_str(" << ");
                    text.push_str(&print_argument(arg));
                }
                text.push_str(" << std::endl;");
                self.line(&text);
            }

            CppStmt::If { branches, else_body } => {
                for (index, (condition, body)) in branches.iter().enumerate() {
                    let keyword = if index == 0 { "if" } else { "else if" };
                    self.line(&format!("{} ({})", keyword, expression_bare(condition)));
                    self.block(body);
                }
                if let Some(body) = else_body {
                    self.line("else");
                    self.block(body);
                }
            }

            CppStmt::While { condition, body } => {
                self.line(&format!("while ({})", expression_bare(condition)));
                self.block(body);
            }

            CppStmt::For {
                variable,
                start,
                end,
                step,
                body,
            } => {
                let (test, update) = if *step < 0 {
                    (">", format!("{} -= {}", variable, step.unsigned_abs()))
                } else {
                    ("<", format!("{} += {}", variable, step))
                };
                self.line(&format!(
                    "for (int {} = {}; {} {} {}; {})",
                    variable,
                    expression_bare(start),
                    variable,
                    test,
                    expression(end),
                    update
                ));
                self.block(body);
            }

            CppStmt::Return(None) => self.line("return;"),
            CppStmt::Return(Some(value)) => {
                self.line(&format!("return {};", expression_bare(value)))
            }
            CppStmt::Break => self.line("break;"),
            CppStmt::Continue => self.line("continue;"),
            CppStmt::Comment(comment) => self.comment(comment),
        }
    }

    fn comment(&mut self, comment: &CppComment) {
        match comment {
            CppComment::Doc(lines) => {
                if !lines.iter().all(|text| fits_block_comment(text)) {
                    for text in lines {
                        self.line_comment(text.trim_end());
                    }
                } else {
                    self.line("/*");
                    for text in lines {
                        self.line(text.trim_end());
                    }
                    self.line("*/");
                }
            }
            CppComment::Line(text) => self.line_comment(text),
            CppComment::Skipped { reason, original } => {
                self.line(&format!("//TODO: {}", reason));
                if !fits_block_comment(original) {
                    for text in original.lines() {
                        self.line_comment(text);
                    }
                } else {
                    self.line(&format!("/*{}*/", original));
                }
            }
        }
    }

    /// `//text`, unless a trailing backslash would splice the next line into it
    fn line_comment(&mut self, text: &str) {
        if !text.trim_end().ends_with('\\') {
            self.line(&format!("//{}", text));
        } else if !text.contains("*/") {
            self.line(&format!("/*{}*/", text));
        } else {
            self.line(&format!("//{} //", text.trim_end()));
        }
    }
}

/// Text that stays inside `/* ... */` without closing it early
fn fits_block_comment(text: &str) -> bool {
    !text.contains("*/") && !text.lines().any(|line| line.trim_end().ends_with('\\'))
}

/// Booleans print as `True`/`False`
fn print_argument(arg: &CppExpr) -> String {
    if arg.get_type() == StaticType::Boolean {
        format!("({} ? \"True\" : \"False\")", expression(arg))
    } else {
        expression(arg)
    }
}

/// `int add(int a, int b = 3)`; defaults only appear on prototypes
fn signature(function: &CppFunction, with_defaults: bool) -> String {
    let params: Vec<String> = function
        .params
        .iter()
        .map(|param| parameter(param, with_defaults))
        .collect();
    format!(
        "{} {}({})",
        function.return_type.cpp_name(),
        function.name,
        params.join(", ")
    )
}

fn parameter(param: &CppParam, with_default: bool) -> String {
    let type_name = match &param.param_type {
        ParamType::Concrete(ty) => ty.cpp_name().to_string(),
        ParamType::Generic(name) => name.clone(),
    };
    match &param.default {
        Some(default) if with_default => {
            format!("{} {} = {}", type_name, param.name, expression_bare(default))
        }
        _ => format!("{} {}", type_name, param.name),
    }
}

/// Render an expression; compound expressions are fully parenthesised
pub fn expression(expr: &CppExpr) -> String {
    match expr {
        CppExpr::IntLiteral { value, .. } => value.to_string(),
        CppExpr::FloatLiteral { value, .. } => format!("{:?}", value),
        CppExpr::BoolLiteral { value, .. } => value.to_string(),
        CppExpr::StringLiteral { value, .. } => escape_string(value),
        CppExpr::Variable { name, .. } => name.clone(),
        CppExpr::Binary { op, left, right, .. } => {
            format!("({} {} {})", expression(left), op, expression(right))
        }
        CppExpr::Unary { op, operand, .. } => format!("({}{})", op, expression(operand)),
        CppExpr::Call {
            function, arguments, ..
        } => {
            let args: Vec<String> = arguments.iter().map(expression_bare).collect();
            format!("{}({})", function, args.join(", "))
        }
        CppExpr::Cast {
            operand,
            target_type,
            ..
        } => format!("static_cast<{}>({})", target_type.cpp_name(), expression_bare(operand)),
    }
}

/// Render an expression whose surroundings already delimit it (statement
/// operands, call arguments, conditions): the outermost parentheses are dropped
pub fn expression_bare(expr: &CppExpr) -> String {
    match expr {
        CppExpr::Binary { op, left, right, .. } => {
            format!("{} {} {}", expression(left), op, expression(right))
        }
        CppExpr::Unary { op, operand, .. } => format!("{}{}", op, expression(operand)),
        _ => expression(expr),
    }
}

/// C++ string literal for `value`; control characters become octal escapes
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            c if c.is_ascii_control() => escaped.push_str(&format!("\\{:03o}", c as u32)),
            // Keeps `??=` and friends from being read as trigraphs
            '?' if escaped.ends_with('?') => escaped.push_str("\\?"),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}
