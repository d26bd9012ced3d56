//! Expression translator
//!
//! Lowers Direct-classified source expressions onto typed target
//! expressions. Numeric promotion is made explicit with casts, and the
//! arithmetic operators keep the source language's rounding and sign rules.

use crate::classifier::{Category, Classifier, ExprContext, ReasonCode};
use crate::config::TranslatorConfig;
use crate::infer::{self, ArgSlot, CallTarget};
use crate::target::{CppBinaryOp, CppExpr, CppUnaryOp, ParamType};
use crate::type_env::TypeEnvironment;
use crate::TranslationVerdict;
use log::warn;
use pyplus_common::StaticType;
use pyplus_frontend::{
    BinaryOp, BoolOpKind, CompareOp, Expression, ExpressionKind, Keyword, UnaryOp,
};

pub struct ExpressionTranslator<'a> {
    env: &'a TypeEnvironment,
    config: &'a TranslatorConfig,
}

/// `static_cast<double>(expr)` unless it already is one
fn as_double(expr: CppExpr) -> CppExpr {
    if expr.get_type() == StaticType::FloatingPoint {
        expr
    } else {
        CppExpr::cast(expr, StaticType::FloatingPoint)
    }
}

/// `std::string(literal)`, so that `+` and comparisons act on strings
fn as_string(expr: CppExpr) -> CppExpr {
    CppExpr::call("std::string", vec![expr], StaticType::String)
}

fn comparison_op(op: CompareOp) -> Result<CppBinaryOp, Category> {
    match op {
        CompareOp::Eq => Ok(CppBinaryOp::Eq),
        CompareOp::NotEq => Ok(CppBinaryOp::Ne),
        CompareOp::Lt => Ok(CppBinaryOp::Lt),
        CompareOp::LtE => Ok(CppBinaryOp::Le),
        CompareOp::Gt => Ok(CppBinaryOp::Gt),
        CompareOp::GtE => Ok(CppBinaryOp::Ge),
        CompareOp::Is | CompareOp::IsNot | CompareOp::In | CompareOp::NotIn => {
            Err(Category::Unsupported)
        }
    }
}

impl<'a> ExpressionTranslator<'a> {
    pub fn new(env: &'a TypeEnvironment, config: &'a TranslatorConfig) -> Self {
        Self { env, config }
    }

    /// Classify `expr` and lower it when it is Direct
    pub fn translate(&self, expr: &Expression, ctx: ExprContext) -> TranslationVerdict<CppExpr> {
        let category = Classifier::new(self.env, self.config).classify_expression(expr, ctx);
        let category = match category {
            Category::Direct => match self.lower(expr, ctx) {
                Ok(lowered) => return TranslationVerdict::Translated(lowered),
                Err(category) => {
                    warn!(
                        "Expression {} ('{}') classified Direct but could not be lowered: {}",
                        expr.node_id, expr.text, category
                    );
                    category
                }
            },
            other => other,
        };

        TranslationVerdict::Skipped {
            reason: category.reason().unwrap_or(ReasonCode::NotDirectlyTranslatable),
            original_text: expr.text.clone(),
        }
    }

    /// Lower an expression, assuming it was classified Direct
    pub fn lower(&self, expr: &Expression, ctx: ExprContext) -> Result<CppExpr, Category> {
        match &expr.kind {
            ExpressionKind::Int(value) => {
                infer::int_literal_type(*value)?;
                Ok(CppExpr::int(*value))
            }
            ExpressionKind::Float(value) => Ok(CppExpr::float(*value)),
            ExpressionKind::Bool(value) => Ok(CppExpr::boolean(*value)),
            ExpressionKind::Str(value) => Ok(CppExpr::string(value.clone())),
            ExpressionKind::Name(name) => {
                let ty = self.env.lookup(name).ok_or(Category::Unsupported)?;
                Ok(CppExpr::variable(name.clone(), ty))
            }
            ExpressionKind::Binary { op, left, right } => self.lower_binary(*op, left, right),
            ExpressionKind::BoolOp { op, values } => self.lower_bool_op(*op, values, ctx),
            ExpressionKind::Unary { op, operand } => self.lower_unary(*op, operand),
            ExpressionKind::Compare {
                left,
                ops,
                comparators,
            } => self.lower_comparison(left, ops, comparators),
            ExpressionKind::Call {
                function,
                arguments,
                keywords,
            } => self.lower_call(function, arguments, keywords),
            ExpressionKind::NamedExpr { .. } => Err(Category::ChainedAssignment),
            _ => Err(Category::Unsupported),
        }
    }

    /// Lower call arguments in order
    pub fn lower_arguments(&self, arguments: &[Expression]) -> Result<Vec<CppExpr>, Category> {
        arguments
            .iter()
            .map(|argument| self.lower(argument, ExprContext::Value))
            .collect()
    }

    fn lower_binary(
        &self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
    ) -> Result<CppExpr, Category> {
        let divisor_calls = right.contains_call();
        let left = self.lower(left, ExprContext::Value)?;
        let right = self.lower(right, ExprContext::Value)?;
        let ty = infer::binary_type(op, left.get_type(), right.get_type())?;

        let lowered = match op {
            BinaryOp::Add => {
                let left = if left.is_string_literal() { as_string(left) } else { left };
                CppExpr::binary(CppBinaryOp::Add, left, right, ty)
            }
            BinaryOp::Sub => CppExpr::binary(CppBinaryOp::Sub, left, right, ty),
            BinaryOp::Mult => CppExpr::binary(CppBinaryOp::Mul, left, right, ty),
            BinaryOp::Div => CppExpr::binary(CppBinaryOp::Div, as_double(left), right, ty),
            BinaryOp::FloorDiv => {
                if ty == StaticType::FloatingPoint {
                    let quotient = CppExpr::binary(CppBinaryOp::Div, left, right, ty);
                    CppExpr::call("std::floor", vec![quotient], ty)
                } else {
                    let real = StaticType::FloatingPoint;
                    let quotient = CppExpr::binary(CppBinaryOp::Div, as_double(left), right, real);
                    let floored = CppExpr::call("std::floor", vec![quotient], real);
                    CppExpr::cast(floored, StaticType::Integer)
                }
            }
            // The remainder takes the sign of the divisor: `((l % r) + r) % r`
            BinaryOp::Mod => {
                if divisor_calls {
                    return Err(Category::Unsupported);
                }
                let remainder = |l: CppExpr, r: CppExpr| {
                    if ty == StaticType::FloatingPoint {
                        CppExpr::call("std::fmod", vec![l, r], ty)
                    } else {
                        CppExpr::binary(CppBinaryOp::Mod, l, r, ty)
                    }
                };
                let truncated = remainder(left, right.clone());
                let shifted = CppExpr::binary(CppBinaryOp::Add, truncated, right.clone(), ty);
                remainder(shifted, right)
            }
            BinaryOp::Pow => CppExpr::call("std::pow", vec![left, right], ty),
            BinaryOp::LShift => CppExpr::binary(CppBinaryOp::Shl, left, right, ty),
            BinaryOp::RShift => CppExpr::binary(CppBinaryOp::Shr, left, right, ty),
            BinaryOp::BitOr => CppExpr::binary(CppBinaryOp::BitOr, left, right, ty),
            BinaryOp::BitAnd => CppExpr::binary(CppBinaryOp::BitAnd, left, right, ty),
            BinaryOp::BitXor => CppExpr::binary(CppBinaryOp::BitXor, left, right, ty),
            BinaryOp::MatMult => return Err(Category::Unsupported),
        };
        Ok(lowered)
    }

    fn lower_bool_op(
        &self,
        op: BoolOpKind,
        values: &[Expression],
        ctx: ExprContext,
    ) -> Result<CppExpr, Category> {
        let operands = values
            .iter()
            .map(|value| self.lower(value, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        let types: Vec<StaticType> = operands.iter().map(CppExpr::get_type).collect();
        let ty = infer::bool_op_type(ctx, &types)?;

        let cpp_op = match op {
            BoolOpKind::And => CppBinaryOp::LogicalAnd,
            BoolOpKind::Or => CppBinaryOp::LogicalOr,
        };
        let mut operands = operands.into_iter();
        let first = operands.next().ok_or(Category::Unsupported)?;
        Ok(operands.fold(first, |acc, next| CppExpr::binary(cpp_op, acc, next, ty)))
    }

    fn lower_unary(&self, op: UnaryOp, operand: &Expression) -> Result<CppExpr, Category> {
        let (cpp_op, ctx) = match op {
            UnaryOp::Not => (CppUnaryOp::Not, ExprContext::Condition),
            UnaryOp::Invert => (CppUnaryOp::BitNot, ExprContext::Value),
            UnaryOp::UAdd => (CppUnaryOp::Plus, ExprContext::Value),
            UnaryOp::USub => (CppUnaryOp::Neg, ExprContext::Value),
        };
        let operand = self.lower(operand, ctx)?;
        let ty = infer::unary_type(op, operand.get_type())?;
        Ok(CppExpr::Unary {
            op: cpp_op,
            operand: Box::new(operand),
            expr_type: ty,
        })
    }

    /// `a < b < c` becomes `(a < b) && (b < c)`
    fn lower_comparison(
        &self,
        left: &Expression,
        ops: &[CompareOp],
        comparators: &[Expression],
    ) -> Result<CppExpr, Category> {
        if ops.is_empty() || ops.len() != comparators.len() {
            return Err(Category::Unsupported);
        }
        if comparators[..comparators.len() - 1].iter().any(Expression::contains_call) {
            return Err(Category::Unsupported);
        }

        let mut operands = vec![self.lower(left, ExprContext::Value)?];
        operands.extend(self.lower_arguments(comparators)?);

        let mut links = Vec::new();
        for (index, op) in ops.iter().enumerate() {
            let (mut lhs, rhs) = (operands[index].clone(), operands[index + 1].clone());
            infer::comparison_type(*op, lhs.get_type(), rhs.get_type())?;
            if lhs.is_string_literal() && rhs.is_string_literal() {
                lhs = as_string(lhs);
            }
            links.push(CppExpr::binary(comparison_op(*op)?, lhs, rhs, StaticType::Boolean));
        }

        let mut links = links.into_iter();
        let first = links.next().ok_or(Category::Unsupported)?;
        Ok(links.fold(first, |acc, next| {
            CppExpr::binary(CppBinaryOp::LogicalAnd, acc, next, StaticType::Boolean)
        }))
    }

    fn lower_call(
        &self,
        function: &Expression,
        arguments: &[Expression],
        keywords: &[Keyword],
    ) -> Result<CppExpr, Category> {
        let target = infer::call_target(function, self.env)?;

        if let CallTarget::User(name) = &target {
            let signature = self.env.function(name).ok_or(Category::OutOfScopeCall)?;
            let slots = infer::bind_arguments(
                signature,
                arguments,
                keywords,
                self.config.default_params,
            )?;

            let mut lowered = Vec::with_capacity(slots.len());
            for (slot, param) in slots.into_iter().zip(&signature.params) {
                let argument = match slot {
                    ArgSlot::Supplied(argument) => {
                        let argument = self.lower(argument, ExprContext::Value)?;
                        let mismatch =
                            infer::argument_category(argument.get_type(), &param.param_type);
                        if let Some(category) = mismatch {
                            return Err(category);
                        }
                        // Template deduction would otherwise pick `const char*`
                        match param.param_type {
                            ParamType::Generic(_) if argument.is_string_literal() => {
                                as_string(argument)
                            }
                            _ => argument,
                        }
                    }
                    ArgSlot::Default(default) => default,
                };
                lowered.push(argument);
            }
            return Ok(CppExpr::call(name.clone(), lowered, signature.return_type));
        }

        if !keywords.is_empty() {
            return Err(Category::Unsupported);
        }
        let arguments = self.lower_arguments(arguments)?;
        let types: Vec<StaticType> = arguments.iter().map(CppExpr::get_type).collect();
        let ty = infer::builtin_call_type(&target, &types)?;

        match target {
            // Only valid as a statement
            CallTarget::Print | CallTarget::User(_) => Err(Category::Unsupported),
            CallTarget::Cast(target_type) => {
                let operand = arguments.into_iter().next().ok_or(Category::InvalidMethodCall)?;
                Ok(match (target_type, operand.get_type()) {
                    (StaticType::String, StaticType::String) => operand,
                    (StaticType::String, _) => CppExpr::call("std::to_string", vec![operand], ty),
                    _ => CppExpr::cast(operand, target_type),
                })
            }
            CallTarget::Abs => Ok(CppExpr::call("std::abs", arguments, ty)),
            CallTarget::Pow => Ok(CppExpr::call("std::pow", arguments, ty)),
            CallTarget::Math(name) => {
                let function = format!("std::{}", name);
                if ty == StaticType::Integer {
                    let rounded = CppExpr::call(function, arguments, StaticType::FloatingPoint);
                    Ok(CppExpr::cast(rounded, StaticType::Integer))
                } else {
                    Ok(CppExpr::call(function, arguments, ty))
                }
            }
        }
    }
}
