//! Typing rules shared by the classifier and the expression translator
//!
//! Each rule either yields the static type of the construct or the
//! category explaining why it cannot be expressed in the target.

use crate::classifier::{Category, ExprContext};
use crate::config::DefaultParamPolicy;
use crate::target::{CppExpr, ParamType};
use crate::type_env::{FunctionSignature, TypeEnvironment};
use pyplus_common::StaticType;
use pyplus_frontend::{BinaryOp, CompareOp, Expression, ExpressionKind, Keyword, UnaryOp};

/// `math` functions ported to `<cmath>`
pub const MATH_FUNCTIONS: &[&str] = &["sqrt", "floor", "ceil", "sin", "cos", "tan", "exp", "log"];

/// Integer literals must fit the target `int`
pub fn int_literal_type(value: i64) -> Result<StaticType, Category> {
    if i32::try_from(value).is_ok() {
        Ok(StaticType::Integer)
    } else {
        Err(Category::TypeNarrowing)
    }
}

fn is_arithmetic(ty: StaticType) -> bool {
    ty.is_numeric() || ty == StaticType::Unresolved
}

pub fn binary_type(
    op: BinaryOp,
    left: StaticType,
    right: StaticType,
) -> Result<StaticType, Category> {
    use StaticType::*;

    if left == Void || right == Void {
        return Err(Category::Unsupported);
    }

    match op {
        BinaryOp::Add => StaticType::promote(left, right).ok_or(Category::Unsupported),
        BinaryOp::Sub | BinaryOp::Mult => {
            if is_arithmetic(left) && is_arithmetic(right) {
                StaticType::promote(left, right).ok_or(Category::Unsupported)
            } else {
                Err(Category::Unsupported)
            }
        }
        BinaryOp::Div | BinaryOp::Pow => {
            if is_arithmetic(left) && is_arithmetic(right) {
                Ok(FloatingPoint)
            } else {
                Err(Category::Unsupported)
            }
        }
        BinaryOp::FloorDiv | BinaryOp::Mod => {
            if left.is_numeric() && right.is_numeric() {
                StaticType::promote(left, right).ok_or(Category::Unsupported)
            } else {
                // Floor and modulo lower differently per operand type
                Err(Category::Unsupported)
            }
        }
        BinaryOp::LShift
        | BinaryOp::RShift
        | BinaryOp::BitOr
        | BinaryOp::BitAnd
        | BinaryOp::BitXor => {
            let integral = |ty: StaticType| ty.is_integral() || ty == Unresolved;
            if !(integral(left) && integral(right)) {
                Err(Category::Unsupported)
            } else if left == Unresolved || right == Unresolved {
                Ok(Unresolved)
            } else {
                Ok(Integer)
            }
        }
        BinaryOp::MatMult => Err(Category::Unsupported),
    }
}

pub fn unary_type(op: UnaryOp, operand: StaticType) -> Result<StaticType, Category> {
    use StaticType::*;
    match (op, operand) {
        (_, Void) | (_, String) => Err(Category::Unsupported),
        (UnaryOp::Not, _) => Ok(Boolean),
        (UnaryOp::Invert, FloatingPoint) => Err(Category::Unsupported),
        (_, Unresolved) => Ok(Unresolved),
        (UnaryOp::Invert, _) | (_, Boolean) => Ok(Integer),
        (_, ty) => Ok(ty),
    }
}

/// One link `left op right` of a comparison chain
pub fn comparison_type(
    op: CompareOp,
    left: StaticType,
    right: StaticType,
) -> Result<StaticType, Category> {
    use StaticType::*;
    if op.is_identity_or_membership() {
        return Err(Category::Unsupported);
    }
    match (left, right) {
        (Void, _) | (_, Void) => Err(Category::Unsupported),
        (String, String) => Ok(Boolean),
        (String, _) | (_, String) => Err(Category::Unsupported),
        _ => Ok(Boolean),
    }
}

/// Types usable where C++ expects a condition
pub fn condition_type(ty: StaticType) -> Result<StaticType, Category> {
    match ty {
        StaticType::String | StaticType::Void => Err(Category::Unsupported),
        ty => Ok(ty),
    }
}

/// `and`/`or`: conditions accept any testable operand, values only booleans
pub fn bool_op_type(ctx: ExprContext, operands: &[StaticType]) -> Result<StaticType, Category> {
    match ctx {
        ExprContext::Condition => {
            for ty in operands {
                condition_type(*ty)?;
            }
            Ok(StaticType::Boolean)
        }
        ExprContext::Value => {
            if operands.iter().all(|ty| *ty == StaticType::Boolean) {
                Ok(StaticType::Boolean)
            } else {
                Err(Category::Unsupported)
            }
        }
    }
}

/// Explicit conversion `int(x)`, `float(x)`, `bool(x)` or `str(x)`
pub fn cast_type(target: StaticType, operand: StaticType) -> Result<StaticType, Category> {
    use StaticType::*;
    match (target, operand) {
        (_, Void) => Err(Category::Unsupported),
        (String, String) | (String, Integer) => Ok(String),
        (String, Boolean) => Err(Category::Unsupported),
        (String, _) => Err(Category::TypeNarrowing),
        (_, String) | (_, Unresolved) => Err(Category::TypeNarrowing),
        (target, _) => Ok(target),
    }
}

/// Whether a value of type `from` may be stored where `to` is expected
pub fn assignable(from: StaticType, to: StaticType) -> bool {
    from == to || from.widens_to(to)
}

/// Category for an argument that does not fit its parameter, if any
pub fn argument_category(argument: StaticType, param: &ParamType) -> Option<Category> {
    if argument == StaticType::Void {
        return Some(Category::Unsupported);
    }
    match param {
        ParamType::Generic(_) => None,
        ParamType::Concrete(expected) if assignable(argument, *expected) => None,
        ParamType::Concrete(expected) if is_arithmetic(argument) && is_arithmetic(*expected) => {
            Some(Category::TypeNarrowing)
        }
        ParamType::Concrete(_) => Some(Category::InvalidMethodCall),
    }
}

/// What a call expression invokes
#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    Print,
    Cast(StaticType),
    Abs,
    Pow,
    /// `<cmath>` function by its unqualified name
    Math(String),
    User(String),
}

pub fn call_target(function: &Expression, env: &TypeEnvironment) -> Result<CallTarget, Category> {
    match &function.kind {
        ExpressionKind::Name(name) => {
            if env.function(name).is_some() {
                return Ok(CallTarget::User(name.clone()));
            }
            if env.lookup(name).is_some() {
                return Err(Category::InvalidMethodCall);
            }
            match name.as_str() {
                "print" => Ok(CallTarget::Print),
                "int" => Ok(CallTarget::Cast(StaticType::Integer)),
                "float" => Ok(CallTarget::Cast(StaticType::FloatingPoint)),
                "bool" => Ok(CallTarget::Cast(StaticType::Boolean)),
                "str" => Ok(CallTarget::Cast(StaticType::String)),
                "abs" => Ok(CallTarget::Abs),
                "pow" => Ok(CallTarget::Pow),
                other if MATH_FUNCTIONS.contains(&other) && env.has_math_function(other) => {
                    Ok(CallTarget::Math(other.to_string()))
                }
                _ => Err(Category::OutOfScopeCall),
            }
        }
        ExpressionKind::Attribute { object, attr } => match object.as_name() {
            Some("math")
                if env.has_math_module()
                    && env.lookup("math").is_none()
                    && MATH_FUNCTIONS.contains(&attr.as_str()) =>
            {
                Ok(CallTarget::Math(attr.clone()))
            }
            _ => Err(Category::InvalidMethodCall),
        },
        _ => Err(Category::InvalidMethodCall),
    }
}

/// Result type of a ported builtin given its argument types
pub fn builtin_call_type(
    target: &CallTarget,
    arguments: &[StaticType],
) -> Result<StaticType, Category> {
    match target {
        CallTarget::Print => {
            if arguments.contains(&StaticType::Void) {
                Err(Category::Unsupported)
            } else if arguments.contains(&StaticType::FloatingPoint) {
                // Streams print six significant digits, not the shortest repr
                Err(Category::TypeNarrowing)
            } else {
                Ok(StaticType::Void)
            }
        }
        CallTarget::Cast(target) => match arguments {
            [operand] => cast_type(*target, *operand),
            _ => Err(Category::InvalidMethodCall),
        },
        CallTarget::Abs => match arguments {
            [operand] if is_arithmetic(*operand) => unary_type(UnaryOp::UAdd, *operand),
            [_] => Err(Category::Unsupported),
            _ => Err(Category::InvalidMethodCall),
        },
        CallTarget::Pow => match arguments {
            [base, exponent] => binary_type(BinaryOp::Pow, *base, *exponent),
            _ => Err(Category::InvalidMethodCall),
        },
        CallTarget::Math(name) => match arguments {
            [operand] if is_arithmetic(*operand) => {
                if name == "floor" || name == "ceil" {
                    Ok(StaticType::Integer)
                } else {
                    Ok(StaticType::FloatingPoint)
                }
            }
            [_] => Err(Category::Unsupported),
            _ => Err(Category::InvalidMethodCall),
        },
        CallTarget::User(_) => Err(Category::Unsupported),
    }
}

/// One argument position of a user call after keyword reordering
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSlot<'e> {
    Supplied(&'e Expression),
    /// Gap before a later supplied argument, filled from the declaration
    Default(CppExpr),
}

/// Match call-site arguments to the parameters of `signature`.
///
/// Trailing parameters left to their defaults get no slot; the emitted
/// declaration supplies them.
pub fn bind_arguments<'e>(
    signature: &FunctionSignature,
    arguments: &'e [Expression],
    keywords: &'e [Keyword],
    policy: DefaultParamPolicy,
) -> Result<Vec<ArgSlot<'e>>, Category> {
    if arguments.len() > signature.params.len() {
        return Err(Category::InvalidMethodCall);
    }

    let mut supplied: Vec<Option<&'e Expression>> = vec![None; signature.params.len()];
    for (slot, argument) in supplied.iter_mut().zip(arguments) {
        *slot = Some(argument);
    }
    for keyword in keywords {
        let index = signature
            .params
            .iter()
            .position(|p| p.name == keyword.name)
            .ok_or(Category::InvalidMethodCall)?;
        if supplied[index].is_some() {
            return Err(Category::InvalidMethodCall);
        }
        supplied[index] = Some(&keyword.value);
    }

    let last_supplied = supplied.iter().rposition(Option::is_some);
    let mut slots = Vec::new();
    let mut relies_on_default = false;
    for (index, (argument, param)) in supplied.iter().zip(&signature.params).enumerate() {
        match (argument, &param.default) {
            (Some(argument), _) => slots.push(ArgSlot::Supplied(argument)),
            (None, None) => return Err(Category::InvalidMethodCall),
            (None, Some(default)) => {
                relies_on_default = true;
                if last_supplied.is_some_and(|last| index < last) {
                    slots.push(ArgSlot::Default(default.clone()));
                }
            }
        }
    }

    if relies_on_default && policy == DefaultParamPolicy::Skip {
        return Err(Category::OutOfScopeCall);
    }
    Ok(slots)
}
