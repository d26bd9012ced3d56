//! Construct classifier
//!
//! Decides, per source node, whether it maps 1:1 onto the target or which
//! category of manual-porting hazard it falls into. Classification only
//! reads the type environment; it never binds anything.

use crate::config::{GenericParamPolicy, TranslatorConfig};
use crate::infer::{self, ArgSlot, CallTarget};
use crate::target::{CppExpr, ParamType};
use crate::type_env::{FunctionSignature, SignatureParam, TypeEnvironment};
use pyplus_common::StaticType;
use pyplus_frontend::{
    BinaryOp, CompareOp, Expression, ExpressionKind, Keyword, ParameterKind, Statement,
    StatementKind, UnaryOp,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Translation category, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Direct,
    ValueUnused,
    TypeNarrowing,
    ChainedAssignment,
    DynamicCollection,
    OutOfScopeCall,
    InvalidMethodCall,
    DocOnly,
    Unsupported,
}

impl Category {
    /// Reason attached when a node of this category is skipped
    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            Category::Direct | Category::DocOnly => None,
            Category::ValueUnused => Some(ReasonCode::ValueUnused),
            Category::TypeNarrowing => Some(ReasonCode::TypeNarrowing),
            Category::ChainedAssignment => Some(ReasonCode::ChainedAssignment),
            Category::DynamicCollection | Category::Unsupported => {
                Some(ReasonCode::NotDirectlyTranslatable)
            }
            Category::OutOfScopeCall => Some(ReasonCode::CallNotInScope),
            Category::InvalidMethodCall => Some(ReasonCode::InvalidCall),
        }
    }

    /// The category that wins when a node matches both
    pub fn most_severe(self, other: Category) -> Category {
        if (other as u8) < (self as u8) {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Closed vocabulary of skip reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    ValueUnused,
    TypeNarrowing,
    ChainedAssignment,
    NotDirectlyTranslatable,
    CallNotInScope,
    InvalidCall,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::ValueUnused => "Constant/value not used",
            ReasonCode::TypeNarrowing => {
                "Refactor required: type cannot change without precision loss"
            }
            ReasonCode::ChainedAssignment => "Chained assignment not translatable",
            ReasonCode::NotDirectlyTranslatable => "Code not directly translatable",
            ReasonCode::CallNotInScope => "Call to function not in scope",
            ReasonCode::InvalidCall => "Not a valid call",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an expression's value ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprContext {
    /// Tested for truth by `if`/`while`/`not`
    Condition,
    /// Stored, passed, printed or combined
    Value,
}

/// Return type state of the function being translated
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReturnSlot {
    pub declared: Option<StaticType>,
    pub observed: Option<StaticType>,
}

impl ReturnSlot {
    pub fn declared(ty: StaticType) -> Self {
        Self {
            declared: Some(ty),
            observed: None,
        }
    }

    /// Function return type after also returning `ty`, or `None` if the
    /// function cannot return both
    pub fn accept(&self, ty: StaticType) -> Option<StaticType> {
        if let Some(declared) = self.declared {
            return infer::assignable(ty, declared).then_some(declared);
        }
        match self.observed {
            None => Some(ty),
            Some(observed) if infer::assignable(ty, observed) => Some(observed),
            Some(observed) if observed.widens_to(ty) => Some(ty),
            Some(_) => None,
        }
    }

    pub fn record(&mut self, ty: StaticType) {
        if let Some(accepted) = self.accept(ty) {
            self.observed = Some(accepted);
        }
    }

    pub fn return_type(&self) -> StaticType {
        self.declared.or(self.observed).unwrap_or(StaticType::Void)
    }
}

/// Names the emitted program cannot use as identifiers
const RESERVED: &[&str] = &[
    "auto", "bool", "case", "char", "class", "const", "default", "delete", "do", "double", "enum",
    "extern", "float", "goto", "int", "long", "main", "namespace", "new", "operator", "private",
    "protected", "public", "register", "short", "signed", "sizeof", "static", "std", "struct",
    "switch", "template", "this", "throw", "typedef", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile",
];

/// Builtins a user function may not shadow
const BUILTINS: &[&str] = &["print", "int", "float", "bool", "str", "abs", "pow", "range"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

fn both<A, B>(a: Result<A, Category>, b: Result<B, Category>) -> Result<(A, B), Category> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(a), Err(b)) => Err(a.most_severe(b)),
        (Err(e), _) | (_, Err(e)) => Err(e),
    }
}

fn all<T>(results: impl IntoIterator<Item = Result<T, Category>>) -> Result<Vec<T>, Category> {
    let mut values = Vec::new();
    let mut failure: Option<Category> = None;
    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(category) => failure = Some(failure.map_or(category, |f| f.most_severe(category))),
        }
    }
    match failure {
        Some(category) => Err(category),
        None => Ok(values),
    }
}

/// Shape of `range(...)` driving a counted loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBounds<'e> {
    pub start: Option<&'e Expression>,
    pub end: &'e Expression,
    pub step: i64,
}

/// Step literal of a `range` call (`2`, `-1`, ...)
fn step_literal(expr: &Expression) -> Option<i64> {
    match &expr.kind {
        ExpressionKind::Int(value) => Some(*value),
        ExpressionKind::Unary {
            op: UnaryOp::USub,
            operand,
        } => match operand.kind {
            ExpressionKind::Int(value) => Some(-value),
            _ => None,
        },
        _ => None,
    }
}

pub struct Classifier<'a> {
    env: &'a TypeEnvironment,
    config: &'a TranslatorConfig,
    module_level: bool,
    returns: Option<&'a ReturnSlot>,
}

impl<'a> Classifier<'a> {
    pub fn new(env: &'a TypeEnvironment, config: &'a TranslatorConfig) -> Self {
        Self {
            env,
            config,
            module_level: false,
            returns: None,
        }
    }

    /// Statements classified are direct children of the module
    pub fn at_module_level(mut self, module_level: bool) -> Self {
        self.module_level = module_level;
        self
    }

    /// Statements classified belong to a function body
    pub fn in_function(mut self, returns: Option<&'a ReturnSlot>) -> Self {
        self.returns = returns;
        self
    }

    pub fn classify_expression(&self, expr: &Expression, ctx: ExprContext) -> Category {
        match self.check_expression(expr, ctx) {
            Ok(_) => Category::Direct,
            Err(category) => category,
        }
    }

    pub fn classify_statement(&self, stmt: &Statement) -> Category {
        match self.check_statement(stmt) {
            Ok(()) => Category::Direct,
            Err(category) => category,
        }
    }

    /// Static type of a Direct expression, or the category it falls into
    pub fn check_expression(
        &self,
        expr: &Expression,
        ctx: ExprContext,
    ) -> Result<StaticType, Category> {
        match &expr.kind {
            ExpressionKind::Int(value) => infer::int_literal_type(*value),
            ExpressionKind::Float(_) => Ok(StaticType::FloatingPoint),
            ExpressionKind::Bool(_) => Ok(StaticType::Boolean),
            ExpressionKind::Str(_) => Ok(StaticType::String),
            ExpressionKind::NoneLiteral => Ok(StaticType::Void),
            ExpressionKind::Name(name) => self.env.lookup(name).ok_or(Category::Unsupported),

            ExpressionKind::Binary { op, left, right } => {
                let (l, r) = both(
                    self.check_expression(left, ExprContext::Value),
                    self.check_expression(right, ExprContext::Value),
                )?;
                let ty = infer::binary_type(*op, l, r)?;
                // The sign correction of `%` evaluates the divisor twice
                if *op == BinaryOp::Mod && right.contains_call() {
                    return Err(Category::Unsupported);
                }
                Ok(ty)
            }

            ExpressionKind::BoolOp { values, .. } => {
                let types = all(values.iter().map(|v| self.check_expression(v, ctx)))?;
                infer::bool_op_type(ctx, &types)
            }

            ExpressionKind::Unary { op, operand } => {
                let inner = if *op == UnaryOp::Not {
                    ExprContext::Condition
                } else {
                    ExprContext::Value
                };
                infer::unary_type(*op, self.check_expression(operand, inner)?)
            }

            ExpressionKind::Compare {
                left,
                ops,
                comparators,
            } => self.check_comparison(left, ops, comparators),

            ExpressionKind::Call {
                function,
                arguments,
                keywords,
            } => self.check_call(function, arguments, keywords),

            ExpressionKind::List(items)
            | ExpressionKind::Tuple(items)
            | ExpressionKind::Set(items) => Err(self.collection_category(&[items])),
            ExpressionKind::Dict { keys, values } => Err(self.collection_category(&[keys, values])),

            ExpressionKind::NamedExpr { .. } => Err(Category::ChainedAssignment),
            ExpressionKind::Attribute { .. } | ExpressionKind::Other { .. } => {
                Err(Category::Unsupported)
            }
        }
    }

    fn check_comparison(
        &self,
        left: &Expression,
        ops: &[CompareOp],
        comparators: &[Expression],
    ) -> Result<StaticType, Category> {
        if ops.is_empty() || ops.len() != comparators.len() {
            return Err(Category::Unsupported);
        }

        let operands = std::iter::once(left).chain(comparators.iter());
        let types = all(operands.map(|e| self.check_expression(e, ExprContext::Value)))?;

        // Inner comparators are evaluated twice once the chain is split
        let inner = &comparators[..comparators.len() - 1];
        if inner.iter().any(Expression::contains_call) {
            return Err(Category::Unsupported);
        }

        for (index, op) in ops.iter().enumerate() {
            infer::comparison_type(*op, types[index], types[index + 1])?;
        }
        Ok(StaticType::Boolean)
    }

    fn check_call(
        &self,
        function: &Expression,
        arguments: &[Expression],
        keywords: &[Keyword],
    ) -> Result<StaticType, Category> {
        let argument_exprs = arguments.iter().chain(keywords.iter().map(|k| &k.value));
        let (target, argument_types) = both(
            infer::call_target(function, self.env),
            all(argument_exprs.map(|a| self.check_expression(a, ExprContext::Value))),
        )?;

        match target {
            CallTarget::User(name) => {
                let signature = self.env.function(&name).ok_or(Category::OutOfScopeCall)?;
                let slots = infer::bind_arguments(
                    signature,
                    arguments,
                    keywords,
                    self.config.default_params,
                )?;

                let mut failure: Option<Category> = None;
                for (slot, param) in slots.iter().zip(&signature.params) {
                    if let ArgSlot::Supplied(argument) = slot {
                        let ty = self.check_expression(argument, ExprContext::Value)?;
                        if let Some(category) = infer::argument_category(ty, &param.param_type) {
                            failure = Some(failure.map_or(category, |f| f.most_severe(category)));
                        }
                    }
                }
                match failure {
                    Some(category) => Err(category),
                    None => Ok(signature.return_type),
                }
            }
            builtin => {
                if !keywords.is_empty() {
                    return Err(Category::Unsupported);
                }
                infer::builtin_call_type(&builtin, &argument_types)
            }
        }
    }

    /// Collections are never typed: heterogeneous or unknown element types
    /// are dynamic, homogeneous ones have no target container mapping
    fn collection_category(&self, groups: &[&Vec<Expression>]) -> Category {
        for items in groups {
            let mut element: Option<StaticType> = None;
            for item in items.iter() {
                match self.check_expression(item, ExprContext::Value) {
                    Ok(ty) if ty.is_determinate() && element.map_or(true, |e| e == ty) => {
                        element = Some(ty)
                    }
                    _ => return Category::DynamicCollection,
                }
            }
            if element.is_none() {
                return Category::DynamicCollection;
            }
        }
        Category::Unsupported
    }

    fn check_statement(&self, stmt: &Statement) -> Result<(), Category> {
        match &stmt.kind {
            StatementKind::Expression(expr) => self.check_expression_statement(expr),

            StatementKind::Assign { targets, value } => {
                if targets.len() != 1 {
                    return Err(Category::ChainedAssignment);
                }
                let (name, ty) = both(
                    targets[0].as_name().ok_or(Category::Unsupported),
                    self.check_expression(value, ExprContext::Value),
                )?;
                self.check_binding(name, ty)
            }

            StatementKind::AugAssign { target, op, value } => {
                let (name, value_type) = both(
                    target.as_name().ok_or(Category::Unsupported),
                    self.check_expression(value, ExprContext::Value),
                )?;
                let current = self.env.lookup(name).ok_or(Category::Unsupported)?;
                self.check_binding(name, infer::binary_type(*op, current, value_type)?)
            }

            StatementKind::If { condition, .. } => self.check_condition(condition).map(drop),

            StatementKind::While { condition, orelse, .. } => {
                if !orelse.is_empty() {
                    return Err(Category::Unsupported);
                }
                self.check_condition(condition).map(drop)
            }

            StatementKind::For {
                target,
                iter,
                body,
                orelse,
            } => {
                if !orelse.is_empty() {
                    return Err(Category::Unsupported);
                }
                self.check_range_loop(target, iter, body).map(drop)
            }

            StatementKind::FunctionDef { .. } => {
                if !self.module_level {
                    return Err(Category::Unsupported);
                }
                let signature = self.check_function_header(stmt)?;
                // Only the hoisted definition of a name is emitted
                match self.env.function(&signature.name) {
                    Some(hoisted) if hoisted.node_id == stmt.node_id => Ok(()),
                    _ => Err(Category::Unsupported),
                }
            }

            StatementKind::Return(value) => {
                let slot = self.returns.ok_or(Category::Unsupported)?;
                let ty = match value {
                    None => StaticType::Void,
                    Some(expr) => self.check_expression(expr, ExprContext::Value)?,
                };
                slot.accept(ty).map(drop).ok_or(Category::TypeNarrowing)
            }

            StatementKind::Break | StatementKind::Continue | StatementKind::Pass => Ok(()),

            StatementKind::Import { names } => {
                if names.iter().all(|name| name == "math") {
                    Ok(())
                } else {
                    Err(Category::Unsupported)
                }
            }

            StatementKind::ImportFrom { module, names } => {
                let ported = |name: &String| infer::MATH_FUNCTIONS.contains(&name.as_str());
                if module == "math" && names.iter().all(ported) {
                    Ok(())
                } else {
                    Err(Category::Unsupported)
                }
            }

            StatementKind::DocString(_) | StatementKind::Comment(_) => Err(Category::DocOnly),
            StatementKind::Other { .. } => Err(Category::Unsupported),
        }
    }

    /// Only printing and user calls have an observable effect
    fn check_expression_statement(&self, expr: &Expression) -> Result<(), Category> {
        if let ExpressionKind::Call {
            function,
            arguments,
            keywords,
        } = &expr.kind
        {
            match infer::call_target(function, self.env) {
                Ok(CallTarget::Print) | Ok(CallTarget::User(_)) | Err(_) => {
                    return self.check_call(function, arguments, keywords).map(drop);
                }
                Ok(_) => {}
            }
        }

        if expr.contains_named_expr() {
            Err(Category::ChainedAssignment)
        } else {
            Err(Category::ValueUnused)
        }
    }

    /// Can `name` hold a value of type `ty` from here on
    fn check_binding(&self, name: &str, ty: StaticType) -> Result<(), Category> {
        if ty == StaticType::Void || is_reserved(name) || self.env.function(name).is_some() {
            return Err(Category::Unsupported);
        }
        match self.env.lookup(name) {
            None => Ok(()),
            Some(previous) if infer::assignable(ty, previous) => Ok(()),
            Some(_) => Err(Category::TypeNarrowing),
        }
    }

    pub fn check_condition(&self, condition: &Expression) -> Result<StaticType, Category> {
        self.check_expression(condition, ExprContext::Condition)
            .and_then(infer::condition_type)
    }

    /// Shape of a `for name in range(...)` header, if it is a counted loop
    pub fn range_bounds<'e>(&self, iter: &'e Expression) -> Option<RangeBounds<'e>> {
        let ExpressionKind::Call {
            function,
            arguments,
            keywords,
        } = &iter.kind
        else {
            return None;
        };
        if function.as_name() != Some("range")
            || !keywords.is_empty()
            || self.env.lookup("range").is_some()
            || self.env.function("range").is_some()
        {
            return None;
        }

        match arguments.as_slice() {
            [end] => Some(RangeBounds {
                start: None,
                end,
                step: 1,
            }),
            [start, end] => Some(RangeBounds {
                start: Some(start),
                end,
                step: 1,
            }),
            [start, end, step] => step_literal(step).filter(|s| *s != 0).map(|step| RangeBounds {
                start: Some(start),
                end,
                step,
            }),
            _ => None,
        }
    }

    /// The loop variable must be fresh and never stored into by the body;
    /// the end bound is re-evaluated on every iteration, so it cannot call
    fn check_range_loop(
        &self,
        target: &Expression,
        iter: &Expression,
        body: &[Statement],
    ) -> Result<(), Category> {
        let name = target.as_name().ok_or(Category::Unsupported)?;
        let bounds = self.range_bounds(iter).ok_or(Category::Unsupported)?;
        if bounds.end.contains_call() || body.iter().any(|stmt| stmt.assigns_to(name)) {
            return Err(Category::Unsupported);
        }

        let limits = bounds.start.into_iter().chain(std::iter::once(bounds.end));
        let types = all(limits.map(|e| self.check_expression(e, ExprContext::Value)))?;
        if !types.iter().all(StaticType::is_integral) {
            return Err(Category::Unsupported);
        }
        if i32::try_from(bounds.step).is_err() {
            return Err(Category::TypeNarrowing);
        }

        if is_reserved(name) {
            return Err(Category::Unsupported);
        }
        match self.env.lookup(name) {
            None => Ok(()),
            // The loop variable must keep its last value after the loop
            Some(StaticType::Integer) => Err(Category::Unsupported),
            Some(_) => Err(Category::TypeNarrowing),
        }
    }

    /// Signature of a function declaration, checked without its body
    pub fn check_function_header(&self, stmt: &Statement) -> Result<FunctionSignature, Category> {
        let StatementKind::FunctionDef {
            name,
            parameters,
            returns,
            decorators,
            ..
        } = &stmt.kind
        else {
            return Err(Category::Unsupported);
        };

        if !decorators.is_empty() || is_reserved(name) || BUILTINS.contains(&name.as_str()) {
            return Err(Category::Unsupported);
        }

        let mut params = Vec::new();
        let mut generic_count = 0;
        for param in parameters {
            if param.kind != ParameterKind::Positional || is_reserved(&param.name) {
                return Err(Category::Unsupported);
            }

            let default = match &param.default {
                None => None,
                Some(expr) => {
                    let literal = CppExpr::from_literal(expr).ok_or(Category::Unsupported)?;
                    if let CppExpr::IntLiteral { value, .. } = literal {
                        infer::int_literal_type(value)?;
                    }
                    Some(literal)
                }
            };

            let param_type = match (&param.annotation, &default) {
                (Some(annotation), _) => {
                    let ty = StaticType::from_annotation(annotation);
                    if !ty.is_determinate() || ty == StaticType::Void {
                        return Err(Category::Unsupported);
                    }
                    if let Some(default) = &default {
                        if !infer::assignable(default.get_type(), ty) {
                            return Err(Category::TypeNarrowing);
                        }
                    }
                    ParamType::Concrete(ty)
                }
                (None, Some(default)) => ParamType::Concrete(default.get_type()),
                (None, None) => match self.config.generic_params {
                    GenericParamPolicy::Template => {
                        generic_count += 1;
                        ParamType::Generic(format!("T{}", generic_count - 1))
                    }
                    GenericParamPolicy::Skip => return Err(Category::OutOfScopeCall),
                },
            };

            params.push(SignatureParam {
                name: param.name.clone(),
                param_type,
                default,
            });
        }

        let (return_type, annotated_return) = match returns {
            Some(annotation) => {
                let ty = StaticType::from_annotation(annotation);
                if !ty.is_determinate() {
                    return Err(Category::Unsupported);
                }
                (ty, true)
            }
            None => (StaticType::Unresolved, false),
        };

        Ok(FunctionSignature {
            name: name.clone(),
            node_id: stmt.node_id,
            params,
            return_type,
            annotated_return,
        })
    }
}

/// Augmented assignment `x op= v` rewritten as the value of `x = x op v`
pub fn desugar_aug_assign(target: &Expression, op: BinaryOp, value: &Expression) -> Expression {
    let text = format!("{} {} {}", target.text, op, value.text);
    let mut expr = Expression::new(
        ExpressionKind::Binary {
            op,
            left: Box::new(target.clone()),
            right: Box::new(value.clone()),
        },
        value.span.clone(),
        text,
    );
    expr.node_id = value.node_id;
    expr
}
