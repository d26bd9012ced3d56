//! Statement translator
//!
//! Maps classified statements onto target statements. Declarations versus
//! reassignments are decided against the type environment, and every nested
//! block is translated in its own scope frame.

use crate::classifier::{desugar_aug_assign, Category, Classifier, ExprContext, ReturnSlot};
use crate::config::{DefaultParamPolicy, TranslatorConfig};
use crate::expressions::ExpressionTranslator;
use crate::infer::{self, CallTarget};
use crate::passthrough::PassthroughAnnotator;
use crate::target::{CppExpr, CppFunction, CppParam, CppStmt};
use crate::type_env::{BindOutcome, FunctionSignature, Globals, TypeEnvironment};
use log::{debug, warn};
use pyplus_common::StaticType;
use pyplus_frontend::{Expression, ExpressionKind, Statement, StatementKind};

pub struct StatementTranslator<'a> {
    env: &'a mut TypeEnvironment,
    config: &'a TranslatorConfig,
    annotator: &'a mut PassthroughAnnotator,
    returns: Option<ReturnSlot>,
    module_level: bool,
}

impl<'a> StatementTranslator<'a> {
    pub fn new(
        env: &'a mut TypeEnvironment,
        config: &'a TranslatorConfig,
        annotator: &'a mut PassthroughAnnotator,
    ) -> Self {
        Self {
            env,
            config,
            annotator,
            returns: None,
            module_level: false,
        }
    }

    /// Statements translated are direct children of the module
    pub fn at_module_level(mut self, module_level: bool) -> Self {
        self.module_level = module_level;
        self
    }

    /// Statements translated form a function body
    pub fn with_return_slot(mut self, slot: ReturnSlot) -> Self {
        self.returns = Some(slot);
        self
    }

    pub fn return_slot(&self) -> Option<&ReturnSlot> {
        self.returns.as_ref()
    }

    fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&*self.env, self.config)
            .at_module_level(self.module_level)
            .in_function(self.returns.as_ref())
    }

    fn expressions(&self) -> ExpressionTranslator<'_> {
        ExpressionTranslator::new(&*self.env, self.config)
    }

    /// Translate one statement into zero or more target statements.
    ///
    /// A skipped statement yields exactly one comment pseudo-statement.
    pub fn translate(&mut self, stmt: &Statement) -> Vec<CppStmt> {
        let category = self.classifier().classify_statement(stmt);
        debug!("Statement {} at {} classified {}", stmt.node_id, stmt.span, category);

        match category {
            Category::Direct => match self.lower(stmt) {
                Ok(lowered) => lowered,
                Err(category) => {
                    warn!(
                        "Statement {} ('{}') classified Direct but could not be lowered: {}",
                        stmt.node_id,
                        stmt.text.lines().next().unwrap_or_default(),
                        category
                    );
                    vec![self.annotator.annotate(stmt, category)]
                }
            },
            Category::DocOnly => vec![PassthroughAnnotator::doc_comment(stmt)],
            category => vec![self.annotator.annotate(stmt, category)],
        }
    }

    /// Translate a block in a fresh child scope
    pub fn translate_block(&mut self, body: &[Statement]) -> Vec<CppStmt> {
        self.env.push_scope();
        let lowered = self.translate_statements(body);
        self.env.pop_scope();
        lowered
    }

    /// Translate statements in the current scope
    pub fn translate_statements(&mut self, body: &[Statement]) -> Vec<CppStmt> {
        let module_level = std::mem::replace(&mut self.module_level, false);
        let lowered = body.iter().flat_map(|stmt| self.translate(stmt)).collect();
        self.module_level = module_level;
        lowered
    }

    fn lower(&mut self, stmt: &Statement) -> Result<Vec<CppStmt>, Category> {
        match &stmt.kind {
            StatementKind::Expression(expr) => Ok(vec![self.lower_expression_statement(expr)?]),

            StatementKind::Assign { targets, value } => {
                let [target] = targets.as_slice() else {
                    return Err(Category::ChainedAssignment);
                };
                let name = target.as_name().ok_or(Category::Unsupported)?;
                let value = self.expressions().lower(value, ExprContext::Value)?;
                Ok(vec![self.assign(name, value)?])
            }

            StatementKind::AugAssign { target, op, value } => {
                let name = target.as_name().ok_or(Category::Unsupported)?;
                let combined = desugar_aug_assign(target, *op, value);
                let value = self.expressions().lower(&combined, ExprContext::Value)?;
                Ok(vec![self.assign(name, value)?])
            }

            StatementKind::If {
                condition,
                body,
                orelse,
            } => Ok(vec![self.lower_if(condition, body, orelse)?]),

            StatementKind::While { condition, body, .. } => {
                let condition = self.expressions().lower(condition, ExprContext::Condition)?;
                let body = self.translate_block(body);
                Ok(vec![CppStmt::While { condition, body }])
            }

            StatementKind::For {
                target, iter, body, ..
            } => Ok(vec![self.lower_for(target, iter, body)?]),

            StatementKind::Return(value) => Ok(vec![self.lower_return(value.as_ref())?]),

            StatementKind::Break => Ok(vec![CppStmt::Break]),
            StatementKind::Continue => Ok(vec![CppStmt::Continue]),
            StatementKind::Pass => Ok(Vec::new()),

            StatementKind::Import { .. } => {
                self.env.import_math_module();
                Ok(Vec::new())
            }
            StatementKind::ImportFrom { names, .. } => {
                for name in names {
                    self.env.import_math_function(name);
                }
                Ok(Vec::new())
            }

            // Definitions are lowered by `translate_function`
            _ => Err(Category::Unsupported),
        }
    }

    fn lower_expression_statement(&self, expr: &Expression) -> Result<CppStmt, Category> {
        if let ExpressionKind::Call {
            function, arguments, ..
        } = &expr.kind
        {
            if infer::call_target(function, &*self.env)? == CallTarget::Print {
                let arguments = self.expressions().lower_arguments(arguments)?;
                let types: Vec<StaticType> = arguments.iter().map(CppExpr::get_type).collect();
                infer::builtin_call_type(&CallTarget::Print, &types)?;
                return Ok(CppStmt::Print(arguments));
            }
        }
        Ok(CppStmt::Expression(self.expressions().lower(expr, ExprContext::Value)?))
    }

    /// Declare `name` on first assignment, reassign it afterwards
    fn assign(&mut self, name: &str, value: CppExpr) -> Result<CppStmt, Category> {
        let ty = value.get_type();
        match self.env.lookup(name) {
            None => match self.env.bind(name, ty) {
                BindOutcome::Accepted => Ok(CppStmt::Declaration {
                    name: name.to_string(),
                    decl_type: ty,
                    initializer: value,
                }),
                BindOutcome::Conflict { .. } => Err(Category::TypeNarrowing),
            },
            Some(previous) if infer::assignable(ty, previous) => Ok(CppStmt::Assignment {
                name: name.to_string(),
                value,
            }),
            Some(_) => Err(Category::TypeNarrowing),
        }
    }

    /// `elif` chains become `else if` branches as long as their conditions
    /// translate; the first one that does not becomes a plain `else` block
    fn lower_if(
        &mut self,
        condition: &Expression,
        body: &[Statement],
        orelse: &[Statement],
    ) -> Result<CppStmt, Category> {
        let condition = self.expressions().lower(condition, ExprContext::Condition)?;
        let mut branches = vec![(condition, self.translate_block(body))];
        let mut else_body = None;

        let mut rest = orelse;
        while !rest.is_empty() {
            if let [Statement {
                kind:
                    StatementKind::If {
                        condition,
                        body,
                        orelse,
                    },
                ..
            }] = rest
            {
                if self.classifier().check_condition(condition).is_ok() {
                    let condition = self.expressions().lower(condition, ExprContext::Condition)?;
                    branches.push((condition, self.translate_block(body)));
                    rest = orelse.as_slice();
                    continue;
                }
            }
            else_body = Some(self.translate_block(rest));
            break;
        }

        Ok(CppStmt::If { branches, else_body })
    }

    fn lower_for(
        &mut self,
        target: &Expression,
        iter: &Expression,
        body: &[Statement],
    ) -> Result<CppStmt, Category> {
        let name = target.as_name().ok_or(Category::Unsupported)?;
        let bounds = self.classifier().range_bounds(iter).ok_or(Category::Unsupported)?;
        if self.env.lookup(name).is_some() {
            return Err(Category::Unsupported);
        }

        let start = match bounds.start {
            Some(start) => self.expressions().lower(start, ExprContext::Value)?,
            None => CppExpr::int(0),
        };
        let end = self.expressions().lower(bounds.end, ExprContext::Value)?;

        self.env.push_scope();
        let body = match self.env.bind(name, StaticType::Integer) {
            BindOutcome::Accepted => Some(self.translate_statements(body)),
            BindOutcome::Conflict { .. } => None,
        };
        self.env.pop_scope();
        let body = body.ok_or(Category::TypeNarrowing)?;

        Ok(CppStmt::For {
            variable: name.to_string(),
            start,
            end,
            step: bounds.step,
            body,
        })
    }

    fn lower_return(&mut self, value: Option<&Expression>) -> Result<CppStmt, Category> {
        let value = match value {
            None => None,
            Some(expr) if matches!(expr.kind, ExpressionKind::NoneLiteral) => None,
            Some(expr) => Some(self.expressions().lower(expr, ExprContext::Value)?),
        };
        let ty = value.as_ref().map_or(StaticType::Void, CppExpr::get_type);

        let slot = self.returns.as_mut().ok_or(Category::Unsupported)?;
        if slot.accept(ty).is_none() {
            return Err(Category::TypeNarrowing);
        }
        slot.record(ty);
        Ok(CppStmt::Return(value))
    }
}

/// Translate the body of a hoisted function in an environment holding only
/// its parameters and the program's globals
pub fn translate_function(
    signature: &FunctionSignature,
    body: &[Statement],
    globals: &Globals,
    config: &TranslatorConfig,
    annotator: &mut PassthroughAnnotator,
) -> CppFunction {
    let mut env = TypeEnvironment::with_globals(globals.clone());
    for param in &signature.params {
        if let BindOutcome::Conflict { previous, new } =
            env.bind(&param.name, param.param_type.static_type())
        {
            warn!(
                "Parameter '{}' of '{}' bound as both {} and {}",
                param.name, signature.name, previous, new
            );
        }
    }

    let slot = if signature.annotated_return {
        ReturnSlot::declared(signature.return_type)
    } else {
        ReturnSlot::default()
    };

    let mut translator =
        StatementTranslator::new(&mut env, config, annotator).with_return_slot(slot);
    let lowered = translator.translate_statements(body);
    let return_type = translator
        .return_slot()
        .map_or(StaticType::Void, ReturnSlot::return_type);

    let params = signature
        .params
        .iter()
        .map(|param| CppParam {
            name: param.name.clone(),
            param_type: param.param_type.clone(),
            default: match config.default_params {
                DefaultParamPolicy::Keep => param.default.clone(),
                DefaultParamPolicy::Skip => None,
            },
        })
        .collect();

    CppFunction {
        name: signature.name.clone(),
        return_type,
        params,
        body: lowered,
    }
}
