//! Emitter
//!
//! Drives classification and translation over a whole module in source
//! order. Function signatures are hoisted first so that calls may precede
//! definitions; each function body is translated in its own environment.

use crate::classifier::{Category, Classifier};
use crate::config::TranslatorConfig;
use crate::errors::SkipRecord;
use crate::passthrough::PassthroughAnnotator;
use crate::statements::{translate_function, StatementTranslator};
use crate::target::{CppExpr, CppFunction, CppStmt, Include, ParamType, TargetItem, TargetProgram};
use crate::type_env::{FunctionSignature, Globals, TypeEnvironment};
use log::debug;
use pyplus_common::StaticType;
use pyplus_frontend::{Module, Statement, StatementKind};
use std::collections::BTreeSet;

/// Output of one emitter pass
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub program: TargetProgram,
    /// Every skipped construct, in the order it was encountered
    pub diagnostics: Vec<SkipRecord>,
}

impl Translation {
    pub fn skipped(&self) -> usize {
        self.diagnostics.len()
    }
}

pub struct Emitter {
    config: TranslatorConfig,
}

/// Signature and body of `stmt` if it is the hoisted definition of its name
fn hoisted<'s, 'g>(
    stmt: &'s Statement,
    globals: &'g Globals,
) -> Option<(&'g FunctionSignature, &'s [Statement])> {
    let StatementKind::FunctionDef { name, body, .. } = &stmt.kind else {
        return None;
    };
    globals
        .functions
        .get(name)
        .filter(|signature| signature.node_id == stmt.node_id)
        .map(|signature| (signature, body.as_slice()))
}

impl Emitter {
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, module: &Module) -> Translation {
        let globals = self.hoist(module);
        let globals = self.infer_return_types(module, globals);

        let mut annotator = PassthroughAnnotator::new();
        // Imports become visible to `main` where they occur
        let mut main_env = TypeEnvironment::with_globals(Globals {
            functions: globals.functions.clone(),
            ..Globals::default()
        });

        let mut items = Vec::new();
        for stmt in &module.body {
            if let Some((signature, body)) = hoisted(stmt, &globals) {
                debug!("Translating function '{}'", signature.name);
                let function =
                    translate_function(signature, body, &globals, &self.config, &mut annotator);
                items.push(TargetItem::Function(function));
                continue;
            }

            let mut translator =
                StatementTranslator::new(&mut main_env, &self.config, &mut annotator)
                    .at_module_level(true);
            items.extend(translator.translate(stmt).into_iter().map(TargetItem::Statement));
        }

        let program = TargetProgram {
            includes: collect_includes(&items),
            items,
        };
        let diagnostics = annotator.into_records();
        debug!(
            "Translated '{}': {} items, {} constructs skipped",
            module.filename,
            program.items.len(),
            diagnostics.len()
        );
        Translation { program, diagnostics }
    }

    /// Collect math imports and the signatures of module-level functions.
    ///
    /// The first definition of a name wins; later ones are skipped when the
    /// module body is translated.
    fn hoist(&self, module: &Module) -> Globals {
        let mut env = TypeEnvironment::new();

        for stmt in &module.body {
            let is_import = matches!(
                stmt.kind,
                StatementKind::Import { .. } | StatementKind::ImportFrom { .. }
            );
            if !is_import {
                continue;
            }
            if Classifier::new(&env, &self.config).classify_statement(stmt) != Category::Direct {
                continue;
            }
            match &stmt.kind {
                StatementKind::Import { .. } => env.import_math_module(),
                StatementKind::ImportFrom { names, .. } => {
                    for name in names {
                        env.import_math_function(name);
                    }
                }
                _ => {}
            }
        }

        for stmt in &module.body {
            let StatementKind::FunctionDef { name, .. } = &stmt.kind else {
                continue;
            };
            if env.function(name).is_some() {
                debug!("Redefinition of '{}' at {} is not hoisted", name, stmt.span);
                continue;
            }
            match Classifier::new(&env, &self.config).check_function_header(stmt) {
                Ok(signature) => env.declare_function(signature),
                Err(category) => {
                    debug!("Function '{}' at {} not hoisted: {}", name, stmt.span, category)
                }
            }
        }

        env.globals().clone()
    }

    /// Infer unannotated return types by translating bodies until no
    /// signature changes
    fn infer_return_types(&self, module: &Module, mut globals: Globals) -> Globals {
        let pending: Vec<&Statement> = module
            .body
            .iter()
            .filter(|stmt| {
                hoisted(stmt, &globals).is_some_and(|(signature, _)| !signature.annotated_return)
            })
            .collect();

        for round in 0..=pending.len() {
            let mut changed = false;
            for stmt in &pending {
                let Some((signature, body)) = hoisted(stmt, &globals) else {
                    continue;
                };
                let mut scratch = PassthroughAnnotator::new();
                let inferred =
                    translate_function(signature, body, &globals, &self.config, &mut scratch)
                        .return_type;
                let name = signature.name.clone();

                if let Some(signature) = globals.functions.get_mut(&name) {
                    if signature.return_type != inferred {
                        debug!("Return type of '{}' is {} (round {})", name, inferred, round);
                        signature.return_type = inferred;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        globals
    }
}

/// Standard headers used by the translated items
fn collect_includes(items: &[TargetItem]) -> BTreeSet<Include> {
    let mut includes = BTreeSet::new();
    for item in items {
        match item {
            TargetItem::Function(function) => {
                if uses_string(function) {
                    includes.insert(Include::String);
                }
                for stmt in &function.body {
                    statement_includes(stmt, &mut includes);
                }
            }
            TargetItem::Statement(stmt) => statement_includes(stmt, &mut includes),
        }
    }
    includes
}

fn statement_includes(stmt: &CppStmt, includes: &mut BTreeSet<Include>) {
    stmt.walk(&mut |nested| match nested {
        CppStmt::Print(_) => {
            includes.insert(Include::Iostream);
        }
        CppStmt::Declaration {
            decl_type: StaticType::String,
            ..
        } => {
            includes.insert(Include::String);
        }
        _ => {}
    });
    stmt.walk_exprs(&mut |expr| expression_includes(expr, includes));
}

fn expression_includes(expr: &CppExpr, includes: &mut BTreeSet<Include>) {
    if expr.get_type() == StaticType::String {
        includes.insert(Include::String);
    }
    if let CppExpr::Call { function, .. } = expr {
        match function.as_str() {
            "std::to_string" | "std::string" => {
                includes.insert(Include::String);
            }
            other if other.starts_with("std::") => {
                includes.insert(Include::Cmath);
            }
            _ => {}
        }
    }
}

fn uses_string(function: &CppFunction) -> bool {
    function.return_type == StaticType::String
        || function
            .params
            .iter()
            .any(|param| param.param_type == ParamType::Concrete(StaticType::String))
}
