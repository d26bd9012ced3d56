//! PyPlus translator - Translation Engine
//!
//! This crate turns a source syntax tree into a typed C++ syntax tree:
//! - Type environment: scoped identifier types, hoisted signatures, imports
//! - Classifier: decides per node whether it translates 1:1 and why not
//! - Expression and statement translators: lower Direct nodes
//! - Passthrough annotator: keeps skipped nodes as reason-coded comments
//! - Emitter: drives the whole module in source order
//!
//! Problems in the source program never abort a run; they are contained to
//! the node they occur in and reported as `SkipRecord`s.

pub mod classifier;
pub mod config;
pub mod emitter;
pub mod errors;
pub mod expressions;
pub mod infer;
pub mod passthrough;
pub mod statements;
pub mod target;
pub mod type_env;

mod statements_tests;

pub use classifier::{Category, Classifier, ExprContext, ReasonCode};
pub use config::{DefaultParamPolicy, GenericParamPolicy, TranslatorConfig};
pub use emitter::{Emitter, Translation};
pub use errors::{SkipRecord, TranslateError};
pub use expressions::ExpressionTranslator;
pub use passthrough::PassthroughAnnotator;
pub use statements::StatementTranslator;
pub use target::{
    CppBinaryOp, CppComment, CppExpr, CppFunction, CppParam, CppStmt, CppUnaryOp, Include,
    ParamType, TargetItem, TargetProgram,
};
pub use type_env::{BindOutcome, FunctionSignature, TypeEnvironment};

use pyplus_frontend::Module;

/// Outcome of translating a single node
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationVerdict<T> {
    Translated(T),
    Skipped {
        reason: ReasonCode,
        original_text: String,
    },
}

impl<T> TranslationVerdict<T> {
    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationVerdict::Translated(_))
    }

    pub fn translated(self) -> Option<T> {
        match self {
            TranslationVerdict::Translated(node) => Some(node),
            TranslationVerdict::Skipped { .. } => None,
        }
    }
}

/// Translate a whole module
pub fn translate(module: &Module, config: &TranslatorConfig) -> Translation {
    Emitter::new(*config).run(module)
}
