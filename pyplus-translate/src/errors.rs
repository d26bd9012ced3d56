//! Translation error taxonomy and skip diagnostics
//!
//! None of these abort a run: every problem is contained to the node it
//! occurs in, which is emitted as a comment and recorded as a `SkipRecord`.

use crate::classifier::{Category, ReasonCode};
use pyplus_common::{Diagnostic, SourceSpan};
use pyplus_frontend::NodeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("Type cannot change without precision loss at {span}")]
    TypeConflict { span: SourceSpan },

    #[error("Unsupported construct ({category}) at {span}")]
    UnsupportedConstruct { category: Category, span: SourceSpan },

    #[error("Unresolved callee ({category}) at {span}")]
    UnresolvedCallee { category: Category, span: SourceSpan },
}

impl TranslateError {
    /// Error describing a skip of the given category, if it is one
    pub fn from_category(category: Category, span: SourceSpan) -> Option<Self> {
        match category {
            Category::Direct | Category::DocOnly => None,
            Category::TypeNarrowing => Some(TranslateError::TypeConflict { span }),
            Category::OutOfScopeCall | Category::InvalidMethodCall => {
                Some(TranslateError::UnresolvedCallee { category, span })
            }
            Category::ValueUnused
            | Category::ChainedAssignment
            | Category::DynamicCollection
            | Category::Unsupported => {
                Some(TranslateError::UnsupportedConstruct { category, span })
            }
        }
    }

    pub fn category(&self) -> Category {
        match self {
            TranslateError::TypeConflict { .. } => Category::TypeNarrowing,
            TranslateError::UnsupportedConstruct { category, .. }
            | TranslateError::UnresolvedCallee { category, .. } => *category,
        }
    }

    pub fn span(&self) -> &SourceSpan {
        match self {
            TranslateError::TypeConflict { span }
            | TranslateError::UnsupportedConstruct { span, .. }
            | TranslateError::UnresolvedCallee { span, .. } => span,
        }
    }
}

/// A construct left for manual porting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub span: SourceSpan,
    pub node_id: NodeId,
    pub category: Category,
    pub reason: ReasonCode,
    /// Source text of the skipped node, byte-for-byte
    pub original_text: String,
}

impl SkipRecord {
    pub fn error(&self) -> Option<TranslateError> {
        TranslateError::from_category(self.category, self.span.clone())
    }
}

impl From<&SkipRecord> for Diagnostic {
    fn from(record: &SkipRecord) -> Self {
        let first_line = record.original_text.lines().next().unwrap_or_default();
        let diagnostic = Diagnostic::warning(record.reason.to_string(), record.span.clone())
            .with_note(format!("manual port required: {}", first_line));
        match record.error() {
            Some(error) => diagnostic.with_note(error.to_string()),
            None => diagnostic,
        }
    }
}
