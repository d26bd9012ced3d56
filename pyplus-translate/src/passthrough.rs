//! Passthrough annotator
//!
//! Turns skipped nodes into comment pseudo-statements carrying the original
//! text, and keeps the structured record of every skip.

use crate::classifier::{Category, ReasonCode};
use crate::errors::SkipRecord;
use crate::target::{CppComment, CppStmt};
use log::debug;
use pyplus_frontend::{SourceNode, Statement, StatementKind};

#[derive(Debug, Default)]
pub struct PassthroughAnnotator {
    records: Vec<SkipRecord>,
}

impl PassthroughAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `node` as an inert comment and record why
    pub fn annotate(&mut self, node: &dyn SourceNode, category: Category) -> CppStmt {
        let reason = category.reason().unwrap_or(ReasonCode::NotDirectlyTranslatable);
        debug!("Skipping node {} at {}: {}", node.node_id(), node.span(), reason);

        self.records.push(SkipRecord {
            span: node.span().clone(),
            node_id: node.node_id(),
            category,
            reason,
            original_text: node.text().to_string(),
        });

        CppStmt::Comment(CppComment::Skipped {
            reason,
            original: node.text().to_string(),
        })
    }

    /// Structural comment for a doc-string or comment statement
    pub fn doc_comment(stmt: &Statement) -> CppStmt {
        match &stmt.kind {
            StatementKind::DocString(text) => {
                let lines: Vec<&str> = text.lines().map(str::trim).collect();
                let first = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
                let last = lines.iter().rposition(|l| !l.is_empty()).map_or(first, |i| i + 1);
                let body = lines[first..last.max(first)].iter().map(|l| l.to_string()).collect();
                CppStmt::Comment(CppComment::Doc(body))
            }
            StatementKind::Comment(text) => {
                CppStmt::Comment(CppComment::Line(text.trim().to_string()))
            }
            _ => CppStmt::Comment(CppComment::Line(stmt.text.clone())),
        }
    }

    pub fn records(&self) -> &[SkipRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SkipRecord> {
        self.records
    }
}
