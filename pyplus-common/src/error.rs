//! Error handling for the PyPlus translator
//!
//! This module defines the workspace error type and the diagnostic
//! reporting utilities shared by the engine and the driver.

use crate::source_loc::SourceSpan;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised outside of translation proper (loading, configuration, I/O).
///
/// Problems in the translated program never surface here: the engine turns
/// them into skipped constructs instead.
#[derive(Error, Debug)]
pub enum PyPlusError {
    #[error("Failed to load syntax tree: {message}")]
    Load { message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl PyPlusError {
    pub fn load_error(message: impl Into<String>) -> Self {
        PyPlusError::Load { message: message.into() }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        PyPlusError::Config { message: message.into() }
    }
}

impl From<std::io::Error> for PyPlusError {
    fn from(err: std::io::Error) -> Self {
        PyPlusError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PyPlusError {
    fn from(err: serde_json::Error) -> Self {
        PyPlusError::Load {
            message: err.to_string(),
        }
    }
}

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with location and severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: SourceSpan,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: String, span: SourceSpan) -> Self {
        Self {
            severity: Severity::Error,
            message,
            span,
            notes: Vec::new(),
        }
    }

    pub fn warning(message: String, span: SourceSpan) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span,
            notes: Vec::new(),
        }
    }

    pub fn note(message: String, span: SourceSpan) -> Self {
        Self {
            severity: Severity::Note,
            message,
            span,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.severity, self.message, self.span)?;

        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }

        Ok(())
    }
}

/// Collects diagnostics and keeps per-severity counts
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic of any severity
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Note => {}
        }
        self.diagnostics.push(diagnostic);
    }

    /// Report an error diagnostic
    pub fn error(&mut self, message: String, span: SourceSpan) {
        self.report(Diagnostic::error(message, span));
    }

    /// Report a warning diagnostic
    pub fn warning(&mut self, message: String, span: SourceSpan) {
        self.report(Diagnostic::warning(message, span));
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match (self.error_count, self.warning_count) {
            (0, 0) => "No errors or warnings".to_string(),
            (0, w) => format!("{} warning{}", w, if w == 1 { "" } else { "s" }),
            (e, 0) => format!("{} error{}", e, if e == 1 { "" } else { "s" }),
            (e, w) => format!(
                "{} error{} and {} warning{}",
                e,
                if e == 1 { "" } else { "s" },
                w,
                if w == 1 { "" } else { "s" }
            ),
        }
    }
}
