use colored::*;
use pyplus_common::{Diagnostic, ErrorReporter, Severity};
use pyplus_translate::Translation;

/// Collect the skip records of a translation as warnings
pub fn collect(translation: &Translation) -> ErrorReporter {
    let mut reporter = ErrorReporter::new();
    for record in &translation.diagnostics {
        reporter.report(Diagnostic::from(record));
    }
    reporter
}

pub fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Note => "note".cyan(),
    }
}

/// `script.py:3:1: warning: <reason>` followed by indented notes
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let mut text = format!(
        "{}: {}: {}",
        diagnostic.span.start,
        severity_label(diagnostic.severity),
        diagnostic.message
    );
    for note in &diagnostic.notes {
        text.push_str(&format!("\n  {} {}", "=".dimmed(), note));
    }
    text
}

/// Print every diagnostic of one input and its summary line
pub fn print_report(name: &str, reporter: &ErrorReporter) {
    for diagnostic in reporter.diagnostics() {
        println!("{}", format_diagnostic(diagnostic));
    }

    let summary = reporter.summary();
    let summary = if reporter.has_errors() {
        summary.red()
    } else if reporter.has_warnings() {
        summary.yellow()
    } else {
        summary.green()
    };
    println!("{}: {}", name.bold(), summary);
}
