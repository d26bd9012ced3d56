//! Translating parser output end to end

use pretty_assertions::assert_eq;
use pyplus_common::{Diagnostic, ErrorReporter, SourceLocation, SourceSpan, StaticType};
use pyplus_frontend::Frontend;
use pyplus_translate::{
    translate, CppComment, CppExpr, CppStmt, GenericParamPolicy, ParamType, ReasonCode, TargetItem,
    TranslatorConfig,
};
use serde_json::{json, Value};

fn at(line: u32, start: u32, end: u32) -> Value {
    json!({
        "start": {"filename": "sample.py", "line": line, "column": start},
        "end": {"filename": "sample.py", "line": line, "column": end},
    })
}

fn expr(kind: Value, text: &str, line: u32) -> Value {
    json!({"kind": kind, "text": text, "span": at(line, 1, 1 + text.len() as u32)})
}

fn stmt(kind: Value, text: &str, line: u32) -> Value {
    json!({"kind": kind, "text": text, "span": at(line, 1, 1 + text.len() as u32)})
}

/// ```text
/// "Hi"
/// x = 5
/// x = 5.1
/// def abc(a, b=3):
///     return a
/// print(abc(x))
/// ls = [1, 2]
/// ```
fn sample() -> String {
    let x = |line| expr(json!({"Name": "x"}), "x", line);
    json!({
        "filename": "sample.py",
        "body": [
            stmt(json!({"Expression": expr(json!({"Str": "Hi"}), "\"Hi\"", 1)}), "\"Hi\"", 1),
            stmt(json!({"Assign": {
                "targets": [x(2)],
                "value": expr(json!({"Int": 5}), "5", 2)
            }}), "x = 5", 2),
            stmt(json!({"Assign": {
                "targets": [x(3)],
                "value": expr(json!({"Float": 5.1}), "5.1", 3)
            }}), "x = 5.1", 3),
            stmt(json!({"FunctionDef": {
                "name": "abc",
                "parameters": [
                    {"name": "a"},
                    {"name": "b", "default": expr(json!({"Int": 3}), "3", 4)}
                ],
                "body": [stmt(json!({"Return": expr(json!({"Name": "a"}), "a", 5)}), "return a", 5)]
            }}), "def abc(a, b=3):\n    return a", 4),
            stmt(json!({"Expression": expr(json!({"Call": {
                "function": expr(json!({"Name": "print"}), "print", 6),
                "arguments": [expr(json!({"Call": {
                    "function": expr(json!({"Name": "abc"}), "abc", 6),
                    "arguments": [x(6)]
                }}), "abc(x)", 6)]
            }}), "print(abc(x))", 6)}), "print(abc(x))", 6),
            stmt(json!({"Assign": {
                "targets": [expr(json!({"Name": "ls"}), "ls", 7)],
                "value": expr(json!({"List": [
                    expr(json!({"Int": 1}), "1", 7),
                    expr(json!({"Int": 2}), "2", 7)
                ]}), "[1, 2]", 7)
            }}), "ls = [1, 2]", 7)
        ]
    })
    .to_string()
}

#[test]
fn translates_sample_script() {
    let module = Frontend::load_json(&sample()).unwrap();
    let translation = translate(&module, &TranslatorConfig::default());

    let reasons: Vec<ReasonCode> = translation.diagnostics.iter().map(|d| d.reason).collect();
    assert_eq!(
        reasons,
        vec![
            ReasonCode::ValueUnused,
            ReasonCode::TypeNarrowing,
            ReasonCode::NotDirectlyTranslatable,
        ]
    );

    let function = translation.program.functions().next().unwrap();
    assert_eq!(function.name, "abc");
    assert_eq!(function.params[0].param_type, ParamType::Generic("T0".to_string()));
    assert_eq!(function.params[1].default, Some(CppExpr::int(3)));

    assert_eq!(
        translation.program.items[4],
        TargetItem::Statement(CppStmt::Print(vec![CppExpr::call(
            "abc",
            vec![CppExpr::variable("x", StaticType::Integer)],
            function.return_type,
        )]))
    );
}

#[test]
fn skipped_text_is_kept_verbatim_with_location() {
    let module = Frontend::load_json(&sample()).unwrap();
    let translation = translate(&module, &TranslatorConfig::default());

    let narrowing = &translation.diagnostics[1];
    assert_eq!(narrowing.original_text, "x = 5.1");
    assert_eq!(
        narrowing.span,
        SourceSpan::new(
            SourceLocation::new("sample.py", 3, 1),
            SourceLocation::new("sample.py", 3, 8),
        )
    );
    assert_eq!(
        translation.program.items[2],
        TargetItem::Statement(CppStmt::Comment(CppComment::Skipped {
            reason: ReasonCode::TypeNarrowing,
            original: "x = 5.1".to_string(),
        }))
    );
}

#[test]
fn skip_records_feed_the_reporter() {
    let module = Frontend::load_json(&sample()).unwrap();
    let translation = translate(&module, &TranslatorConfig::default());

    let mut reporter = ErrorReporter::new();
    for record in &translation.diagnostics {
        reporter.report(Diagnostic::from(record));
    }
    assert!(!reporter.has_errors());
    assert_eq!(reporter.warning_count(), 3);
    assert_eq!(reporter.summary(), "3 warnings");
}

#[test]
fn generic_skip_policy_from_config_file_contents() {
    let config = TranslatorConfig::from_json(r#"{"generic_params": "skip"}"#).unwrap();
    assert_eq!(config.generic_params, GenericParamPolicy::Skip);

    let module = Frontend::load_json(&sample()).unwrap();
    let translation = translate(&module, &config);

    assert_eq!(translation.program.functions().count(), 0);
    assert!(translation
        .diagnostics
        .iter()
        .any(|d| d.original_text == "print(abc(x))" && d.reason == ReasonCode::CallNotInScope));
}
