//! Loading parser output and recovering original text

use indoc::indoc;
use pretty_assertions::assert_eq;
use pyplus_frontend::{ExpressionKind, Frontend, SourceNode, StatementKind};

const SCRIPT: &str = indoc! {r#"
    x = 5
    "Hi"
    if x < 3:
        x = 4
"#};

fn span(start: (u32, u32), end: (u32, u32)) -> serde_json::Value {
    serde_json::json!({
        "start": {"filename": "demo.py", "line": start.0, "column": start.1},
        "end": {"filename": "demo.py", "line": end.0, "column": end.1},
    })
}

fn tree() -> String {
    serde_json::json!({
        "filename": "demo.py",
        "body": [
            {
                "kind": {"Assign": {
                    "targets": [{"kind": {"Name": "x"}, "span": span((1, 1), (1, 2))}],
                    "value": {"kind": {"Int": 5}, "span": span((1, 5), (1, 6))}
                }},
                "span": span((1, 1), (1, 6))
            },
            {
                "kind": {"Expression": {"kind": {"Str": "Hi"}, "span": span((2, 1), (2, 5))}},
                "span": span((2, 1), (2, 5))
            },
            {
                "kind": {"If": {
                    "condition": {
                        "kind": {"Compare": {
                            "left": {"kind": {"Name": "x"}, "span": span((3, 4), (3, 5))},
                            "ops": ["Lt"],
                            "comparators": [{"kind": {"Int": 3}, "span": span((3, 8), (3, 9))}]
                        }},
                        "span": span((3, 4), (3, 9))
                    },
                    "body": [{
                        "kind": {"Assign": {
                            "targets": [{"kind": {"Name": "x"}, "span": span((4, 5), (4, 6))}],
                            "value": {"kind": {"Int": 4}, "span": span((4, 9), (4, 10))}
                        }},
                        "span": span((4, 5), (4, 10))
                    }]
                }},
                "span": span((3, 1), (4, 10))
            },
            {"kind": "Pass", "span": span((40, 1), (40, 5))}
        ]
    })
    .to_string()
}

#[test]
fn attach_source_recovers_text_byte_for_byte() {
    let mut module = Frontend::load_json(&tree()).unwrap();
    Frontend::attach_source(&mut module, SCRIPT);

    assert_eq!(module.body[0].text(), "x = 5");
    assert_eq!(module.body[1].text(), "\"Hi\"");
    assert_eq!(module.body[2].text(), "if x < 3:\n    x = 4");

    match &module.body[2].kind {
        StatementKind::If { condition, body, .. } => {
            assert_eq!(condition.text(), "x < 3");
            assert_eq!(body[0].text(), "x = 4");
            match &condition.kind {
                ExpressionKind::Compare { comparators, .. } => {
                    assert_eq!(comparators[0].text(), "3")
                }
                other => panic!("Expected comparison, got {:?}", other),
            }
        }
        other => panic!("Expected if statement, got {:?}", other),
    }
}

#[test]
fn attach_source_leaves_out_of_range_nodes_empty() {
    let mut module = Frontend::load_json(&tree()).unwrap();
    Frontend::attach_source(&mut module, SCRIPT);
    assert_eq!(module.body[3].text(), "");
}

#[test]
fn attach_source_keeps_parser_supplied_text() {
    let mut module = Frontend::load_json(&tree()).unwrap();
    module.body[0].text = "x=5".to_string();
    Frontend::attach_source(&mut module, SCRIPT);
    assert_eq!(module.body[0].text(), "x=5");
}
