//! Integration tests for the tag export linter public API.

use serde_json::{json, Value};
use viewlint::{Issue, Severity, TagLinter};

fn lint(data: &Value) -> Vec<Issue> {
    TagLinter::new().unwrap().lint(data, "tags.json", None)
}

#[test]
fn nested_folders_produce_full_tag_paths() {
    let export = json!({
        "name": "Plant",
        "tagType": "Folder",
        "tags": [
            {
                "name": "Line1",
                "tagType": "Folder",
                "tags": [
                    {"name": "Speed", "tagType": "AtomicTag", "valueSource": "opc"}
                ]
            }
        ]
    });

    let issues = lint(&export);
    let opc = issues
        .iter()
        .find(|i| i.code == "OPC_MISSING_CONFIG")
        .expect("opc tag without server/path should be flagged");
    assert_eq!(
        opc.component_path.as_deref(),
        Some("Plant/tags[0]/Line1/tags[0]/Speed")
    );
}

#[test]
fn array_exports_are_indexed() {
    let export = json!([
        {"name": "Ok", "tagType": "AtomicTag", "dataType": "Int4", "valueSource": "memory"},
        "not a tag"
    ]);

    let issues = lint(&export);
    let invalid = issues
        .iter()
        .find(|i| i.code == "INVALID_TAG_NODE")
        .expect("non-object entry should be rejected");
    assert_eq!(invalid.component_path.as_deref(), Some("[1]"));
    assert_eq!(invalid.severity, Severity::Error);
    assert!(invalid.message.contains("string"));
}

#[test]
fn udt_instance_requires_type_id() {
    let export = json!({"name": "Pump7", "tagType": "UdtInstance"});
    let issues = lint(&export);
    assert!(issues.iter().any(|i| i.code == "MISSING_TYPE_ID"));
}

#[test]
fn expression_tag_without_expression_is_an_error() {
    let export = json!({
        "name": "Derived",
        "tagType": "AtomicTag",
        "dataType": "Float8",
        "valueSource": "expr"
    });
    let issues = lint(&export);
    let missing = issues
        .iter()
        .find(|i| i.code == "EXPR_MISSING_EXPRESSION")
        .expect("expression source needs an expression");
    assert_eq!(missing.severity, Severity::Error);
}

#[test]
fn sibling_issues_stay_isolated() {
    let export = json!({
        "name": "Root",
        "tagType": "Folder",
        "tags": [
            {"name": "Bad", "tagType": "AtomicTag", "valueSource": "opc"},
            {"name": "Good", "tagType": "AtomicTag", "dataType": "Int4",
             "valueSource": "opc", "opcServer": "S", "opcItemPath": "ns=2;s=x"}
        ]
    });

    let issues = lint(&export);
    assert!(!issues
        .iter()
        .any(|i| i.component_path.as_deref() == Some("Root/tags[1]/Good")));
    assert!(issues
        .iter()
        .any(|i| i.component_path.as_deref() == Some("Root/tags[0]/Bad")));
}

#[test]
fn event_scripts_are_validated_in_both_shapes() {
    let map_shape = json!({
        "name": "Alarmed",
        "tagType": "AtomicTag",
        "dataType": "Boolean",
        "valueSource": "memory",
        "eventScripts": {
            "valueChanged": {"eventScript": "\tprint 'changed'"}
        }
    });
    let array_shape = json!({
        "name": "Alarmed",
        "tagType": "AtomicTag",
        "dataType": "Boolean",
        "valueSource": "memory",
        "eventScripts": [
            {"eventid": "valueChanged", "script": "\tprint 'changed'"}
        ]
    });

    for export in [map_shape, array_shape] {
        let issues = lint(&export);
        let script_issue = issues
            .iter()
            .find(|i| i.code == "JYTHON_PRINT_STATEMENT")
            .expect("py2 print should be flagged");
        assert_eq!(
            script_issue.component_path.as_deref(),
            Some("Alarmed.valueChanged")
        );
        assert_eq!(script_issue.file_path, "tags.json");
    }
}

#[test]
fn raw_text_enables_line_numbers() {
    let raw = r#"[
  {
    "name": "Pump1Speed",
    "tagType": "AtomicTag",
    "dataType": "Float8",
    "valueSource": "opc"
  }
]"#;
    let data: Value = serde_json::from_str(raw).unwrap();
    let issues = TagLinter::new().unwrap().lint(&data, "tags.json", Some(raw));

    let opc = issues
        .iter()
        .find(|i| i.code == "OPC_MISSING_CONFIG")
        .expect("opc config issue expected");
    // "valueSource" appears on line 6 of the raw text
    assert_eq!(opc.line_number, Some(6));
}

#[test]
fn without_raw_text_lines_are_absent() {
    let data = json!({
        "name": "Pump1Speed",
        "tagType": "AtomicTag",
        "dataType": "Float8",
        "valueSource": "opc"
    });
    let issues = lint(&data);
    let opc = issues
        .iter()
        .find(|i| i.code == "OPC_MISSING_CONFIG")
        .expect("opc config issue expected");
    assert_eq!(opc.line_number, None);
}
