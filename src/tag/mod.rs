//! The tag linter: structural and best-practice checks over tag/UDT
//! definition trees.
//!
//! A document is either a single tag record or an array of records, each
//! optionally nesting children under `tags[]`. Required fields vary by the
//! `tagType` discriminator. A malformed entry is reported and skipped;
//! its siblings are still fully validated.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::report::{Issue, Severity};
use crate::schema::{known_atomic_props, SchemaValidator};
use crate::script::ScriptValidator;

/// Recognized `tagType` discriminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    AtomicTag,
    UdtType,
    UdtInstance,
    Folder,
    Provider,
}

impl TagType {
    pub const ALL: [TagType; 5] = [
        TagType::AtomicTag,
        TagType::UdtType,
        TagType::UdtInstance,
        TagType::Folder,
        TagType::Provider,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "AtomicTag" => Some(TagType::AtomicTag),
            "UdtType" => Some(TagType::UdtType),
            "UdtInstance" => Some(TagType::UdtInstance),
            "Folder" => Some(TagType::Folder),
            "Provider" => Some(TagType::Provider),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TagType::AtomicTag => "AtomicTag",
            TagType::UdtType => "UdtType",
            TagType::UdtInstance => "UdtInstance",
            TagType::Folder => "Folder",
            TagType::Provider => "Provider",
        }
    }
}

static NAME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""name"\s*:\s*"([^"]*)""#).expect("NAME_LINE must compile"));

static TAG_TYPE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""tagType"\s*:\s*"([^"]*)""#).expect("TAG_TYPE_LINE must compile")
});

/// Longest value preview embedded in an `INVALID_TAG_NODE` message.
const NODE_PREVIEW_LIMIT: usize = 50;

/// Lints a single parsed tag document.
pub struct TagLinter {
    schema: SchemaValidator,
    scripts: ScriptValidator,
    known_atomic_props: BTreeSet<String>,
}

impl TagLinter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            schema: SchemaValidator::for_tags()?,
            scripts: ScriptValidator::new(),
            known_atomic_props: known_atomic_props(),
        })
    }

    /// Run every tag check. When `raw_text` is supplied, issues lacking a
    /// line number are enriched by searching the original document text.
    pub fn lint(&self, data: &Value, file_path: &str, raw_text: Option<&str>) -> Vec<Issue> {
        let mut issues = Vec::new();

        match data.as_array() {
            Some(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    self.validate_node(entry, file_path, &format!("[{i}]"), &mut issues);
                }
            }
            None => self.validate_node(data, file_path, "", &mut issues),
        }

        if let Some(raw_text) = raw_text {
            let line_map = build_line_map(raw_text);
            enrich_line_numbers(&mut issues, &line_map, raw_text);
        }

        issues
    }

    fn validate_node(&self, node: &Value, file_path: &str, tag_path: &str, issues: &mut Vec<Issue>) {
        let Some(record) = node.as_object() else {
            let located = if tag_path.is_empty() { "root" } else { tag_path };
            issues.push(
                Issue::new(
                    Severity::Error,
                    "INVALID_TAG_NODE",
                    format!(
                        "Tag node must be an object, got {}: {}",
                        json_kind(node),
                        preview(node)
                    ),
                    file_path,
                )
                .with_component_path(located)
                .with_component_type("invalid")
                .with_suggestion("Each tag must be a JSON object with 'name', 'tagType', etc."),
            );
            return;
        };

        let tag_name = record.get("name").and_then(Value::as_str).unwrap_or("");
        let current_path = if tag_path.is_empty() {
            tag_name.to_string()
        } else {
            format!("{tag_path}/{tag_name}")
        };

        self.check_schema(node, file_path, &current_path, issues);
        self.check_best_practices(record, file_path, &current_path, issues);
        self.check_event_scripts(record, file_path, &current_path, issues);

        if let Some(children) = record.get("tags").and_then(Value::as_array) {
            for (i, child) in children.iter().enumerate() {
                let child_path = format!("{current_path}/tags[{i}]");
                self.validate_node(child, file_path, &child_path, issues);
            }
        }
    }

    fn check_schema(
        &self,
        node: &Value,
        file_path: &str,
        tag_path: &str,
        issues: &mut Vec<Issue>,
    ) {
        if !SchemaValidator::available() {
            return;
        }
        let Some(violation) = self.schema.validate_node(node).into_iter().next() else {
            return;
        };

        let tag_type = node
            .get("tagType")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let mut issue = Issue::new(
            Severity::Error,
            "SCHEMA_VALIDATION",
            format!("Schema validation failed: {}", violation.message),
            file_path,
        )
        .with_component_path(tag_path)
        .with_component_type(tag_type);

        if !violation.instance_path.is_empty() {
            issue = issue.with_suggestion(format!("Path: {}", violation.instance_path));
            if let Some(prop) = last_named_segment(&violation.instance_path) {
                issue = issue.with_metadata("search_key", format!("\"{prop}\""));
            }
        }
        if let Some(name) = node.get("name").and_then(Value::as_str) {
            if !name.is_empty() {
                issue = issue.with_metadata("tag_name", name);
            }
        }
        issues.push(issue);
    }

    fn check_best_practices(
        &self,
        record: &serde_json::Map<String, Value>,
        file_path: &str,
        tag_path: &str,
        issues: &mut Vec<Issue>,
    ) {
        let tag_type_str = record.get("tagType").and_then(Value::as_str).unwrap_or("");
        let tag_type = TagType::parse(tag_type_str);
        let tag_name = record.get("name").and_then(Value::as_str).unwrap_or("");

        let tagged = |mut issue: Issue| {
            if !tag_name.is_empty() {
                issue = issue.with_metadata("tag_name", tag_name);
            }
            issue
        };

        if !record.contains_key("name") {
            issues.push(tagged(
                Issue::new(
                    Severity::Info,
                    "MISSING_TAG_NAME",
                    "Tag has no 'name' property (may be derived from filename)",
                    file_path,
                )
                .with_component_path(tag_path)
                .with_component_type(if tag_type_str.is_empty() {
                    "unknown"
                } else {
                    tag_type_str
                })
                .with_suggestion("Name may come from the filename in file-per-tag format")
                .with_metadata("search_key", "\"tagType\""),
            ));
        }

        if !tag_type_str.is_empty() && tag_type.is_none() {
            let valid: Vec<&str> = TagType::ALL.iter().map(|t| t.as_str()).collect();
            issues.push(tagged(
                Issue::new(
                    Severity::Error,
                    "INVALID_TAG_TYPE",
                    format!("Invalid tagType: '{tag_type_str}'"),
                    file_path,
                )
                .with_component_path(tag_path)
                .with_component_type(tag_type_str)
                .with_suggestion(format!("Valid values: {}", valid.join(", ")))
                .with_metadata("search_key", "\"tagType\""),
            ));
        }

        if tag_type == Some(TagType::AtomicTag) {
            self.check_atomic_tag(record, file_path, tag_path, tag_name, issues);
        }

        if tag_type == Some(TagType::UdtInstance) && !record.contains_key("typeId") {
            issues.push(tagged(
                Issue::new(
                    Severity::Error,
                    "MISSING_TYPE_ID",
                    "UdtInstance is missing 'typeId'",
                    file_path,
                )
                .with_component_path(tag_path)
                .with_component_type(tag_type_str)
                .with_suggestion("Add 'typeId' pointing to the UDT definition"),
            ));
        }
    }

    fn check_atomic_tag(
        &self,
        record: &serde_json::Map<String, Value>,
        file_path: &str,
        tag_path: &str,
        tag_name: &str,
        issues: &mut Vec<Issue>,
    ) {
        let tagged = |mut issue: Issue| {
            if !tag_name.is_empty() {
                issue = issue.with_metadata("tag_name", tag_name);
            }
            issue
        };
        let make = |severity: Severity, code: &str, message: &str| {
            Issue::new(severity, code, message, file_path)
                .with_component_path(tag_path)
                .with_component_type("AtomicTag")
        };

        if !record.contains_key("dataType") {
            issues.push(tagged(
                make(
                    Severity::Warning,
                    "MISSING_DATA_TYPE",
                    "AtomicTag is missing 'dataType'",
                )
                .with_suggestion("Add 'dataType' (e.g., Int4, Float8, Boolean, String)"),
            ));
        }

        if !record.contains_key("valueSource") {
            issues.push(tagged(make(
                Severity::Info,
                "MISSING_VALUE_SOURCE",
                "AtomicTag has no explicit 'valueSource' (defaults to memory)",
            )));
        }

        let value_source = record
            .get("valueSource")
            .and_then(Value::as_str)
            .unwrap_or("");

        if value_source == "opc" {
            let missing: Vec<&str> = [("opcServer", "'opcServer'"), ("opcItemPath", "'opcItemPath'")]
                .iter()
                .filter(|(key, _)| !record.contains_key(*key))
                .map(|(_, label)| *label)
                .collect();
            if !missing.is_empty() {
                issues.push(tagged(
                    make(
                        Severity::Warning,
                        "OPC_MISSING_CONFIG",
                        &format!("OPC tag is missing {}", missing.join(" and ")),
                    )
                    .with_suggestion("Add 'opcServer' and 'opcItemPath' properties")
                    .with_metadata("search_key", "\"valueSource\""),
                ));
            }
        }

        if value_source == "expr" && !record.contains_key("expression") {
            issues.push(tagged(
                make(
                    Severity::Error,
                    "EXPR_MISSING_EXPRESSION",
                    "Expression tag is missing 'expression' property",
                )
                .with_suggestion("Add an 'expression' property")
                .with_metadata("search_key", "\"valueSource\""),
            ));
        }

        if value_source == "db" && !record.contains_key("query") {
            issues.push(tagged(
                make(
                    Severity::Warning,
                    "DB_MISSING_QUERY",
                    "Database tag is missing 'query' property",
                )
                .with_suggestion("Add a 'query' property")
                .with_metadata("search_key", "\"valueSource\""),
            ));
        }

        let history_enabled = record.get("historyEnabled") == Some(&Value::Bool(true));
        if history_enabled && !record.contains_key("historyProvider") {
            issues.push(tagged(
                make(
                    Severity::Info,
                    "HISTORY_NO_PROVIDER",
                    "History is enabled but no 'historyProvider' is specified",
                )
                .with_suggestion("Add 'historyProvider' to ensure history goes to the correct provider")
                .with_metadata("search_key", "\"historyEnabled\""),
            ));
        }

        for (key, value) in record {
            if self.known_atomic_props.contains(key) {
                continue;
            }
            // Bound values carry a bindType discriminator and are accepted
            // under any property name.
            if value
                .as_object()
                .is_some_and(|map| map.contains_key("bindType"))
            {
                continue;
            }
            issues.push(tagged(
                make(
                    Severity::Style,
                    "UNKNOWN_TAG_PROP",
                    &format!("Unknown property '{key}' on AtomicTag"),
                )
                .with_suggestion("Check for typos or remove if unneeded")
                .with_metadata("search_key", format!("\"{key}\"")),
            ));
        }
    }

    /// Event scripts come in two shapes: a map keyed by event name with
    /// `eventScript` bodies, or an array of records with `eventid`/`script`.
    fn check_event_scripts(
        &self,
        record: &serde_json::Map<String, Value>,
        file_path: &str,
        tag_path: &str,
        issues: &mut Vec<Issue>,
    ) {
        let Some(event_scripts) = record.get("eventScripts") else {
            return;
        };
        let tag_type = record
            .get("tagType")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        match event_scripts {
            Value::Object(events) => {
                for (event_name, event_data) in events {
                    let Some(script) = event_data
                        .get("eventScript")
                        .and_then(Value::as_str)
                    else {
                        continue;
                    };
                    if script.trim().is_empty() {
                        continue;
                    }
                    let context = format!("{tag_path}.eventScripts.{event_name}");
                    issues.extend(self.retarget_script_issues(
                        script,
                        &context,
                        event_name,
                        file_path,
                        tag_path,
                        tag_type,
                    ));
                }
            }
            Value::Array(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    let Some(script) = entry.get("script").and_then(Value::as_str) else {
                        continue;
                    };
                    if script.trim().is_empty() {
                        continue;
                    }
                    let fallback = format!("event[{i}]");
                    let event_id = entry
                        .get("eventid")
                        .and_then(Value::as_str)
                        .unwrap_or(&fallback);
                    let context = format!("{tag_path}.eventScripts[{i}]");
                    issues.extend(self.retarget_script_issues(
                        script,
                        &context,
                        event_id,
                        file_path,
                        tag_path,
                        tag_type,
                    ));
                }
            }
            _ => {}
        }
    }

    fn retarget_script_issues(
        &self,
        script: &str,
        context: &str,
        event_name: &str,
        file_path: &str,
        tag_path: &str,
        tag_type: &str,
    ) -> Vec<Issue> {
        self.scripts
            .validate(script, context)
            .into_iter()
            .map(|mut issue| {
                issue.file_path = file_path.to_string();
                issue.component_path = Some(format!("{tag_path}.{event_name}"));
                issue.component_type = Some(tag_type.to_string());
                issue
            })
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.len() < NODE_PREVIEW_LIMIT {
        rendered
    } else {
        let cut: String = rendered.chars().take(NODE_PREVIEW_LIMIT - 3).collect();
        format!("{cut}...")
    }
}

/// Last non-numeric segment of a JSON-Pointer path, if any.
fn last_named_segment(pointer: &str) -> Option<&str> {
    pointer
        .split('/')
        .filter(|part| !part.is_empty() && part.parse::<usize>().is_err())
        .next_back()
}

/// Map tag names (and tagType placeholders) to 1-based line numbers in the
/// raw document text.
fn build_line_map(raw_text: &str) -> BTreeMap<String, usize> {
    let mut line_map = BTreeMap::new();
    for (index, line) in raw_text.lines().enumerate() {
        let lineno = index + 1;
        if let Some(caps) = NAME_LINE.captures(line) {
            line_map.insert(caps[1].to_string(), lineno);
        } else if let Some(caps) = TAG_TYPE_LINE.captures(line) {
            line_map
                .entry(format!("__tagType__{}__{lineno}", &caps[1]))
                .or_insert(lineno);
        }
    }
    line_map
}

/// Fill in line numbers for issues that lack one, using the `search_key`
/// and `tag_name` metadata hints.
fn enrich_line_numbers(issues: &mut [Issue], line_map: &BTreeMap<String, usize>, raw_text: &str) {
    let raw_lines: Vec<&str> = raw_text.lines().collect();

    for issue in issues.iter_mut() {
        if issue.line_number.is_some() {
            continue;
        }

        let search_key = issue.metadata.get("search_key");
        let tag_name = issue.metadata.get("tag_name");

        if let Some(search_key) = search_key {
            let start_line = tag_name
                .and_then(|name| line_map.get(name))
                .map(|line| line - 1)
                .unwrap_or(0);
            for (offset, line) in raw_lines[start_line..].iter().enumerate() {
                if line.contains(search_key.as_str()) {
                    issue.line_number = Some(start_line + offset + 1);
                    break;
                }
            }
            if issue.line_number.is_some() {
                continue;
            }
        }

        if let Some(line) = tag_name.and_then(|name| line_map.get(name)) {
            issue.line_number = Some(*line);
            continue;
        }

        if let Some(tag_type) = &issue.component_type {
            let prefix = format!("__tagType__{tag_type}__");
            if let Some((_, line)) = line_map.iter().find(|(key, _)| key.starts_with(&prefix)) {
                issue.line_number = Some(*line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lint(data: &Value) -> Vec<Issue> {
        TagLinter::new().unwrap().lint(data, "tags.json", None)
    }

    fn codes(data: &Value) -> Vec<String> {
        lint(data).into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn well_formed_atomic_tag_is_clean() {
        let tag = json!({
            "name": "MotorSpeed",
            "tagType": "AtomicTag",
            "dataType": "Float8",
            "valueSource": "memory",
            "value": 0.0
        });
        let found = codes(&tag);
        assert!(found.is_empty(), "unexpected issues: {found:?}");
    }

    #[test]
    fn missing_data_type_is_one_warning_and_fix_is_idempotent() {
        let without = json!({
            "name": "MotorSpeed",
            "tagType": "AtomicTag",
            "valueSource": "memory"
        });
        let found = codes(&without);
        assert_eq!(
            found.iter().filter(|c| *c == "MISSING_DATA_TYPE").count(),
            1
        );

        let with = json!({
            "name": "MotorSpeed",
            "tagType": "AtomicTag",
            "dataType": "Float8",
            "valueSource": "memory"
        });
        let fixed = codes(&with);
        assert!(!fixed.contains(&"MISSING_DATA_TYPE".to_string()));
        // Other checks are unaffected by the fix.
        assert_eq!(
            found.iter().filter(|c| *c != "MISSING_DATA_TYPE").count(),
            fixed.len()
        );
    }

    #[test]
    fn invalid_tag_type_is_error() {
        let tag = json!({"name": "X", "tagType": "MegaTag"});
        assert!(codes(&tag).contains(&"INVALID_TAG_TYPE".to_string()));
    }

    #[test]
    fn opc_tag_requires_connection_fields() {
        let tag = json!({
            "name": "DriveStatus",
            "tagType": "AtomicTag",
            "dataType": "Int4",
            "valueSource": "opc"
        });
        let issues = lint(&tag);
        let opc = issues
            .iter()
            .find(|i| i.code == "OPC_MISSING_CONFIG")
            .unwrap();
        assert!(opc.message.contains("'opcServer' and 'opcItemPath'"));
    }

    #[test]
    fn expression_tag_requires_expression() {
        let tag = json!({
            "name": "Derived",
            "tagType": "AtomicTag",
            "dataType": "Float8",
            "valueSource": "expr"
        });
        let issues = lint(&tag);
        let missing = issues
            .iter()
            .find(|i| i.code == "EXPR_MISSING_EXPRESSION")
            .unwrap();
        assert_eq!(missing.severity, Severity::Error);
    }

    #[test]
    fn history_without_provider_is_info() {
        let tag = json!({
            "name": "Logged",
            "tagType": "AtomicTag",
            "dataType": "Float8",
            "valueSource": "memory",
            "historyEnabled": true
        });
        assert!(codes(&tag).contains(&"HISTORY_NO_PROVIDER".to_string()));
    }

    #[test]
    fn unknown_property_is_style_but_bound_values_pass() {
        let tag = json!({
            "name": "Odd",
            "tagType": "AtomicTag",
            "dataType": "Int4",
            "valueSource": "memory",
            "engUnitz": "rpm",
            "customBound": {"bindType": "parameter", "binding": "{param}"}
        });
        let issues = lint(&tag);
        let unknown: Vec<_> = issues
            .iter()
            .filter(|i| i.code == "UNKNOWN_TAG_PROP")
            .collect();
        assert_eq!(unknown.len(), 1);
        assert!(unknown[0].message.contains("engUnitz"));
        assert_eq!(unknown[0].severity, Severity::Style);
    }

    #[test]
    fn udt_instance_requires_type_id() {
        let tag = json!({"name": "Pump1", "tagType": "UdtInstance"});
        assert!(codes(&tag).contains(&"MISSING_TYPE_ID".to_string()));
    }

    #[test]
    fn malformed_sibling_does_not_abort_validation() {
        let data = json!([
            "not a tag",
            {"name": "Pump1", "tagType": "UdtInstance"}
        ]);
        let issues = lint(&data);
        let invalid = issues
            .iter()
            .find(|i| i.code == "INVALID_TAG_NODE")
            .unwrap();
        assert_eq!(invalid.component_path.as_deref(), Some("[0]"));
        assert!(invalid.message.contains("string"));
        // The valid sibling was still checked.
        assert!(issues.iter().any(|i| i.code == "MISSING_TYPE_ID"));
    }

    #[test]
    fn long_invalid_node_preview_is_truncated() {
        let data = json!(["9".repeat(120)]);
        let issues = lint(&data);
        let invalid = issues
            .iter()
            .find(|i| i.code == "INVALID_TAG_NODE")
            .unwrap();
        assert!(invalid.message.ends_with("..."));
    }

    #[test]
    fn nested_tags_are_recursed_with_paths() {
        let data = json!({
            "name": "Area1",
            "tagType": "Folder",
            "tags": [
                {"name": "Speed", "tagType": "AtomicTag", "valueSource": "memory"}
            ]
        });
        let issues = lint(&data);
        let missing = issues
            .iter()
            .find(|i| i.code == "MISSING_DATA_TYPE")
            .unwrap();
        assert_eq!(
            missing.component_path.as_deref(),
            Some("Area1/tags[0]/Speed")
        );
    }

    #[test]
    fn dict_format_event_scripts_are_validated() {
        let tag = json!({
            "name": "Motor",
            "tagType": "AtomicTag",
            "dataType": "Int4",
            "valueSource": "memory",
            "eventScripts": {
                "valueChanged": {"eventScript": "\tprint currentValue.value", "enabled": true}
            }
        });
        let issues = lint(&tag);
        let script_issue = issues
            .iter()
            .find(|i| i.code == "JYTHON_PRINT_STATEMENT")
            .unwrap();
        assert_eq!(
            script_issue.component_path.as_deref(),
            Some("Motor.valueChanged")
        );
    }

    #[test]
    fn array_format_event_scripts_are_validated() {
        let tag = json!({
            "name": "Motor",
            "tagType": "AtomicTag",
            "dataType": "Int4",
            "valueSource": "memory",
            "eventScripts": [
                {"eventid": "valueChanged", "script": "\tprint currentValue.value", "enabled": true}
            ]
        });
        let issues = lint(&tag);
        assert!(issues.iter().any(|i| i.code == "JYTHON_PRINT_STATEMENT"));
    }

    #[test]
    fn line_numbers_enriched_from_raw_text() {
        let raw = "[\n  {\n    \"name\": \"MotorSpeed\",\n    \"tagType\": \"AtomicTag\",\n    \"valueSource\": \"memory\"\n  }\n]";
        let data: Value = serde_json::from_str(raw).unwrap();
        let issues = TagLinter::new().unwrap().lint(&data, "tags.json", Some(raw));
        let missing = issues
            .iter()
            .find(|i| i.code == "MISSING_DATA_TYPE")
            .unwrap();
        assert_eq!(missing.line_number, Some(3));
    }
}
