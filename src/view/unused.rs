//! Unreferenced declared-property detection.
//!
//! A custom or param property counts as referenced if any string in the
//! document contains `view.custom.NAME` / `self.view.custom.NAME` (or the
//! `params` equivalents), or if any `propConfig` key equals `custom.NAME` /
//! `params.NAME`. Params may legitimately be set only by an embedding view,
//! so they are reported at Info rather than Warning.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::report::{Issue, Severity};

pub(crate) fn check_unused_properties(view_data: &Value, file_path: &str) -> Vec<Issue> {
    let custom = view_data.get("custom").and_then(Value::as_object);
    let params = view_data.get("params").and_then(Value::as_object);
    if custom.is_none() && params.is_none() {
        return Vec::new();
    }

    let all_text = collect_strings(view_data).join("\n");
    let propconfig_keys = collect_propconfig_keys(view_data);

    let mut issues = Vec::new();

    if let Some(custom) = custom {
        for prop_name in custom.keys() {
            if is_referenced(prop_name, "custom", &all_text, &propconfig_keys) {
                continue;
            }
            issues.push(
                Issue::new(
                    Severity::Warning,
                    "UNUSED_CUSTOM_PROPERTY",
                    format!("Custom property '{prop_name}' appears unreferenced in this view"),
                    file_path,
                )
                .with_component_path(format!("custom.{prop_name}"))
                .with_component_type("view")
                .with_suggestion("Remove if unused, or verify it's referenced by an embedding view"),
            );
        }
    }

    if let Some(params) = params {
        for prop_name in params.keys() {
            if is_referenced(prop_name, "params", &all_text, &propconfig_keys) {
                continue;
            }
            issues.push(
                Issue::new(
                    Severity::Info,
                    "UNUSED_PARAM_PROPERTY",
                    format!("Param property '{prop_name}' appears unreferenced in this view"),
                    file_path,
                )
                .with_component_path(format!("params.{prop_name}"))
                .with_component_type("view")
                .with_suggestion("Params may be set by embedding views; verify before removing"),
            );
        }
    }

    issues
}

fn is_referenced(
    prop_name: &str,
    namespace: &str,
    all_text: &str,
    propconfig_keys: &BTreeSet<String>,
) -> bool {
    let expr_ref = format!("view.{namespace}.{prop_name}");
    let script_ref = format!("self.view.{namespace}.{prop_name}");
    let binding_target = format!("{namespace}.{prop_name}");
    all_text.contains(&expr_ref)
        || all_text.contains(&script_ref)
        || propconfig_keys.contains(&binding_target)
}

/// All string values in the document, in traversal order.
fn collect_strings(value: &Value) -> Vec<String> {
    let mut strings = Vec::new();
    let mut stack = vec![value];
    while let Some(value) = stack.pop() {
        match value {
            Value::String(s) => strings.push(s.clone()),
            Value::Object(map) => stack.extend(map.values().rev()),
            Value::Array(items) => stack.extend(items.iter().rev()),
            _ => {}
        }
    }
    strings
}

/// Every key appearing in any `propConfig` map anywhere in the document.
fn collect_propconfig_keys(value: &Value) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    let mut stack = vec![value];
    while let Some(value) = stack.pop() {
        match value {
            Value::Object(map) => {
                if let Some(prop_config) = map.get("propConfig").and_then(Value::as_object) {
                    keys.extend(prop_config.keys().cloned());
                }
                stack.extend(map.values());
            }
            Value::Array(items) => stack.extend(items.iter()),
            _ => {}
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codes(view: &Value) -> Vec<String> {
        check_unused_properties(view, "view.json")
            .into_iter()
            .map(|i| i.code)
            .collect()
    }

    #[test]
    fn unreferenced_custom_property_warns() {
        let view = json!({
            "custom": {"motorSpeed": 0},
            "root": {"type": "ia.container.flex"}
        });
        assert_eq!(codes(&view), vec!["UNUSED_CUSTOM_PROPERTY"]);
    }

    #[test]
    fn expression_reference_counts() {
        let view = json!({
            "custom": {"motorSpeed": 0},
            "root": {
                "type": "ia.display.label",
                "propConfig": {
                    "props.text": {
                        "binding": {"type": "expr", "config": {"expression": "{view.custom.motorSpeed} * 2"}}
                    }
                }
            }
        });
        assert!(codes(&view).is_empty());
    }

    #[test]
    fn script_reference_counts() {
        let view = json!({
            "custom": {"motorSpeed": 0},
            "root": {
                "type": "ia.input.button",
                "events": {
                    "dom": {"onClick": {"type": "script", "config": {"script": "\tself.view.custom.motorSpeed = 5"}}}
                }
            }
        });
        assert!(codes(&view).is_empty());
    }

    #[test]
    fn propconfig_key_reference_counts() {
        let view = json!({
            "custom": {"motorSpeed": 0},
            "propConfig": {
                "custom.motorSpeed": {"persistent": true}
            },
            "root": {"type": "ia.container.flex"}
        });
        assert!(codes(&view).is_empty());
    }

    #[test]
    fn params_are_info_not_warning() {
        let view = json!({
            "params": {"batchId": null},
            "root": {"type": "ia.container.flex"}
        });
        let issues = check_unused_properties(&view, "view.json");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "UNUSED_PARAM_PROPERTY");
        assert_eq!(issues[0].severity, Severity::Info);
    }
}
