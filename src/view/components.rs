//! Per-component structural and content checks.

use serde_json::Value;

use crate::report::{Issue, Severity};

/// Display names too generic to be useful when debugging a view.
pub const GENERIC_COMPONENT_NAMES: [&str; 5] =
    ["Component", "View", "Container", "Label", "Button"];

/// Component types with known rendering-cost caveats.
const PERFORMANCE_CONCERNS: [(&str, &str); 3] = [
    (
        "ia.display.flex-repeater",
        "Consider performance impact with large datasets",
    ),
    (
        "ia.display.table",
        "Large tables may impact rendering performance",
    ),
    ("ia.chart.xy", "Complex charts with many data points may be slow"),
];

/// Input component types that need discoverable labeling.
const INTERACTIVE_TYPES: [&str; 5] = [
    "ia.input.button",
    "ia.input.dropdown",
    "ia.input.text-field",
    "ia.input.checkbox",
    "ia.input.toggle-switch",
];

const CONTAINER_PREFIX: &str = "ia.container.";
const FLEX_CONTAINER: &str = "ia.container.flex";

fn component_type(component: &Value) -> &str {
    component
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}

/// Naming, performance, and layout checks. Content checks for specific
/// component types live in [`content_checks`] so issue ordering matches the
/// overall best-practice pass.
pub(crate) fn structure_checks(
    component: &Value,
    file_path: &str,
    component_path: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let comp_type = component.get("type").and_then(Value::as_str).unwrap_or("");
    let meta = component.get("meta");

    let make = |severity: Severity, code: &str, message: String| {
        Issue::new(severity, code, message, file_path)
            .with_component_path(component_path)
            .with_component_type(comp_type)
    };

    if meta.and_then(|m| m.get("name")).is_none() {
        issues.push(
            make(
                Severity::Warning,
                "MISSING_META_PROPERTY",
                "Missing required meta property: 'name'".to_string(),
            )
            .with_suggestion("Add 'meta.name' property"),
        );
    }

    let name = meta
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("");
    if name.is_empty() {
        issues.push(
            make(
                Severity::Warning,
                "EMPTY_COMPONENT_NAME",
                "Component has empty or missing name".to_string(),
            )
            .with_suggestion("Provide a descriptive name for debugging and maintenance"),
        );
    } else if GENERIC_COMPONENT_NAMES.contains(&name) {
        issues.push(
            make(
                Severity::Style,
                "GENERIC_COMPONENT_NAME",
                format!("Generic component name '{name}' should be more descriptive"),
            )
            .with_suggestion("Use descriptive names like 'StatusLabel', 'SubmitButton', etc."),
        );
    }

    if let Some((_, concern)) = PERFORMANCE_CONCERNS.iter().find(|(t, _)| *t == comp_type) {
        issues.push(make(
            Severity::Info,
            "PERFORMANCE_CONSIDERATION",
            (*concern).to_string(),
        ));
    }

    let children = component
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    if comp_type.starts_with(CONTAINER_PREFIX) && component.get("children").is_some() {
        for (i, child) in children.iter().enumerate() {
            if child.get("position").is_none() {
                issues.push(
                    Issue::new(
                        Severity::Warning,
                        "MISSING_CHILD_POSITION",
                        format!("Child component at index {i} missing position properties"),
                        file_path,
                    )
                    .with_component_path(format!("{component_path}.children[{i}]"))
                    .with_component_type(component_type(child))
                    .with_suggestion("Add position properties for proper layout"),
                );
            }
        }
    }

    if comp_type == FLEX_CONTAINER {
        if children.len() == 1 {
            issues.push(
                make(
                    Severity::Style,
                    "SINGLE_CHILD_FLEX",
                    "Flex container with single child may be unnecessary".to_string(),
                )
                .with_suggestion("Consider if flex container is needed for single child"),
            );
        }

        let has_direction = component
            .get("props")
            .and_then(|p| p.get("direction"))
            .is_some();
        if !has_direction && children.len() > 1 {
            issues.push(
                make(
                    Severity::Info,
                    "MISSING_FLEX_DIRECTION",
                    "Flex container missing explicit direction property".to_string(),
                )
                .with_suggestion("Add 'props.direction' for explicit layout control"),
            );
        }
    }

    issues
}

/// Required-content checks for labels and icons.
pub(crate) fn content_checks(
    component: &Value,
    file_path: &str,
    component_path: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let comp_type = component.get("type").and_then(Value::as_str).unwrap_or("");

    if comp_type == "ia.display.label" {
        let has_text = component
            .get("props")
            .and_then(|p| p.get("text"))
            .is_some();
        let has_text_binding = component
            .get("propConfig")
            .and_then(|c| c.get("props.text"))
            .is_some();
        if !has_text && !has_text_binding {
            issues.push(
                Issue::new(
                    Severity::Warning,
                    "MISSING_LABEL_TEXT",
                    "Label component missing text content or binding",
                    file_path,
                )
                .with_component_path(component_path)
                .with_component_type(comp_type)
                .with_suggestion("Add 'props.text' or 'propConfig.props.text.binding'"),
            );
        }
    }

    if comp_type == "ia.display.icon" {
        let has_path = component
            .get("props")
            .and_then(|p| p.get("path"))
            .is_some();
        if !has_path {
            issues.push(
                Issue::new(
                    Severity::Error,
                    "MISSING_ICON_PATH",
                    "Icon component missing required path property",
                    file_path,
                )
                .with_component_path(component_path)
                .with_component_type(comp_type)
                .with_suggestion("Add 'props.path' with icon reference"),
            );
        }
    }

    issues
}

/// Interactive components need a text, placeholder, or meaningful name.
pub(crate) fn check_accessibility(
    component: &Value,
    file_path: &str,
    component_path: &str,
) -> Vec<Issue> {
    let comp_type = component.get("type").and_then(Value::as_str).unwrap_or("");
    if !INTERACTIVE_TYPES.contains(&comp_type) {
        return Vec::new();
    }

    let has_text = component
        .get("props")
        .and_then(|p| p.get("text"))
        .is_some();
    let has_placeholder = component
        .get("props")
        .and_then(|p| p.get("placeholder"))
        .is_some();
    let has_name = component
        .get("meta")
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty() && !["Component", "Button", "Input"].contains(&name));

    if has_text || has_placeholder || has_name {
        return Vec::new();
    }

    vec![
        Issue::new(
            Severity::Info,
            "ACCESSIBILITY_LABELING",
            "Interactive component may need better labeling for accessibility",
            file_path,
        )
        .with_component_path(component_path)
        .with_component_type(comp_type)
        .with_suggestion("Add descriptive text, placeholder, or meaningful name"),
    ]
}
