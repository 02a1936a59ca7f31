//! The view linter: schema conformance plus best-practice, accessibility,
//! binding, script, and expression checks over a parsed view tree.

mod bindings;
mod components;
mod unused;

pub use bindings::{BindingType, TransformType};
pub use components::GENERIC_COMPONENT_NAMES;

use serde_json::Value;

use crate::error::Result;
use crate::expr::ExpressionValidator;
use crate::model::collect_components;
use crate::report::{Issue, Severity};
use crate::schema::{SchemaValidator, SchemaVariant};
use crate::script::ScriptValidator;

/// Lints a single parsed view document.
pub struct ViewLinter {
    schema: SchemaValidator,
    scripts: ScriptValidator,
    expressions: ExpressionValidator,
}

impl ViewLinter {
    pub fn new(variant: SchemaVariant) -> Result<Self> {
        Ok(Self {
            schema: SchemaValidator::for_views(variant)?,
            scripts: ScriptValidator::new(),
            expressions: ExpressionValidator::new(),
        })
    }

    /// Run every view check. Issues come back in document order: view-level
    /// propConfig first, then per-component checks, then the unused-property
    /// pass.
    pub fn lint(&self, view_data: &Value, file_path: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        if let Some(prop_config) = view_data.get("propConfig") {
            issues.extend(bindings::propconfig_scripts(
                &self.scripts,
                prop_config,
                file_path,
                "view",
            ));
            issues.extend(bindings::propconfig_expressions(
                &self.expressions,
                prop_config,
                file_path,
                "view",
                "view",
            ));
        }

        let components = collect_components(view_data);
        if components.is_empty() {
            issues.push(
                Issue::new(
                    Severity::Info,
                    "NO_COMPONENTS",
                    "No components found in view",
                    file_path,
                )
                .with_component_path("root")
                .with_component_type("view"),
            );
            return issues;
        }

        let mut schema_skip_reported = false;
        for (component, component_path) in &components {
            issues.extend(self.check_schema(
                component,
                file_path,
                component_path,
                &mut schema_skip_reported,
            ));
            issues.extend(components::structure_checks(component, file_path, component_path));
            issues.extend(bindings::check_bindings(component, file_path, component_path));
            issues.extend(bindings::check_event_scripts(
                &self.scripts,
                component,
                file_path,
                component_path,
            ));
            issues.extend(bindings::check_transform_scripts(
                &self.scripts,
                component,
                file_path,
                component_path,
            ));
            issues.extend(bindings::check_onchange_scripts(
                &self.scripts,
                component,
                file_path,
                component_path,
            ));
            issues.extend(bindings::check_expressions(
                &self.expressions,
                component,
                file_path,
                component_path,
            ));
            issues.extend(components::content_checks(component, file_path, component_path));
            issues.extend(components::check_accessibility(component, file_path, component_path));
        }

        issues.extend(unused::check_unused_properties(view_data, file_path));
        issues
    }

    /// Schema check for one component node. When the capability is compiled
    /// out, a single Warning per file replaces the per-node checks.
    fn check_schema(
        &self,
        component: &Value,
        file_path: &str,
        component_path: &str,
        skip_reported: &mut bool,
    ) -> Vec<Issue> {
        let comp_type = component
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        if !SchemaValidator::available() {
            if *skip_reported {
                return Vec::new();
            }
            *skip_reported = true;
            return vec![
                Issue::new(
                    Severity::Warning,
                    "SCHEMA_VALIDATION_SKIPPED",
                    "Schema validation skipped because schema support was not compiled in.",
                    file_path,
                )
                .with_component_path(component_path)
                .with_component_type(comp_type)
                .with_suggestion("Rebuild with the 'schema-validation' feature enabled."),
            ];
        }

        match self.schema.validate_node(component).into_iter().next() {
            Some(violation) => {
                let mut issue = Issue::new(
                    Severity::Error,
                    "SCHEMA_VALIDATION",
                    format!("Schema validation failed: {}", violation.message),
                    file_path,
                )
                .with_component_path(component_path)
                .with_component_type(comp_type);
                if !violation.instance_path.is_empty() {
                    issue = issue.with_suggestion(format!("Path: {}", violation.instance_path));
                }
                vec![issue]
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lint(view: &Value) -> Vec<Issue> {
        ViewLinter::new(SchemaVariant::Robust)
            .unwrap()
            .lint(view, "view.json")
    }

    fn codes(view: &Value) -> Vec<String> {
        lint(view).into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn empty_view_reports_no_components() {
        let view = json!({"custom": {}, "params": {}, "root": {}});
        assert_eq!(codes(&view), vec!["NO_COMPONENTS"]);
    }

    #[test]
    fn well_formed_view_is_clean() {
        let view = json!({
            "root": {
                "type": "ia.container.flex",
                "meta": {"name": "MainLayout"},
                "props": {"direction": "column"},
                "children": [
                    {
                        "type": "ia.display.label",
                        "meta": {"name": "StatusLabel"},
                        "position": {"basis": "32px"},
                        "props": {"text": "Ready"}
                    },
                    {
                        "type": "ia.input.button",
                        "meta": {"name": "StartButton"},
                        "position": {"basis": "32px"},
                        "props": {"text": "Start"}
                    }
                ]
            }
        });
        let found = codes(&view);
        assert!(found.is_empty(), "unexpected issues: {found:?}");
    }

    #[test]
    fn single_child_flex_scenario() {
        let view = json!({
            "root": {
                "type": "ia.container.flex",
                "meta": {"name": "Wrapper"},
                "children": [
                    {
                        "type": "ia.display.label",
                        "meta": {"name": "OnlyChild"},
                        "position": {"basis": "32px"},
                        "props": {"text": "Alone"}
                    }
                ]
            }
        });
        let found = codes(&view);
        assert!(found.contains(&"SINGLE_CHILD_FLEX".to_string()));
        assert!(!found.contains(&"MISSING_FLEX_DIRECTION".to_string()));
    }

    #[test]
    fn determinism_across_runs() {
        let view = json!({
            "custom": {"unusedOne": 1, "unusedTwo": 2},
            "root": {
                "type": "ia.container.flex",
                "meta": {"name": "Container"},
                "children": [
                    {"type": "ia.display.label", "meta": {"name": "Label"}}
                ]
            }
        });
        let first: Vec<_> = lint(&view).iter().map(|i| format!("{:?}", i)).collect();
        let second: Vec<_> = lint(&view).iter().map(|i| format!("{:?}", i)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn nested_view_roots_are_traversed() {
        let view = json!({
            "root": {
                "type": "ia.container.flex",
                "meta": {"name": "Outer"},
                "props": {"direction": "row"},
                "children": [
                    {
                        "type": "ia.display.view",
                        "meta": {"name": "Embedded"},
                        "position": {"basis": "100px"},
                        "root": {
                            "type": "ia.display.icon",
                            "meta": {"name": "InnerIcon"}
                        }
                    },
                    {
                        "type": "ia.display.label",
                        "meta": {"name": "SideLabel"},
                        "position": {"basis": "32px"},
                        "props": {"text": "x"}
                    }
                ]
            }
        });
        let issues = lint(&view);
        let icon_issue = issues
            .iter()
            .find(|i| i.code == "MISSING_ICON_PATH")
            .expect("inner icon should be reached");
        assert_eq!(
            icon_issue.component_path.as_deref(),
            Some("root.children[0].root")
        );
    }
}
