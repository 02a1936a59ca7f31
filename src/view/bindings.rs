//! Binding and transform structure checks, plus extraction of the scripts
//! and expressions they embed.
//!
//! Binding and transform kinds are closed discriminator sets; anything
//! outside them is an Error rather than a silently ignored string.

use serde_json::Value;

use crate::expr::ExpressionValidator;
use crate::report::{Issue, Severity};
use crate::script::ScriptValidator;

/// Recognized `binding.type` discriminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    Property,
    Expr,
    Tag,
    ExprStruct,
    Query,
    TagHistory,
}

impl BindingType {
    pub const ALL: [BindingType; 6] = [
        BindingType::Property,
        BindingType::Expr,
        BindingType::Tag,
        BindingType::ExprStruct,
        BindingType::Query,
        BindingType::TagHistory,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "property" => Some(BindingType::Property),
            "expr" => Some(BindingType::Expr),
            "tag" => Some(BindingType::Tag),
            "expr-struct" => Some(BindingType::ExprStruct),
            "query" => Some(BindingType::Query),
            "tag-history" => Some(BindingType::TagHistory),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindingType::Property => "property",
            BindingType::Expr => "expr",
            BindingType::Tag => "tag",
            BindingType::ExprStruct => "expr-struct",
            BindingType::Query => "query",
            BindingType::TagHistory => "tag-history",
        }
    }
}

/// Recognized `transform.type` discriminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformType {
    Map,
    Script,
    Expression,
    Format,
}

impl TransformType {
    pub const ALL: [TransformType; 4] = [
        TransformType::Map,
        TransformType::Script,
        TransformType::Expression,
        TransformType::Format,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "map" => Some(TransformType::Map),
            "script" => Some(TransformType::Script),
            "expression" => Some(TransformType::Expression),
            "format" => Some(TransformType::Format),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransformType::Map => "map",
            TransformType::Script => "script",
            TransformType::Expression => "expression",
            TransformType::Format => "format",
        }
    }
}

fn binding_type_names() -> String {
    BindingType::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn transform_type_names() -> String {
    TransformType::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Structural checks for every binding under a component's `propConfig`.
pub(crate) fn check_bindings(
    component: &Value,
    file_path: &str,
    component_path: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let comp_type = component
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let Some(prop_config) = component.get("propConfig").and_then(Value::as_object) else {
        return issues;
    };

    for (prop_name, config) in prop_config {
        let Some(binding) = config.get("binding") else {
            continue;
        };

        let declared = binding.get("type").and_then(Value::as_str);
        let binding_config = binding.get("config");
        let binding_path = format!("{component_path}.propConfig.{prop_name}");

        let make = |severity: Severity, code: &str, message: String, path: &str| {
            Issue::new(severity, code, message, file_path)
                .with_component_path(path)
                .with_component_type(comp_type)
        };

        let binding_type = declared.and_then(BindingType::parse);
        if binding_type.is_none() {
            issues.push(
                make(
                    Severity::Error,
                    "INVALID_BINDING_TYPE",
                    format!(
                        "Invalid binding type '{}' for {prop_name}",
                        declared.unwrap_or("none")
                    ),
                    &binding_path,
                )
                .with_suggestion(format!("Use one of: {}", binding_type_names())),
            );
        }

        match binding_type {
            Some(BindingType::Tag) => {
                let has_tag_path = binding_config.and_then(|c| c.get("tagPath")).is_some();
                if !has_tag_path {
                    issues.push(
                        make(
                            Severity::Error,
                            "MISSING_TAG_PATH",
                            format!("Tag binding for {prop_name} missing required 'tagPath'"),
                            &binding_path,
                        )
                        .with_suggestion("Add 'tagPath' property to tag binding config"),
                    );
                }
                let needs_fallback = matches!(prop_name.as_str(), "props.text" | "props.value");
                let has_fallback = binding_config
                    .and_then(|c| c.get("fallbackDelay"))
                    .is_some();
                if needs_fallback && !has_fallback {
                    issues.push(
                        make(
                            Severity::Info,
                            "MISSING_TAG_FALLBACK",
                            format!("Tag binding for {prop_name} should include fallback handling"),
                            &binding_path,
                        )
                        .with_suggestion("Consider adding 'fallbackDelay' for better error handling"),
                    );
                }
            }
            Some(BindingType::Expr) => {
                let has_expression = binding_config
                    .and_then(|c| c.get("expression"))
                    .is_some();
                if !has_expression {
                    issues.push(
                        make(
                            Severity::Error,
                            "MISSING_EXPRESSION",
                            format!("Expression binding for {prop_name} missing required 'expression'"),
                            &binding_path,
                        )
                        .with_suggestion("Add 'expression' property to expression binding config"),
                    );
                }
            }
            Some(BindingType::Property) => {
                let has_path = binding_config.and_then(|c| c.get("path")).is_some();
                if !has_path {
                    issues.push(
                        make(
                            Severity::Error,
                            "MISSING_PROPERTY_PATH",
                            format!("Property binding for {prop_name} missing required 'path'"),
                            &binding_path,
                        )
                        .with_suggestion("Add 'path' property to property binding config"),
                    );
                }
            }
            _ => {}
        }

        let transforms = binding
            .get("transforms")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for (index, transform) in transforms.iter().enumerate() {
            let transform_path = format!("{binding_path}.transforms[{index}]");
            let declared = transform.get("type").and_then(Value::as_str);
            let transform_type = declared.and_then(TransformType::parse);

            if transform_type.is_none() {
                issues.push(
                    make(
                        Severity::Error,
                        "INVALID_TRANSFORM_TYPE",
                        format!(
                            "Invalid transform type '{}' for {prop_name}",
                            declared.unwrap_or("none")
                        ),
                        &transform_path,
                    )
                    .with_suggestion(format!("Use one of: {}", transform_type_names())),
                );
            }

            match transform_type {
                Some(TransformType::Script) => {
                    if transform.get("code").is_none() {
                        issues.push(
                            make(
                                Severity::Error,
                                "MISSING_SCRIPT_CODE",
                                format!("Script transform for {prop_name} missing 'code' property"),
                                &transform_path,
                            )
                            .with_suggestion("Add 'code' property with script body"),
                        );
                    }
                }
                Some(TransformType::Expression) => {
                    if transform.get("expression").is_none() {
                        issues.push(
                            make(
                                Severity::Error,
                                "MISSING_TRANSFORM_EXPRESSION",
                                format!(
                                    "Expression transform for {prop_name} missing 'expression' property"
                                ),
                                &transform_path,
                            )
                            .with_suggestion("Add 'expression' property with transform expression"),
                        );
                    }
                }
                Some(TransformType::Map) => {
                    if transform.get("mappings").is_none() {
                        issues.push(
                            make(
                                Severity::Warning,
                                "MISSING_MAP_MAPPINGS",
                                format!("Map transform for {prop_name} missing 'mappings' array"),
                                &transform_path,
                            )
                            .with_suggestion("Add 'mappings' array with input/output pairs"),
                        );
                    }
                    if transform.get("fallback").is_none() {
                        issues.push(
                            make(
                                Severity::Info,
                                "MISSING_MAP_FALLBACK",
                                format!("Map transform for {prop_name} should include fallback value"),
                                &transform_path,
                            )
                            .with_suggestion("Add 'fallback' property for unmapped values"),
                        );
                    }
                }
                _ => {}
            }
        }
    }

    issues
}

/// Re-point issues produced against an inline fragment at their real
/// document location.
fn retarget(
    issues: Vec<Issue>,
    file_path: &str,
    component_path: String,
    component_type: &str,
) -> Vec<Issue> {
    issues
        .into_iter()
        .map(|mut issue| {
            issue.file_path = file_path.to_string();
            issue.component_path = Some(component_path.clone());
            issue.component_type = Some(component_type.to_string());
            issue
        })
        .collect()
}

/// Script transforms inside a component's bindings.
fn transform_scripts(
    scripts: &ScriptValidator,
    prop_config: &Value,
    file_path: &str,
    component_path: &str,
    component_type: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let Some(prop_config) = prop_config.as_object() else {
        return issues;
    };

    for (prop_name, config) in prop_config {
        let transforms = config
            .get("binding")
            .and_then(|b| b.get("transforms"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for (index, transform) in transforms.iter().enumerate() {
            if transform.get("type").and_then(Value::as_str) != Some("script") {
                continue;
            }
            let Some(code) = transform.get("code").and_then(Value::as_str) else {
                continue;
            };
            if code.trim().is_empty() {
                continue;
            }
            issues.extend(retarget(
                scripts.validate(code, &format!("transform[{index}]")),
                file_path,
                format!("{component_path}.{prop_name}"),
                component_type,
            ));
        }
    }

    issues
}

/// Event handler scripts. Handlers may be a single object or an array.
pub(crate) fn check_event_scripts(
    scripts: &ScriptValidator,
    component: &Value,
    file_path: &str,
    component_path: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let comp_type = component
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let Some(events) = component.get("events").and_then(Value::as_object) else {
        return issues;
    };

    for (category, handlers) in events {
        let Some(handlers) = handlers.as_object() else {
            continue;
        };
        for (event_name, handler_config) in handlers {
            let single = std::slice::from_ref(handler_config);
            let handler_list = handler_config.as_array().map(Vec::as_slice).unwrap_or(single);
            for (j, handler) in handler_list.iter().enumerate() {
                if handler.get("type").and_then(Value::as_str) != Some("script") {
                    continue;
                }
                let Some(code) = handler
                    .get("config")
                    .and_then(|c| c.get("script"))
                    .and_then(Value::as_str)
                else {
                    continue;
                };
                if code.is_empty() {
                    continue;
                }
                issues.extend(retarget(
                    scripts.validate(code, &format!("event.{category}.{event_name}[{j}]")),
                    file_path,
                    format!("{component_path}.events.{category}.{event_name}"),
                    comp_type,
                ));
            }
        }
    }

    issues
}

/// onChange handler scripts under a component's `propConfig`.
pub(crate) fn check_onchange_scripts(
    scripts: &ScriptValidator,
    component: &Value,
    file_path: &str,
    component_path: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let comp_type = component
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let Some(prop_config) = component.get("propConfig").and_then(Value::as_object) else {
        return issues;
    };

    for (prop_name, config) in prop_config {
        let Some(code) = config
            .get("onChange")
            .and_then(|c| c.get("script"))
            .and_then(Value::as_str)
        else {
            continue;
        };
        if code.is_empty() {
            continue;
        }
        issues.extend(retarget(
            scripts.validate(code, &format!("onChange({prop_name})")),
            file_path,
            format!("{component_path}.propConfig.{prop_name}.onChange"),
            comp_type,
        ));
    }

    issues
}

/// Expression bindings, expression-struct members, and expression
/// transforms within a component's `propConfig`.
pub(crate) fn check_expressions(
    expressions: &ExpressionValidator,
    component: &Value,
    file_path: &str,
    component_path: &str,
) -> Vec<Issue> {
    let comp_type = component
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    component
        .get("propConfig")
        .map(|pc| propconfig_expressions(expressions, pc, file_path, component_path, comp_type))
        .unwrap_or_default()
}

/// Expression checks over a bare `propConfig` map. Used both per-component
/// and for the view-level `propConfig` (with `"view"` as the type).
pub(crate) fn propconfig_expressions(
    expressions: &ExpressionValidator,
    prop_config: &Value,
    file_path: &str,
    context_prefix: &str,
    component_type: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let Some(prop_config) = prop_config.as_object() else {
        return issues;
    };

    for (prop_name, config) in prop_config {
        let Some(binding) = config.get("binding").filter(|b| b.is_object()) else {
            continue;
        };
        let binding_type = binding.get("type").and_then(Value::as_str);
        let binding_config = binding.get("config");

        if binding_type == Some("expr") {
            if let Some(expression) = binding_config
                .and_then(|c| c.get("expression"))
                .and_then(Value::as_str)
            {
                if !expression.is_empty() {
                    issues.extend(expressions.validate(
                        expression,
                        file_path,
                        &format!("{context_prefix}.propConfig.{prop_name}"),
                        component_type,
                    ));
                }
            }
        }

        if binding_type == Some("expr-struct") {
            if let Some(members) = binding_config
                .and_then(|c| c.get("struct"))
                .and_then(Value::as_object)
            {
                for (member_name, member_expr) in members {
                    let Some(member_expr) = member_expr.as_str() else {
                        continue;
                    };
                    if member_expr.trim().is_empty() {
                        continue;
                    }
                    issues.extend(expressions.validate(
                        member_expr,
                        file_path,
                        &format!("{context_prefix}.propConfig.{prop_name}.{member_name}"),
                        component_type,
                    ));
                }
            }
        }

        let transforms = binding
            .get("transforms")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for (index, transform) in transforms.iter().enumerate() {
            if transform.get("type").and_then(Value::as_str) != Some("expression") {
                continue;
            }
            let Some(text) = transform.get("expression").and_then(Value::as_str) else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            issues.extend(expressions.validate(
                text,
                file_path,
                &format!("{context_prefix}.propConfig.{prop_name}.transforms[{index}]"),
                component_type,
            ));
        }
    }

    issues
}

/// onChange and script-transform checks over a bare `propConfig` map, for
/// the view-level `propConfig`.
pub(crate) fn propconfig_scripts(
    scripts: &ScriptValidator,
    prop_config: &Value,
    file_path: &str,
    context_prefix: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let Some(map) = prop_config.as_object() else {
        return issues;
    };

    for (prop_name, config) in map {
        let Some(code) = config
            .get("onChange")
            .and_then(|c| c.get("script"))
            .and_then(Value::as_str)
        else {
            continue;
        };
        if code.is_empty() {
            continue;
        }
        issues.extend(retarget(
            scripts.validate(code, &format!("{context_prefix}.onChange({prop_name})")),
            file_path,
            format!("{context_prefix}.propConfig.{prop_name}.onChange"),
            "view",
        ));
    }

    issues.extend(transform_scripts(
        scripts,
        prop_config,
        file_path,
        context_prefix,
        "view",
    ));
    issues
}

/// Script transforms for a single component's bindings.
pub(crate) fn check_transform_scripts(
    scripts: &ScriptValidator,
    component: &Value,
    file_path: &str,
    component_path: &str,
) -> Vec<Issue> {
    let comp_type = component
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    component
        .get("propConfig")
        .map(|pc| transform_scripts(scripts, pc, file_path, component_path, comp_type))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn binding_codes(component: &Value) -> Vec<String> {
        check_bindings(component, "view.json", "root")
            .into_iter()
            .map(|i| i.code)
            .collect()
    }

    #[test]
    fn unknown_binding_type_is_error() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.text": {"binding": {"type": "telepathy"}}
            }
        });
        assert!(binding_codes(&component).contains(&"INVALID_BINDING_TYPE".to_string()));
    }

    #[test]
    fn tag_binding_requires_tag_path() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.text": {"binding": {"type": "tag", "config": {}}}
            }
        });
        let found = binding_codes(&component);
        assert!(found.contains(&"MISSING_TAG_PATH".to_string()));
        assert!(found.contains(&"MISSING_TAG_FALLBACK".to_string()));
    }

    #[test]
    fn tag_fallback_only_for_critical_props() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.style.color": {
                    "binding": {"type": "tag", "config": {"tagPath": "[default]A"}}
                }
            }
        });
        assert!(binding_codes(&component).is_empty());
    }

    #[test]
    fn expr_binding_requires_expression() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.text": {"binding": {"type": "expr", "config": {}}}
            }
        });
        assert!(binding_codes(&component).contains(&"MISSING_EXPRESSION".to_string()));
    }

    #[test]
    fn property_binding_requires_path() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.text": {"binding": {"type": "property", "config": {}}}
            }
        });
        assert!(binding_codes(&component).contains(&"MISSING_PROPERTY_PATH".to_string()));
    }

    #[test]
    fn map_transform_checks_mappings_and_fallback() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.text": {
                    "binding": {
                        "type": "tag",
                        "config": {"tagPath": "[default]A", "fallbackDelay": 2.5},
                        "transforms": [{"type": "map"}]
                    }
                }
            }
        });
        let found = binding_codes(&component);
        assert!(found.contains(&"MISSING_MAP_MAPPINGS".to_string()));
        assert!(found.contains(&"MISSING_MAP_FALLBACK".to_string()));
    }

    #[test]
    fn unknown_transform_type_is_error() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.text": {
                    "binding": {
                        "type": "tag",
                        "config": {"tagPath": "[default]A", "fallbackDelay": 2.5},
                        "transforms": [{"type": "reticulate"}]
                    }
                }
            }
        });
        assert!(binding_codes(&component).contains(&"INVALID_TRANSFORM_TYPE".to_string()));
    }

    #[test]
    fn event_scripts_run_through_script_checks() {
        let component = json!({
            "type": "ia.input.button",
            "events": {
                "dom": {
                    "onClick": {
                        "type": "script",
                        "config": {"script": "\tprint value"}
                    }
                }
            }
        });
        let issues = check_event_scripts(&ScriptValidator::new(), &component, "view.json", "root");
        assert!(issues.iter().any(|i| i.code == "JYTHON_PRINT_STATEMENT"));
        assert!(issues
            .iter()
            .all(|i| i.component_path.as_deref() == Some("root.events.dom.onClick")));
        assert!(issues.iter().all(|i| i.file_path == "view.json"));
    }

    #[test]
    fn event_handler_arrays_are_handled() {
        let component = json!({
            "type": "ia.input.button",
            "events": {
                "dom": {
                    "onClick": [
                        {"type": "script", "config": {"script": "\tx = 1"}},
                        {"type": "script", "config": {"script": "\tprint x"}}
                    ]
                }
            }
        });
        let issues = check_event_scripts(&ScriptValidator::new(), &component, "view.json", "root");
        assert!(issues.iter().any(|i| i.code == "JYTHON_PRINT_STATEMENT"));
    }

    #[test]
    fn onchange_scripts_are_validated() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.text": {
                    "onChange": {"script": "\tprint currentValue.value", "enabled": true}
                }
            }
        });
        let issues =
            check_onchange_scripts(&ScriptValidator::new(), &component, "view.json", "root");
        assert!(issues.iter().any(|i| i.code == "JYTHON_PRINT_STATEMENT"));
        assert_eq!(
            issues[0].component_path.as_deref(),
            Some("root.propConfig.props.text.onChange")
        );
    }

    #[test]
    fn expression_bindings_are_validated() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.text": {
                    "binding": {"type": "expr", "config": {"expression": "now()"}}
                }
            }
        });
        let issues =
            check_expressions(&ExpressionValidator::new(), &component, "view.json", "root");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "EXPR_NOW_DEFAULT_POLLING");
        assert_eq!(
            issues[0].component_path.as_deref(),
            Some("root.propConfig.props.text")
        );
    }

    #[test]
    fn expr_struct_members_are_validated() {
        let component = json!({
            "type": "ia.display.label",
            "propConfig": {
                "props.value": {
                    "binding": {
                        "type": "expr-struct",
                        "config": {"struct": {"time": "now(500)"}}
                    }
                }
            }
        });
        let issues =
            check_expressions(&ExpressionValidator::new(), &component, "view.json", "root");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "EXPR_NOW_LOW_POLLING");
    }
}
