//! Tree flattener: one walk over a raw view tree.
//!
//! The traversal uses an explicit worklist of `(node, path)` pairs instead of
//! call-stack recursion, so arbitrarily deep trees cannot overflow the stack
//! and the locator path is an ordinary value. Non-object, non-array values at
//! any position are ignored; empty script or expression text never produces a
//! node.

use serde_json::Value;

use super::{
    BindingNode, ExpressionNode, PropertyDef, PropertyKind, ScriptNode, ScriptType, ViewModel,
};

/// Type-tag prefix that marks a tree node as a UI component.
pub const COMPONENT_TYPE_PREFIX: &str = "ia.";

/// Build a flattened [`ViewModel`] from a raw view document.
pub fn flatten_view(view_data: &Value, file_path: &str) -> ViewModel {
    let mut model = ViewModel {
        file_path: file_path.to_string(),
        ..ViewModel::default()
    };

    if let Some(custom) = view_data.get("custom").and_then(Value::as_object) {
        for (name, value) in custom {
            model.properties.push(PropertyDef {
                name: name.clone(),
                kind: PropertyKind::Custom,
                default_value: value.clone(),
            });
        }
    }
    if let Some(params) = view_data.get("params").and_then(Value::as_object) {
        for (name, value) in params {
            model.properties.push(PropertyDef {
                name: name.clone(),
                kind: PropertyKind::Param,
                default_value: value.clone(),
            });
        }
    }

    // View-level propConfig is handled here; the walk starts at `root` so it
    // is never extracted twice.
    if let Some(prop_config) = view_data.get("propConfig").and_then(Value::as_object) {
        extract_from_propconfig(prop_config, "view", &mut model);
    }

    if let Some(root) = view_data.get("root") {
        walk(root, "root", &mut model);
    }

    model
}

/// Collect every recognized component node with its locator path, in
/// document order. Used by per-component validator passes.
pub fn collect_components<'a>(view_data: &'a Value) -> Vec<(&'a Value, String)> {
    let mut components = Vec::new();
    let Some(root) = view_data.get("root") else {
        return components;
    };
    let mut stack: Vec<(&'a Value, String)> = vec![(root, "root".to_string())];

    while let Some((node, path)) = stack.pop() {
        let Some(obj) = node.as_object() else { continue };

        if is_component(node) {
            components.push((node, path.clone()));
        }

        // Push `root` first and children in reverse so document order pops first.
        if let Some(root) = obj.get("root") {
            stack.push((root, format!("{path}.root")));
        }
        if let Some(children) = obj.get("children").and_then(Value::as_array) {
            for (i, child) in children.iter().enumerate().rev() {
                stack.push((child, format!("{path}.children[{i}]")));
            }
        }
    }

    components
}

/// True if the node carries a recognized component type tag.
pub fn is_component(node: &Value) -> bool {
    node.get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| t.starts_with(COMPONENT_TYPE_PREFIX))
}

fn walk(root: &Value, root_path: &str, model: &mut ViewModel) {
    let mut stack: Vec<(&Value, String)> = vec![(root, root_path.to_string())];

    while let Some((node, path)) = stack.pop() {
        let Some(obj) = node.as_object() else { continue };

        if is_component(node) {
            model.component_paths.push(path.clone());
        }

        if let Some(prop_config) = obj.get("propConfig").and_then(Value::as_object) {
            extract_from_propconfig(prop_config, &path, model);
        }

        if let Some(events) = obj.get("events").and_then(Value::as_object) {
            extract_event_scripts(events, &path, model);
        }

        if let Some(inner) = obj.get("root") {
            stack.push((inner, format!("{path}.root")));
        }
        if let Some(children) = obj.get("children").and_then(Value::as_array) {
            for (i, child) in children.iter().enumerate().rev() {
                stack.push((child, format!("{path}.children[{i}]")));
            }
        }
    }
}

fn extract_from_propconfig(
    prop_config: &serde_json::Map<String, Value>,
    component_path: &str,
    model: &mut ViewModel,
) {
    for (prop_name, config) in prop_config {
        let Some(config) = config.as_object() else {
            continue;
        };

        if let Some(on_change) = config.get("onChange").and_then(Value::as_object) {
            if let Some(script) = non_empty_str(on_change.get("script")) {
                model.scripts.push(ScriptNode {
                    content: script.to_string(),
                    location: format!("{component_path}.propConfig.{prop_name}.onChange"),
                    script_type: ScriptType::OnChange,
                    component_path: component_path.to_string(),
                });
            }
        }

        let Some(binding) = config.get("binding").and_then(Value::as_object) else {
            continue;
        };

        let binding_type = binding
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let binding_config = binding.get("config").and_then(Value::as_object);
        let transforms: Vec<Value> = binding
            .get("transforms")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut node = BindingNode {
            prop_path: prop_name.clone(),
            binding_type: binding_type.to_string(),
            expression: None,
            property_path: None,
            tag_path: None,
            transforms: transforms.clone(),
            component_path: component_path.to_string(),
        };

        if let Some(config) = binding_config {
            match binding_type {
                "expr" => {
                    if let Some(expr) = non_empty_str(config.get("expression")) {
                        node.expression = Some(expr.to_string());
                        model.expressions.push(ExpressionNode {
                            content: expr.to_string(),
                            location: format!(
                                "{component_path}.propConfig.{prop_name}.binding.expr"
                            ),
                            component_path: component_path.to_string(),
                        });
                    }
                }
                "expr-struct" => {
                    if let Some(members) = config.get("struct").and_then(Value::as_object) {
                        for (member, expr) in members {
                            if let Some(expr) = expr.as_str().filter(|e| !e.trim().is_empty()) {
                                model.expressions.push(ExpressionNode {
                                    content: expr.to_string(),
                                    location: format!(
                                        "{component_path}.propConfig.{prop_name}.binding.struct.{member}"
                                    ),
                                    component_path: component_path.to_string(),
                                });
                            }
                        }
                    }
                }
                "property" => {
                    node.property_path =
                        config.get("path").and_then(Value::as_str).map(String::from);
                }
                "tag" => {
                    node.tag_path = config
                        .get("tagPath")
                        .and_then(Value::as_str)
                        .map(String::from);
                }
                _ => {}
            }
        }

        model.bindings.push(node);

        for (i, transform) in transforms.iter().enumerate() {
            let Some(transform) = transform.as_object() else {
                continue;
            };
            match transform.get("type").and_then(Value::as_str) {
                Some("script") => {
                    if let Some(code) = non_empty_str(transform.get("code")) {
                        model.scripts.push(ScriptNode {
                            content: code.to_string(),
                            location: format!(
                                "{component_path}.propConfig.{prop_name}.transforms[{i}]"
                            ),
                            script_type: ScriptType::Transform,
                            component_path: component_path.to_string(),
                        });
                    }
                }
                Some("expression") => {
                    if let Some(expr) = non_empty_str(transform.get("expression")) {
                        model.expressions.push(ExpressionNode {
                            content: expr.to_string(),
                            location: format!(
                                "{component_path}.propConfig.{prop_name}.transforms[{i}]"
                            ),
                            component_path: component_path.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
    }
}

fn extract_event_scripts(
    events: &serde_json::Map<String, Value>,
    component_path: &str,
    model: &mut ViewModel,
) {
    for (category, handlers) in events {
        let Some(handlers) = handlers.as_object() else {
            continue;
        };
        for (event_name, handler_config) in handlers {
            // A handler entry is a single object or an array of objects.
            let handler_list: Vec<&Value> = match handler_config {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };
            for (j, handler) in handler_list.iter().enumerate() {
                let Some(handler) = handler.as_object() else {
                    continue;
                };
                if handler.get("type").and_then(Value::as_str) != Some("script") {
                    continue;
                }
                let script = handler
                    .get("config")
                    .and_then(Value::as_object)
                    .and_then(|c| non_empty_str(c.get("script")));
                if let Some(script) = script {
                    model.scripts.push(ScriptNode {
                        content: script.to_string(),
                        location: format!("{component_path}.events.{category}.{event_name}[{j}]"),
                        script_type: ScriptType::Event,
                        component_path: component_path.to_string(),
                    });
                }
            }
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
