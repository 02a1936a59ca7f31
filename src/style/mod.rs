//! Naming convention checks for component and parameter names.
//!
//! Two independently configured namespaces: component display names
//! (`meta.name` values under `root`/`children`) and declared custom/param
//! property names, including nested object keys under those sections. All
//! naming issues are Style severity.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde_json::Value;

use crate::error::{Result, ViewlintError};
use crate::report::{Issue, Severity};

/// Issue code for a component display name that violates the style.
pub const COMPONENT_NAME_STYLE: &str = "COMPONENT_NAME_STYLE";
/// Issue code for a custom/param property key that violates the style.
pub const PARAMETER_NAME_STYLE: &str = "PARAMETER_NAME_STYLE";

/// Recognized naming styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStyle {
    SnakeCase,
    CamelCase,
    PascalCase,
    UpperCase,
    TitleCase,
    Any,
}

impl NamingStyle {
    fn pattern(self, allow_acronyms: bool) -> &'static str {
        match (self, allow_acronyms) {
            (NamingStyle::SnakeCase, false) => r"^[a-z]+(_[a-z]+)*$",
            (NamingStyle::SnakeCase, true) => r"^[a-z]+(_[a-zA-Z]+)*$",
            (NamingStyle::CamelCase, false) => r"^[a-z]+([A-Z][a-z]*)*$",
            (NamingStyle::CamelCase, true) => r"^[a-z]+([A-Z][a-zA-Z]*)*$",
            (NamingStyle::PascalCase, false) => r"^[A-Z][a-z]*([A-Z][a-z]*)*$",
            (NamingStyle::PascalCase, true) => r"^[A-Z][a-zA-Z]*([A-Z][a-zA-Z]*)*$",
            (NamingStyle::UpperCase, _) => r"^[A-Z]+(_[A-Z]+)*$",
            (NamingStyle::TitleCase, false) => r"^[A-Z][a-z]*( [A-Z][a-z]*)*$",
            (NamingStyle::TitleCase, true) => r"^[A-Z][a-zA-Z]*( [A-Z][a-zA-Z]*)*$",
            (NamingStyle::Any, _) => r".*",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            NamingStyle::SnakeCase => "lowercase with underscores (e.g., my_variable)",
            NamingStyle::CamelCase => "starts lowercase, uppercase for word separation (e.g., myVariable)",
            NamingStyle::PascalCase => "starts uppercase, uppercase for word separation (e.g., MyClass)",
            NamingStyle::UpperCase => "all uppercase with underscores (e.g., CONSTANT_VALUE)",
            NamingStyle::TitleCase => "words capitalized with spaces (e.g., My Variable Name)",
            NamingStyle::Any => "any naming style accepted",
        }
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamingStyle::SnakeCase => "snake_case",
            NamingStyle::CamelCase => "camelCase",
            NamingStyle::PascalCase => "PascalCase",
            NamingStyle::UpperCase => "UPPER_CASE",
            NamingStyle::TitleCase => "Title Case",
            NamingStyle::Any => "any",
        };
        f.write_str(name)
    }
}

impl FromStr for NamingStyle {
    type Err = ViewlintError;

    /// Unknown style names are a configuration error, never a silent
    /// fallback to `any`.
    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "snake_case" => Ok(NamingStyle::SnakeCase),
            "camelCase" => Ok(NamingStyle::CamelCase),
            "PascalCase" => Ok(NamingStyle::PascalCase),
            "UPPER_CASE" => Ok(NamingStyle::UpperCase),
            "Title Case" | "title-case" => Ok(NamingStyle::TitleCase),
            "any" => Ok(NamingStyle::Any),
            _ => Err(ViewlintError::UnknownNamingStyle { name: value.into() }),
        }
    }
}

/// Matches names against a named style or a caller-supplied pattern.
pub struct StyleChecker {
    pattern: Regex,
    description: String,
}

impl StyleChecker {
    pub fn new(style: NamingStyle, allow_acronyms: bool) -> Self {
        let pattern = Regex::new(style.pattern(allow_acronyms)).expect("style pattern must compile");
        let mut description = style.describe().to_string();
        if allow_acronyms && style != NamingStyle::Any {
            description.push_str(" (acronyms allowed)");
        }
        Self { pattern, description }
    }

    /// A custom pattern always takes precedence over a named style.
    pub fn with_custom_regex(pattern: &str) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|e| ViewlintError::InvalidNamingPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern: compiled,
            description: format!("Custom regex: {pattern}"),
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

enum WalkMode {
    Structure,
    ComponentNames,
    ParameterNames,
}

/// Walk a document and report naming violations in both namespaces.
pub fn check_naming(
    document: &Value,
    file_path: &str,
    component_checker: &StyleChecker,
    parameter_checker: &StyleChecker,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut stack: Vec<(&Value, String, WalkMode)> =
        vec![(document, String::new(), WalkMode::Structure)];

    while let Some((value, location, mode)) = stack.pop() {
        match mode {
            WalkMode::Structure => match value {
                Value::Object(map) => {
                    let mut pending = Vec::new();
                    for (key, child) in map {
                        let child_location = join(&location, key);
                        let child_mode = match key.as_str() {
                            "root" | "children" => WalkMode::ComponentNames,
                            "custom" | "params" => WalkMode::ParameterNames,
                            _ => WalkMode::Structure,
                        };
                        pending.push((child, child_location, child_mode));
                    }
                    stack.extend(pending.into_iter().rev());
                }
                Value::Array(items) => {
                    for (i, item) in items.iter().enumerate().rev() {
                        stack.push((item, format!("{location}[{i}]"), WalkMode::Structure));
                    }
                }
                _ => {}
            },
            WalkMode::ComponentNames => match value {
                Value::Object(map) => {
                    let mut pending = Vec::new();
                    for (key, child) in map {
                        if key == "name" {
                            if let Some(name) = child.as_str() {
                                if !component_checker.matches(name) {
                                    issues.push(
                                        Issue::new(
                                            Severity::Style,
                                            COMPONENT_NAME_STYLE,
                                            format!(
                                                "Component name '{name}' does not match expected style: {}",
                                                component_checker.description()
                                            ),
                                            file_path,
                                        )
                                        .with_component_path(location.clone()),
                                    );
                                }
                                continue;
                            }
                        }
                        pending.push((child, join(&location, key), WalkMode::ComponentNames));
                    }
                    stack.extend(pending.into_iter().rev());
                }
                Value::Array(items) => {
                    for (i, item) in items.iter().enumerate().rev() {
                        stack.push((item, format!("{location}[{i}]"), WalkMode::ComponentNames));
                    }
                }
                _ => {}
            },
            WalkMode::ParameterNames => match value {
                Value::Object(map) => {
                    let mut pending = Vec::new();
                    for (key, child) in map {
                        if !parameter_checker.matches(key) {
                            issues.push(
                                Issue::new(
                                    Severity::Style,
                                    PARAMETER_NAME_STYLE,
                                    format!(
                                        "Parameter name '{key}' does not match expected style: {}",
                                        parameter_checker.description()
                                    ),
                                    file_path,
                                )
                                .with_component_path(location.clone()),
                            );
                        }
                        if child.is_object() || child.is_array() {
                            pending.push((child, join(&location, key), WalkMode::ParameterNames));
                        }
                    }
                    stack.extend(pending.into_iter().rev());
                }
                Value::Array(items) => {
                    for (i, item) in items.iter().enumerate().rev() {
                        stack.push((item, format!("{location}[{i}]"), WalkMode::ParameterNames));
                    }
                }
                _ => {}
            },
        }
    }

    issues
}

fn join(location: &str, key: &str) -> String {
    if location.is_empty() {
        key.to_string()
    } else {
        format!("{location}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn style_from_str() {
        assert_eq!("PascalCase".parse::<NamingStyle>().unwrap(), NamingStyle::PascalCase);
        assert_eq!("any".parse::<NamingStyle>().unwrap(), NamingStyle::Any);
        assert!("kebab-case".parse::<NamingStyle>().is_err());
    }

    #[test]
    fn snake_case_matching() {
        let checker = StyleChecker::new(NamingStyle::SnakeCase, false);
        assert!(checker.matches("motor_speed"));
        assert!(!checker.matches("motorSpeed"));
        assert!(!checker.matches("motor_HTTP_client"));

        let relaxed = StyleChecker::new(NamingStyle::SnakeCase, true);
        assert!(relaxed.matches("motor_HTTP_client"));
    }

    #[test]
    fn pascal_case_matching() {
        let checker = StyleChecker::new(NamingStyle::PascalCase, false);
        assert!(checker.matches("MotorStatus"));
        assert!(!checker.matches("motorStatus"));
        assert!(!checker.matches("HTTPClient"));

        let relaxed = StyleChecker::new(NamingStyle::PascalCase, true);
        assert!(relaxed.matches("HTTPClient"));
    }

    #[test]
    fn custom_regex_takes_precedence() {
        let checker = StyleChecker::with_custom_regex(r"^mtr_\w+$").unwrap();
        assert!(checker.matches("mtr_speed"));
        assert!(!checker.matches("MotorSpeed"));
        assert!(StyleChecker::with_custom_regex(r"[unclosed").is_err());
    }

    #[test]
    fn component_names_checked_under_root() {
        let doc = json!({
            "root": {
                "meta": {"name": "okName_not_pascal"},
                "children": [
                    {"meta": {"name": "GoodLabel"}}
                ]
            }
        });
        let component = StyleChecker::new(NamingStyle::PascalCase, false);
        let parameter = StyleChecker::new(NamingStyle::CamelCase, false);
        let issues = check_naming(&doc, "view.json", &component, &parameter);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, COMPONENT_NAME_STYLE);
        assert_eq!(issues[0].severity, Severity::Style);
        assert!(issues[0].message.contains("okName_not_pascal"));
    }

    #[test]
    fn parameter_keys_checked_recursively() {
        let doc = json!({
            "custom": {
                "motorSpeed": 0,
                "Bad_Name": {"nestedKey": 1, "Another_Bad": 2}
            }
        });
        let component = StyleChecker::new(NamingStyle::PascalCase, false);
        let parameter = StyleChecker::new(NamingStyle::CamelCase, false);
        let issues = check_naming(&doc, "view.json", &component, &parameter);
        let flagged: Vec<_> = issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(flagged, vec![PARAMETER_NAME_STYLE, PARAMETER_NAME_STYLE]);
    }

    #[test]
    fn any_style_accepts_everything() {
        let doc = json!({
            "root": {"meta": {"name": "whatever goes HERE"}},
            "custom": {"Whatever_Key": 1}
        });
        let any = StyleChecker::new(NamingStyle::Any, false);
        assert!(check_naming(&doc, "view.json", &any, &any).is_empty());
    }
}
