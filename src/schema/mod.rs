//! Structural schema validation for tree nodes.
//!
//! Three view schema variants trade off how many real-world type deviations
//! are tolerated (numeric-looking strings in numeric fields, unknown keys).
//! The schema documents are embedded at compile time; validation itself is an
//! optional capability behind the `schema-validation` feature. When the crate
//! is built without it, [`SchemaValidator::available`] reports `false` and the
//! linters downgrade schema checking to a single per-file notice instead of
//! failing the run.

use std::collections::BTreeSet;
use std::str::FromStr;

use include_dir::{include_dir, Dir};
use serde_json::Value;

use crate::error::{Result, ViewlintError};

static SCHEMA_FILES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/src/schema/files");

/// Issue code for a failed node validation.
pub const SCHEMA_VALIDATION: &str = "SCHEMA_VALIDATION";
/// Issue code for the degraded, capability-unavailable path.
pub const SCHEMA_VALIDATION_SKIPPED: &str = "SCHEMA_VALIDATION_SKIPPED";

/// How strictly tree nodes are held to the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVariant {
    /// Exact value kinds, no unknown top-level keys.
    Strict,
    /// Tolerates type deviations seen in real exports.
    #[default]
    Robust,
    /// Only the component type tag is constrained.
    Permissive,
}

impl SchemaVariant {
    fn view_schema_file(self) -> &'static str {
        match self {
            SchemaVariant::Strict => "view-schema-strict.json",
            SchemaVariant::Robust => "view-schema-robust.json",
            SchemaVariant::Permissive => "view-schema-permissive.json",
        }
    }
}

impl FromStr for SchemaVariant {
    type Err = ViewlintError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "strict" => Ok(SchemaVariant::Strict),
            "robust" => Ok(SchemaVariant::Robust),
            "permissive" => Ok(SchemaVariant::Permissive),
            _ => Err(ViewlintError::UnknownSchemaMode { name: value.into() }),
        }
    }
}

/// One constraint violation found in a node.
#[derive(Debug, Clone)]
pub struct SchemaViolation {
    /// Human text from the schema engine.
    pub message: String,
    /// JSON-Pointer-style path to the offending field within the node.
    pub instance_path: String,
}

/// Validates individual tree nodes against an embedded schema document.
pub struct SchemaValidator {
    #[cfg(feature = "schema-validation")]
    compiled: jsonschema::Validator,
}

impl SchemaValidator {
    /// True if the schema-validation capability was compiled in.
    pub const fn available() -> bool {
        cfg!(feature = "schema-validation")
    }

    /// Validator for view component nodes in the given variant.
    pub fn for_views(variant: SchemaVariant) -> Result<Self> {
        Self::from_embedded(variant.view_schema_file())
    }

    /// Validator for tag records (robust variant only).
    pub fn for_tags() -> Result<Self> {
        Self::from_embedded("tag-schema-robust.json")
    }

    fn from_embedded(name: &str) -> Result<Self> {
        let document = load_embedded(name)?;

        #[cfg(feature = "schema-validation")]
        {
            let compiled = jsonschema::options()
                .with_draft(jsonschema::Draft::Draft7)
                .build(&document)
                .map_err(|e| ViewlintError::SchemaError {
                    message: format!("{name}: {e}"),
                })?;
            Ok(Self { compiled })
        }

        #[cfg(not(feature = "schema-validation"))]
        {
            let _ = document;
            Ok(Self {})
        }
    }

    /// Check one node; empty result means the node conforms.
    ///
    /// Always empty when the capability is unavailable — callers decide how
    /// to surface the degradation (one notice per file, never per node).
    #[cfg(feature = "schema-validation")]
    pub fn validate_node(&self, node: &Value) -> Vec<SchemaViolation> {
        self.compiled
            .iter_errors(node)
            .map(|err| SchemaViolation {
                message: err.to_string(),
                instance_path: err.instance_path.to_string(),
            })
            .collect()
    }

    #[cfg(not(feature = "schema-validation"))]
    pub fn validate_node(&self, _node: &Value) -> Vec<SchemaViolation> {
        Vec::new()
    }
}

/// Property names recognized on atomic tags, derived from the tag schema's
/// `atomicTagProps` definition. Falls back to a minimal built-in set if the
/// schema document has an unexpected shape.
pub fn known_atomic_props() -> BTreeSet<String> {
    let fallback = || {
        [
            "name",
            "tagType",
            "dataType",
            "valueSource",
            "value",
            "enabled",
            "documentation",
            "tooltip",
            "tagGroup",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    };

    let Ok(schema) = load_embedded("tag-schema-robust.json") else {
        return fallback();
    };
    let props = schema
        .pointer("/definitions/atomicTagProps/properties")
        .and_then(Value::as_object);
    match props {
        Some(map) if !map.is_empty() => map.keys().cloned().collect(),
        _ => fallback(),
    }
}

fn load_embedded(name: &str) -> Result<Value> {
    let file = SCHEMA_FILES
        .get_file(name)
        .ok_or_else(|| ViewlintError::SchemaError {
            message: format!("embedded schema '{name}' not found"),
        })?;
    serde_json::from_slice(file.contents()).map_err(|e| ViewlintError::SchemaError {
        message: format!("invalid JSON in embedded schema '{name}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn variant_from_str() {
        assert_eq!(
            "robust".parse::<SchemaVariant>().unwrap(),
            SchemaVariant::Robust
        );
        assert_eq!(
            " Strict ".parse::<SchemaVariant>().unwrap(),
            SchemaVariant::Strict
        );
        assert!("lenient".parse::<SchemaVariant>().is_err());
    }

    #[test]
    fn embedded_schemas_parse() {
        for variant in [
            SchemaVariant::Strict,
            SchemaVariant::Robust,
            SchemaVariant::Permissive,
        ] {
            assert!(SchemaValidator::for_views(variant).is_ok());
        }
        assert!(SchemaValidator::for_tags().is_ok());
    }

    #[test]
    fn atomic_props_come_from_schema() {
        let props = known_atomic_props();
        assert!(props.contains("dataType"));
        assert!(props.contains("opcItemPath"));
        assert!(props.contains("historyProvider"));
    }

    #[cfg(feature = "schema-validation")]
    #[test]
    fn valid_component_passes_robust() {
        let validator = SchemaValidator::for_views(SchemaVariant::Robust).unwrap();
        let node = json!({
            "type": "ia.display.label",
            "meta": {"name": "StatusLabel"},
            "props": {"text": "Running"}
        });
        assert!(validator.validate_node(&node).is_empty());
    }

    #[cfg(feature = "schema-validation")]
    #[test]
    fn missing_type_fails_with_pointer_path() {
        let validator = SchemaValidator::for_views(SchemaVariant::Robust).unwrap();
        let node = json!({"meta": {"name": "X"}});
        let violations = validator.validate_node(&node);
        assert!(!violations.is_empty());
    }

    #[cfg(feature = "schema-validation")]
    #[test]
    fn robust_tolerates_numeric_string_where_strict_rejects() {
        let node = json!({
            "type": "ia.display.label",
            "position": {"x": "12"}
        });
        let robust = SchemaValidator::for_views(SchemaVariant::Robust).unwrap();
        assert!(robust.validate_node(&node).is_empty());

        let strict = SchemaValidator::for_views(SchemaVariant::Strict).unwrap();
        let violations = strict.validate_node(&node);
        assert!(!violations.is_empty());
        assert!(violations[0].instance_path.contains("position"));
    }
}
