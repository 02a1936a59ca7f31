//! Flattened document models.
//!
//! The tree flattener walks a raw view tree once and produces a [`ViewModel`]:
//! the components encountered, property bindings, embedded script and
//! expression fragments, and declared custom/param properties. Validators
//! consume the model read-only; it never outlives the validation of one
//! document.

mod flatten;

pub use flatten::{collect_components, flatten_view};

use std::collections::BTreeSet;

use serde_json::Value;

/// Namespace a declared view property lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `custom.*` — private to the view.
    Custom,
    /// `params.*` — may be set by an embedding parent.
    Param,
}

/// A custom or param property declared on a view.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    pub default_value: Value,
}

/// A binding extracted from a `propConfig` entry.
///
/// `binding_type` is kept as the raw discriminator string; classification
/// into the closed [`BindingType`](crate::view::BindingType) set happens at
/// the validator boundary so unknown types surface as issues.
#[derive(Debug, Clone)]
pub struct BindingNode {
    pub prop_path: String,
    pub binding_type: String,
    pub expression: Option<String>,
    pub property_path: Option<String>,
    pub tag_path: Option<String>,
    pub transforms: Vec<Value>,
    pub component_path: String,
}

/// Where a script fragment was embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    /// An event handler (`events.<category>.<name>`).
    Event,
    /// A property onChange script.
    OnChange,
    /// A binding transform script.
    Transform,
}

/// A script fragment extracted from a view.
#[derive(Debug, Clone)]
pub struct ScriptNode {
    pub content: String,
    /// Descriptive locator, e.g. `root.events.onClick[0]`.
    pub location: String,
    pub script_type: ScriptType,
    pub component_path: String,
}

/// An expression fragment extracted from a binding or transform.
#[derive(Debug, Clone)]
pub struct ExpressionNode {
    pub content: String,
    pub location: String,
    pub component_path: String,
}

/// Flattened representation of one view document.
#[derive(Debug, Default)]
pub struct ViewModel {
    pub file_path: String,
    pub properties: Vec<PropertyDef>,
    pub bindings: Vec<BindingNode>,
    pub scripts: Vec<ScriptNode>,
    pub expressions: Vec<ExpressionNode>,
    /// Locator paths of recognized components, in document order.
    pub component_paths: Vec<String>,
}

impl ViewModel {
    /// Names of declared `custom.*` properties.
    pub fn custom_property_names(&self) -> BTreeSet<&str> {
        self.properties
            .iter()
            .filter(|p| p.kind == PropertyKind::Custom)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Names of declared `params.*` properties.
    pub fn param_property_names(&self) -> BTreeSet<&str> {
        self.properties
            .iter()
            .filter(|p| p.kind == PropertyKind::Param)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// All extracted script fragment text.
    pub fn all_script_text(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|s| s.content.as_str())
    }

    /// All extracted expression fragment text.
    pub fn all_expression_text(&self) -> impl Iterator<Item = &str> {
        self.expressions.iter().map(|e| e.content.as_str())
    }
}
