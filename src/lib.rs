//! Viewlint - static analysis for view and tag configuration trees.
//!
//! Viewlint reads exported JSON documents (perspective-style view trees and
//! tag provider exports), checks them against embedded schemas, and runs a
//! set of best-practice validators over components, bindings, embedded
//! scripts, and expression fragments.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and the lint run pipeline
//! - [`error`] - Error types and result aliases
//! - [`expr`] - Expression-language fragment validation
//! - [`model`] - View document model and component tree flattening
//! - [`report`] - Diagnostics: severities, issues, reports, suppression
//! - [`schema`] - Embedded JSON Schema validation
//! - [`script`] - Embedded script validation (indentation, syntax, patterns, imports)
//! - [`style`] - Naming convention checks
//! - [`tag`] - Tag export linting
//! - [`view`] - View tree linting
//!
//! # Example
//!
//! ```
//! use viewlint::{SchemaVariant, ViewLinter};
//!
//! let linter = ViewLinter::new(SchemaVariant::Robust).unwrap();
//! let view = serde_json::json!({
//!     "root": {"type": "ia.container.flex", "meta": {"name": "Main"}}
//! });
//! let issues = linter.lint(&view, "view.json");
//! assert!(issues.iter().all(|i| i.file_path == "view.json"));
//! ```

pub mod cli;
pub mod error;
pub mod expr;
pub mod model;
pub mod report;
pub mod schema;
pub mod script;
pub mod style;
pub mod tag;
pub mod view;

pub use error::{Result, ViewlintError};
pub use report::{Issue, Report, Severity};
pub use report::suppress::SuppressionConfig;
pub use schema::{SchemaValidator, SchemaVariant};
pub use style::{NamingStyle, StyleChecker};
pub use tag::TagLinter;
pub use view::ViewLinter;
