//! CLI argument definitions.
//!
//! All arguments are defined with clap's derive macros; the entry point is
//! the [`Cli`] struct.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::report::Severity;
use crate::schema::SchemaVariant;
use crate::style::NamingStyle;

/// Viewlint - static analysis for view and tag configuration trees.
#[derive(Debug, Parser)]
#[command(name = "viewlint")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// JSON documents to lint (view trees or tag exports)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Document kind; 'auto' detects from the file name and shape
    #[arg(short, long, value_enum, default_value_t = DocumentKind::Auto)]
    pub kind: DocumentKind,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Human)]
    pub format: ReportFormat,

    /// Exit non-zero when issues at or above this severity exist
    #[arg(long, value_parser = parse_severity, default_value = "error")]
    pub fail_on: Severity,

    /// Schema strictness for view component nodes
    #[arg(long, value_parser = parse_schema_variant, default_value = "robust")]
    pub schema_mode: SchemaVariant,

    /// Enable the naming convention pass
    #[arg(long)]
    pub check_naming: bool,

    /// Naming style for component display names
    #[arg(long, value_parser = parse_naming_style, default_value = "PascalCase")]
    pub component_style: NamingStyle,

    /// Naming style for custom/param property names
    #[arg(long, value_parser = parse_naming_style, default_value = "camelCase")]
    pub parameter_style: NamingStyle,

    /// Custom regex for component names (overrides --component-style)
    #[arg(long, value_name = "REGEX")]
    pub component_style_rgx: Option<String>,

    /// Custom regex for parameter names (overrides --parameter-style)
    #[arg(long, value_name = "REGEX")]
    pub parameter_style_rgx: Option<String>,

    /// Allow uppercase acronym runs within names
    #[arg(long)]
    pub allow_acronyms: bool,

    /// Suppression file (default: .viewlintignore.yml if present)
    #[arg(long, value_name = "FILE")]
    pub ignore_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Input document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    View,
    Tag,
    Auto,
}

/// Report rendering format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Human,
    Json,
}

fn parse_severity(value: &str) -> Result<Severity, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_schema_variant(value: &str) -> Result<SchemaVariant, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_naming_style(value: &str) -> Result<NamingStyle, String> {
    value.parse().map_err(|e| format!("{e}"))
}
