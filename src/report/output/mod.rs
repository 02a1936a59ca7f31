//! Report renderers.
//!
//! A [`Report`](crate::report::Report) is rendered either for terminal
//! consumption ([`HumanFormatter`]) or as a structured JSON document
//! ([`JsonFormatter`]) for editor and CI integration.

pub mod human;
pub mod json;

use std::io::Write;

use crate::report::Report;

/// Output format for lint results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for rendering a report to a writer.
pub trait ReportFormatter {
    fn format<W: Write>(&self, report: &Report, writer: &mut W) -> std::io::Result<()>;
}

pub use human::HumanFormatter;
pub use json::JsonFormatter;
