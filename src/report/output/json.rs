//! JSON report renderer for tooling integration.

use std::io::Write;

use serde::Serialize;

use super::ReportFormatter;
use crate::report::{Issue, Report, Severity};

/// Renders lint results as a JSON document.
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    issues: &'a [Issue],
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
    styles: usize,
}

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(&self, report: &Report, writer: &mut W) -> std::io::Result<()> {
        let output = JsonOutput {
            issues: report.issues(),
            summary: JsonSummary {
                total: report.len(),
                errors: report.summary_count(Severity::Error),
                warnings: report.summary_count(Severity::Warning),
                infos: report.summary_count(Severity::Info),
                styles: report.summary_count(Severity::Style),
            },
        };

        serde_json::to_writer_pretty(writer, &output).map_err(std::io::Error::other)
    }
}
