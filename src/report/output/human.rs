//! Human-readable report renderer.
//!
//! Groups counts by severity, then prints one block per issue with its code,
//! location, and suggestion.

use std::io::Write;

use console::style;

use super::ReportFormatter;
use crate::report::{Issue, Report, Severity};

/// Renders lint results for terminal display.
pub struct HumanFormatter {
    /// Whether to apply ANSI styling.
    pub use_color: bool,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn icon(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "❌",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
            Severity::Style => "💡",
        }
    }

    fn severity_label(&self, severity: Severity) -> String {
        if !self.use_color {
            return severity.to_string();
        }
        let styled = match severity {
            Severity::Error => style(severity.to_string()).red().bold(),
            Severity::Warning => style(severity.to_string()).yellow(),
            Severity::Info => style(severity.to_string()).cyan(),
            Severity::Style => style(severity.to_string()).magenta(),
        };
        styled.to_string()
    }

    fn write_issue<W: Write>(&self, issue: &Issue, writer: &mut W) -> std::io::Result<()> {
        writeln!(
            writer,
            "{} [{}] {}",
            Self::icon(issue.severity),
            issue.code,
            issue.message
        )?;
        let line_info = issue
            .line_number
            .map(|n| format!(":{n}"))
            .unwrap_or_default();
        writeln!(writer, "   File: {}{}", issue.file_path, line_info)?;
        if let Some(ref path) = issue.component_path {
            writeln!(writer, "   Component: {path}")?;
        }
        if let Some(ref suggestion) = issue.suggestion {
            writeln!(writer, "   Suggestion: {suggestion}")?;
        }
        for (key, value) in &issue.metadata {
            writeln!(writer, "   {key}: {value}")?;
        }
        writeln!(writer)
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(&self, report: &Report, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", "=".repeat(60))?;
        writeln!(writer, "📊 LINT RESULTS")?;
        writeln!(writer, "{}", "=".repeat(60))?;

        if report.is_empty() {
            writeln!(writer, "✅ No issues found")?;
            return Ok(());
        }

        writeln!(writer, "📋 Issues by severity:")?;
        for severity in Severity::ORDERED {
            let count = report.summary_count(severity);
            if count > 0 {
                writeln!(
                    writer,
                    "  {} {}: {}",
                    Self::icon(severity),
                    self.severity_label(severity),
                    count
                )?;
            }
        }
        writeln!(writer)?;

        for issue in report.issues() {
            self.write_issue(issue, writer)?;
        }

        Ok(())
    }
}
