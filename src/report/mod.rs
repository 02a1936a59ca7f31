//! Diagnostic model: issues, severities, and aggregated reports.
//!
//! Every validator in the engine produces [`Issue`] values; a [`Report`]
//! collects them per document (or, via [`Report::merge`], across documents),
//! applies suppression at insertion time, and keeps a severity summary that
//! always agrees with the retained issue list.
//!
//! # Example
//!
//! ```
//! use viewlint::report::{Issue, Report, Severity};
//!
//! let mut report = Report::new();
//! report.push(Issue::new(Severity::Warning, "MISSING_DATA_TYPE", "no dataType", "tags.json"));
//! assert_eq!(report.summary_count(Severity::Warning), 1);
//! assert!(!report.has_failures(Severity::Error));
//! ```

pub mod output;
pub mod suppress;

pub use suppress::SuppressionConfig;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ViewlintError;

/// Severity of a lint issue, ordered by criticality.
///
/// `Style < Info < Warning < Error`, so `severity >= threshold` answers
/// "does this issue fail the run at the given threshold".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Naming and cosmetic conventions.
    Style,
    /// Informational; heuristics with expected false positives.
    Info,
    /// Should be addressed; likely a real problem.
    Warning,
    /// Definite content violation.
    Error,
}

impl Severity {
    /// All severities from most to least critical.
    pub const ORDERED: [Severity; 4] = [
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Style,
    ];

    /// True if an issue of this severity fails a run with the given threshold.
    pub fn fails_threshold(self, threshold: Severity) -> bool {
        self >= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Style => write!(f, "style"),
        }
    }
}

impl FromStr for Severity {
    type Err = ViewlintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            "style" => Ok(Severity::Style),
            _ => Err(ViewlintError::UnknownSeverity { name: value.into() }),
        }
    }
}

/// A single lint finding.
///
/// `code` values form a stable vocabulary: a new rule must never reuse an
/// existing code with a different meaning.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Free-form hints for downstream tooling, e.g. line-number resolution.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Issue {
    /// Create a new issue.
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            file_path: file_path.into(),
            component_path: None,
            component_type: None,
            line_number: None,
            column: None,
            suggestion: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a component locator path (e.g. `root.children[2]`).
    pub fn with_component_path(mut self, path: impl Into<String>) -> Self {
        self.component_path = Some(path.into());
        self
    }

    /// Attach the component or tag type the issue was found on.
    pub fn with_component_type(mut self, kind: impl Into<String>) -> Self {
        self.component_type = Some(kind.into());
        self
    }

    /// Attach a 1-based line number for embedded-text locations.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line_number = Some(line);
        self
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach a metadata hint.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Ordered collection of issues with a severity summary.
///
/// Suppression is applied when an issue is pushed, never at read time, so the
/// summary and the issue list cannot disagree.
#[derive(Debug, Clone, Default)]
pub struct Report {
    issues: Vec<Issue>,
    summary: BTreeMap<Severity, usize>,
    suppression: Option<SuppressionConfig>,
}

impl Report {
    /// Create an empty report with no suppression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty report that drops suppressed issues on insertion.
    pub fn with_suppression(suppression: SuppressionConfig) -> Self {
        Self {
            suppression: Some(suppression),
            ..Self::default()
        }
    }

    /// Add an issue, unless the active suppression drops it.
    pub fn push(&mut self, issue: Issue) {
        if let Some(ref config) = self.suppression {
            if config.is_suppressed(&issue.code, &issue.file_path) {
                tracing::debug!(code = %issue.code, file = %issue.file_path, "issue suppressed");
                return;
            }
        }
        *self.summary.entry(issue.severity).or_insert(0) += 1;
        self.issues.push(issue);
    }

    /// Add many issues.
    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        for issue in issues {
            self.push(issue);
        }
    }

    /// Fold another report into this one.
    ///
    /// The other report's issues were already filtered by its own suppression,
    /// so they are appended without re-filtering; merge order never changes
    /// the final counts.
    pub fn merge(&mut self, other: Report) {
        for (severity, count) in other.summary {
            *self.summary.entry(severity).or_insert(0) += count;
        }
        self.issues.extend(other.issues);
    }

    /// The retained issues, in insertion order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Count of retained issues at a severity.
    pub fn summary_count(&self, severity: Severity) -> usize {
        self.summary.get(&severity).copied().unwrap_or(0)
    }

    /// Total retained issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// True if no issues were retained.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// True if any retained issue is at or above the threshold.
    pub fn has_failures(&self, threshold: Severity) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity.fails_threshold(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity, code: &str) -> Issue {
        Issue::new(severity, code, "message", "view.json")
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Style < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn severity_fails_threshold() {
        assert!(Severity::Error.fails_threshold(Severity::Warning));
        assert!(Severity::Warning.fails_threshold(Severity::Warning));
        assert!(!Severity::Info.fails_threshold(Severity::Warning));
        assert!(Severity::Style.fails_threshold(Severity::Style));
    }

    #[test]
    fn severity_from_str_rejects_unknown() {
        assert_eq!("Warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" error ".parse::<Severity>().unwrap(), Severity::Error);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn issue_builder_pattern() {
        let issue = Issue::new(Severity::Error, "SCHEMA_VALIDATION", "failed", "view.json")
            .with_component_path("root.children[0]")
            .with_component_type("ia.display.label")
            .with_line(42)
            .with_suggestion("fix it")
            .with_metadata("search_key", "\"name\"");

        assert_eq!(issue.component_path.as_deref(), Some("root.children[0]"));
        assert_eq!(issue.line_number, Some(42));
        assert_eq!(issue.metadata.get("search_key").unwrap(), "\"name\"");
    }

    #[test]
    fn summary_tracks_insertions() {
        let mut report = Report::new();
        report.push(issue(Severity::Error, "A"));
        report.push(issue(Severity::Error, "B"));
        report.push(issue(Severity::Style, "C"));

        assert_eq!(report.summary_count(Severity::Error), 2);
        assert_eq!(report.summary_count(Severity::Style), 1);
        assert_eq!(report.summary_count(Severity::Warning), 0);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn suppression_applied_at_insertion() {
        let config = SuppressionConfig::with_global_codes(["NOISY"]);
        let mut report = Report::with_suppression(config);
        report.push(issue(Severity::Warning, "NOISY"));
        report.push(issue(Severity::Warning, "KEPT"));

        assert_eq!(report.len(), 1);
        assert_eq!(report.issues()[0].code, "KEPT");
        assert_eq!(report.summary_count(Severity::Warning), 1);
    }

    #[test]
    fn merge_accumulates_counts() {
        let mut a = Report::new();
        a.push(issue(Severity::Error, "A"));

        let mut b = Report::new();
        b.push(issue(Severity::Error, "B"));
        b.push(issue(Severity::Info, "C"));

        let mut c = Report::new();
        c.push(issue(Severity::Info, "D"));

        // merge is associative over the issue multiset
        let mut left = a.clone();
        left.merge(b.clone());
        left.merge(c.clone());

        let mut right = b;
        right.merge(c);
        let mut a2 = a;
        a2.merge(right);

        assert_eq!(left.summary_count(Severity::Error), 2);
        assert_eq!(left.summary_count(Severity::Info), 2);
        assert_eq!(
            left.summary_count(Severity::Error),
            a2.summary_count(Severity::Error)
        );
        assert_eq!(left.len(), a2.len());
    }

    #[test]
    fn has_failures_respects_threshold() {
        let mut report = Report::new();
        report.push(issue(Severity::Info, "A"));
        assert!(!report.has_failures(Severity::Error));
        assert!(report.has_failures(Severity::Info));
        assert!(report.has_failures(Severity::Style));
    }
}
