//! Validation of inline Jython script fragments.
//!
//! Views and tags embed scripts as JSON string values (event handlers,
//! onChange handlers, script transforms, tag event scripts). Validation is
//! four independent passes over the raw text: indentation conventions for
//! embedded fragments, structural syntax via a real Python grammar, pattern
//! heuristics, and Java-interop import hygiene. A failure in one pass never
//! suppresses the others.

mod imports;
mod indent;
mod patterns;
mod syntax;

pub(crate) use patterns::TRAVERSAL_FUNCTIONS;

use crate::report::{Issue, Severity};

/// Placeholder file path for issues raised against embedded fragments; the
/// `component_path` carries the real location inside the document.
pub const INLINE_FILE: &str = "<inline>";

/// A finding from one validation pass, before conversion to [`Issue`].
pub(crate) struct Finding {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub suggestion: Option<String>,
    pub line: Option<usize>,
}

impl Finding {
    pub(crate) fn new(severity: Severity, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            suggestion: None,
            line: None,
        }
    }

    pub(crate) fn suggest(mut self, text: impl Into<String>) -> Self {
        self.suggestion = Some(text.into());
        self
    }

    pub(crate) fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Runs all script checks against a single fragment.
#[derive(Default)]
pub struct ScriptValidator;

impl ScriptValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a script fragment. `context` is the locator of the fragment
    /// within its document (or a file name for standalone scripts) and is
    /// attached to every issue as the component path.
    pub fn validate(&self, script: &str, context: &str) -> Vec<Issue> {
        if script.trim().is_empty() {
            return Vec::new();
        }

        let mut findings = Vec::new();
        findings.extend(indent::check_indentation(script, context));
        findings.extend(syntax::check_syntax(script));
        findings.extend(patterns::check_patterns(script));
        findings.extend(imports::check_java_imports(script));

        findings
            .into_iter()
            .map(|f| {
                let mut issue = Issue::new(f.severity, f.code, f.message, INLINE_FILE)
                    .with_component_path(context);
                if let Some(line) = f.line {
                    issue = issue.with_line(line);
                }
                if let Some(suggestion) = f.suggestion {
                    issue = issue.with_suggestion(suggestion);
                }
                issue
            })
            .collect()
    }
}

/// Remove the longest common leading-whitespace prefix shared by all
/// non-blank lines. Blank lines never contribute to the margin.
pub(crate) fn dedent(source: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => {
                let shared = current
                    .chars()
                    .zip(indent.chars())
                    .take_while(|(a, b)| a == b)
                    .count();
                let byte_len = current
                    .char_indices()
                    .nth(shared)
                    .map_or(current.len(), |(i, _)| i);
                &current[..byte_len]
            }
        });
    }

    let margin = margin.unwrap_or("");
    source
        .lines()
        .map(|line| line.strip_prefix(margin).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}
