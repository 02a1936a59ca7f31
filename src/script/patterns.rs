//! Pattern heuristics for embedded scripts.
//!
//! Each check is regex- or substring-driven and independent of the others.
//! Severities reflect confidence: structural fragility and missing error
//! handling around network calls are warnings, style preferences are info.

use std::sync::LazyLock;

use regex::Regex;

use crate::report::Severity;

use super::Finding;

/// Traversal helpers that couple a script to the component tree's shape.
pub(crate) const TRAVERSAL_FUNCTIONS: [&str; 4] =
    ["getSibling", "getParent", "getChild", "getComponent"];

/// Calls worth wrapping in error handling when no `try:` is present.
const ERROR_PRONE_FUNCTIONS: [&str; 4] = ["getChild", "getSibling", "sendMessage", "closePopup"];

/// `print` followed by something other than an opening parenthesis.
static PRINT_STATEMENT_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bprint\s+[^(]").expect("PRINT_STATEMENT_SYNTAX must compile")
});

/// A call-styled `print` that is not an attribute access like
/// `system.perspective.print(`. Start-of-line or a non-word, non-dot
/// character must precede the keyword.
static PLAIN_PRINT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|[^.\w])print\s*\(").expect("PLAIN_PRINT_CALL must compile")
});

pub(crate) fn check_patterns(script: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if script.contains("localhost") || script.contains("127.0.0.1") {
        findings.push(
            Finding::new(
                Severity::Warning,
                "JYTHON_HARDCODED_LOCALHOST",
                "Hardcoded localhost reference detected.",
            )
            .suggest("Use a configurable gateway URL."),
        );
    }

    if PRINT_STATEMENT_SYNTAX.is_match(script) {
        findings.push(
            Finding::new(
                Severity::Warning,
                "JYTHON_PRINT_STATEMENT",
                "Print statement found - use print() function for Jython compatibility.",
            )
            .suggest("Change 'print x' to 'print(x)'"),
        );
    }

    if PLAIN_PRINT_CALL.is_match(script) {
        findings.push(
            Finding::new(
                Severity::Info,
                "JYTHON_PREFER_PERSPECTIVE_PRINT",
                "Consider using system.perspective.print() for session logging.",
            )
            .suggest("Replace print() with system.perspective.print() for gateway log visibility"),
        );
    }

    let has_try = script.contains("try:");
    let has_except = script.contains("except");

    let makes_http_calls = ["httpClient", "httpPost", "httpGet"]
        .iter()
        .any(|name| script.contains(name));
    if makes_http_calls && (!has_try || !has_except) {
        findings.push(
            Finding::new(
                Severity::Warning,
                "JYTHON_HTTP_WITHOUT_EXCEPTION_HANDLING",
                "HTTP calls should be wrapped in try/except blocks.",
            )
            .suggest("Add error handling around network calls."),
        );
    }

    for func in ERROR_PRONE_FUNCTIONS {
        if script.contains(func) && !has_try {
            findings.push(Finding::new(
                Severity::Info,
                "JYTHON_RECOMMEND_ERROR_HANDLING",
                format!("Consider wrapping {func} usage in error handling."),
            ));
        }
    }

    for func in TRAVERSAL_FUNCTIONS {
        let call = Regex::new(&format!(r"\b{func}\s*\("));
        if call.is_ok_and(|re| re.is_match(script)) {
            findings.push(
                Finding::new(
                    Severity::Warning,
                    "JYTHON_BAD_COMPONENT_REF",
                    format!("Component tree traversal '{func}()' is fragile and breaks on refactoring"),
                )
                .suggest("Use view custom properties or message handlers instead"),
            );
        }
    }

    findings
}
