//! Indentation conventions for embedded script fragments.
//!
//! Event-handler bodies are stored pre-indented: the gateway wraps them in a
//! generated `def`, so every non-blank line must start with at least one tab
//! or four spaces. Standalone `.py` files are exempt since the syntax pass
//! already rejects real indentation errors there.

use crate::report::Severity;

use super::Finding;

pub(crate) fn check_indentation(script: &str, context: &str) -> Vec<Finding> {
    let is_standalone = context.ends_with(".py") || context.contains(".py]");
    if is_standalone {
        return Vec::new();
    }

    let mut non_indented: Vec<usize> = Vec::new();
    let mut mixed_lines: Vec<usize> = Vec::new();
    let mut has_tab_led = false;
    let mut has_space_led = false;
    let mut jumps: Vec<(usize, usize, usize)> = Vec::new();

    let mut previous_depth = 0usize;

    for (index, line) in script.split('\n').enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let tabs = line.len() - line.trim_start_matches('\t').len();
        let after_tabs = &line[tabs..];
        let spaces_after_tabs = after_tabs.len() - after_tabs.trim_start_matches(' ').len();

        if !line.starts_with('\t') && !line.starts_with("    ") {
            non_indented.push(line_number);
        }

        if tabs > 0 {
            if spaces_after_tabs > 0 {
                mixed_lines.push(line_number);
            } else {
                has_tab_led = true;
            }
        } else if spaces_after_tabs > 0 {
            has_space_led = true;
        }

        let depth = tabs + spaces_after_tabs / 4;
        if depth > previous_depth + 1 {
            jumps.push((line_number, depth, previous_depth));
        }
        previous_depth = depth;
    }

    let mut findings = Vec::new();

    if !non_indented.is_empty() {
        let cited: Vec<String> = non_indented.iter().take(5).map(usize::to_string).collect();
        findings.push(
            Finding::new(
                Severity::Error,
                "JYTHON_INDENTATION_REQUIRED",
                format!(
                    "Lines [{}] have no indentation - embedded scripts require at least one tab or 4 spaces",
                    cited.join(", ")
                ),
            )
            .suggest("Indent each line with a tab (recommended) or 4 spaces.")
            .at_line(non_indented[0]),
        );
    }

    for &line_number in mixed_lines.iter().take(3) {
        findings.push(
            Finding::new(
                Severity::Warning,
                "JYTHON_MIXED_INDENTATION",
                format!("Mixed tabs and spaces on line {line_number}"),
            )
            .suggest("Use consistent tabs for indentation.")
            .at_line(line_number),
        );
    }

    if has_tab_led && has_space_led {
        findings.push(
            Finding::new(
                Severity::Info,
                "JYTHON_INCONSISTENT_INDENTATION_STYLE",
                "Mixed indentation styles detected (tabs and spaces).",
            )
            .suggest("Use tabs consistently across the script."),
        );
    }

    for (line_number, depth, previous) in jumps {
        findings.push(
            Finding::new(
                Severity::Error,
                "JYTHON_INDENTATION_JUMP",
                format!("Indentation jumps from {previous} to {depth} levels on line {line_number}."),
            )
            .suggest("Increase indentation by one level per logical block.")
            .at_line(line_number),
        );
    }

    findings
}
