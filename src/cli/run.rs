//! Lint run orchestration: load documents, dispatch to the right linter,
//! aggregate reports, render, and compute the exit code.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::report::output::{HumanFormatter, JsonFormatter, ReportFormatter};
use crate::report::suppress::{SuppressionConfig, IGNORE_FILE_NAME};
use crate::report::{Issue, Report, Severity};
use crate::style::{check_naming, StyleChecker};
use crate::tag::TagLinter;
use crate::view::ViewLinter;

use super::args::{Cli, DocumentKind, ReportFormat};

/// Run the lint invocation. Returns the process exit code.
pub fn run(cli: &Cli) -> Result<u8> {
    let suppression = load_suppression(cli)?;
    let view_linter = ViewLinter::new(cli.schema_mode)?;
    let tag_linter = TagLinter::new()?;
    let naming = if cli.check_naming {
        Some(build_style_checkers(cli)?)
    } else {
        None
    };

    let mut report = Report::with_suppression(suppression.clone());

    for path in &cli.paths {
        let file_report = lint_path(cli, &view_linter, &tag_linter, naming.as_ref(), path, &suppression);
        report.merge(file_report);
    }

    render(cli, &report)?;

    if report.has_failures(cli.fail_on) {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn load_suppression(cli: &Cli) -> Result<SuppressionConfig> {
    if let Some(path) = &cli.ignore_file {
        return SuppressionConfig::from_file(path);
    }
    let default = Path::new(IGNORE_FILE_NAME);
    if default.exists() {
        return SuppressionConfig::from_file(default);
    }
    Ok(SuppressionConfig::new())
}

fn build_style_checkers(cli: &Cli) -> Result<(StyleChecker, StyleChecker)> {
    let component = match &cli.component_style_rgx {
        Some(pattern) => StyleChecker::with_custom_regex(pattern)?,
        None => StyleChecker::new(cli.component_style, cli.allow_acronyms),
    };
    let parameter = match &cli.parameter_style_rgx {
        Some(pattern) => StyleChecker::with_custom_regex(pattern)?,
        None => StyleChecker::new(cli.parameter_style, cli.allow_acronyms),
    };
    Ok((component, parameter))
}

fn lint_path(
    cli: &Cli,
    view_linter: &ViewLinter,
    tag_linter: &TagLinter,
    naming: Option<&(StyleChecker, StyleChecker)>,
    path: &Path,
    suppression: &SuppressionConfig,
) -> Report {
    let file_path = path.display().to_string();
    let mut report = Report::with_suppression(suppression.clone());

    let raw_text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            report.push(
                Issue::new(
                    Severity::Error,
                    "FILE_READ_ERROR",
                    format!("Could not read file: {e}"),
                    &file_path,
                )
                .with_component_path("file"),
            );
            return report;
        }
    };

    let document: Value = match serde_json::from_str(&raw_text) {
        Ok(value) => value,
        Err(e) => {
            report.push(
                Issue::new(
                    Severity::Error,
                    "INVALID_JSON",
                    format!("Invalid JSON format: {e}"),
                    &file_path,
                )
                .with_component_path("file")
                .with_suggestion(format!("Line {}: {}", e.line(), e)),
            );
            return report;
        }
    };

    let kind = resolve_kind(cli.kind, path, &document);
    tracing::debug!(file = %file_path, ?kind, "linting document");

    match kind {
        DocumentKind::Tag => {
            report.extend(tag_linter.lint(&document, &file_path, Some(&raw_text)));
        }
        _ => {
            report.extend(view_linter.lint(&document, &file_path));
            if let Some((component, parameter)) = naming {
                report.extend(check_naming(&document, &file_path, component, parameter));
            }
        }
    }

    report
}

/// Resolve `auto` to a concrete kind: `view.json` files are views, records
/// with tag discriminators are tag exports, anything else is a view.
fn resolve_kind(requested: DocumentKind, path: &Path, document: &Value) -> DocumentKind {
    if requested != DocumentKind::Auto {
        return requested;
    }
    if path.file_name().and_then(|n| n.to_str()) == Some("view.json") {
        return DocumentKind::View;
    }
    let looks_like_tag = |record: &Value| {
        record.get("tagType").is_some()
            || (record.get("tags").is_some() && record.get("root").is_none())
    };
    match document {
        Value::Array(entries) => {
            if entries.iter().any(looks_like_tag) {
                DocumentKind::Tag
            } else {
                DocumentKind::View
            }
        }
        record if looks_like_tag(record) => DocumentKind::Tag,
        _ => DocumentKind::View,
    }
}

fn render(cli: &Cli, report: &Report) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        ReportFormat::Human => {
            HumanFormatter::new(!cli.no_color).format(report, &mut out)?;
        }
        ReportFormat::Json => {
            JsonFormatter::new().format(report, &mut out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auto_detects_tag_exports() {
        let doc = json!([{"name": "A", "tagType": "AtomicTag"}]);
        assert_eq!(
            resolve_kind(DocumentKind::Auto, Path::new("export.json"), &doc),
            DocumentKind::Tag
        );
    }

    #[test]
    fn auto_detects_views_by_file_name() {
        let doc = json!({"root": {"type": "ia.container.flex"}});
        assert_eq!(
            resolve_kind(DocumentKind::Auto, Path::new("Screens/Main/view.json"), &doc),
            DocumentKind::View
        );
    }

    #[test]
    fn explicit_kind_wins_over_detection() {
        let doc = json!([{"name": "A", "tagType": "AtomicTag"}]);
        assert_eq!(
            resolve_kind(DocumentKind::View, Path::new("export.json"), &doc),
            DocumentKind::View
        );
    }

    #[test]
    fn view_with_nested_tags_key_is_not_a_tag_export() {
        let doc = json!({"root": {"type": "ia.container.flex"}, "custom": {}});
        assert_eq!(
            resolve_kind(DocumentKind::Auto, Path::new("main.json"), &doc),
            DocumentKind::View
        );
    }
}
