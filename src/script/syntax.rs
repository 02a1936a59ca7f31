//! Structural syntax checking via a real Python grammar.
//!
//! The scripting dialect predates several modern conveniences, so the
//! fragment is de-indented and run through a small fixed set of textual
//! rewrites (print redirection, bare print statements, comma-style
//! except/raise) before parsing. The rewrites are deliberately narrow; any
//! further legacy-syntax coverage belongs in a new, separately tested rule.

use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::{Node, Parser};

use crate::report::Severity;

use super::{dedent, Finding};

/// `print >>stream, args` becomes `print(args, file=stream)`.
static PRINT_REDIRECT_ARGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*)print[ \t]*>>[ \t]*(\S+)[ \t]*,[ \t]*(.+)$")
        .expect("PRINT_REDIRECT_ARGS must compile")
});

/// `print >>stream` with no arguments becomes `print(file=stream)`.
static PRINT_REDIRECT_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*)print[ \t]*>>[ \t]*(\S+)[ \t]*$")
        .expect("PRINT_REDIRECT_BARE must compile")
});

/// `print args` becomes `print(args)`. Redirects and existing calls are
/// excluded by inspecting the first character after the keyword.
static PRINT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*)print\b[ \t]+([^>(].*)$").expect("PRINT_STATEMENT must compile")
});

/// `except Type, name:` becomes `except Type as name:`.
static EXCEPT_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*except[ \t]+[\w.]+)[ \t]*,[ \t]*(\w+)[ \t]*:")
        .expect("EXCEPT_COMMA must compile")
});

/// `raise Type, value` becomes `raise Type(value)`.
static RAISE_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*raise[ \t]+[\w.]+)[ \t]*,[ \t]*(.+)$").expect("RAISE_COMMA must compile")
});

/// Rewrite legacy dialect constructs into modern syntax so the grammar
/// accepts valid scripts while still rejecting genuine errors.
pub(crate) fn modernize(source: &str) -> String {
    let source = PRINT_REDIRECT_ARGS.replace_all(source, "${1}print(${3}, file=${2})");
    let source = PRINT_REDIRECT_BARE.replace_all(&source, "${1}print(file=${2})");
    let source = PRINT_STATEMENT.replace_all(&source, "${1}print(${2})");
    let source = EXCEPT_COMMA.replace_all(&source, "${1} as ${2}:");
    RAISE_COMMA.replace_all(&source, "${1}(${2})").into_owned()
}

pub(crate) fn check_syntax(script: &str) -> Vec<Finding> {
    let transformed = modernize(&dedent(script));

    let mut parser = Parser::new();
    if parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .is_err()
    {
        return vec![Finding::new(
            Severity::Error,
            "JYTHON_PARSE_ERROR",
            "Could not parse script: grammar unavailable",
        )
        .suggest("Check script for syntax issues.")];
    }

    let Some(tree) = parser.parse(&transformed, None) else {
        return vec![Finding::new(
            Severity::Error,
            "JYTHON_PARSE_ERROR",
            "Could not parse script",
        )
        .suggest("Check script for syntax issues.")];
    };

    match first_error_node(tree.root_node()) {
        Some(node) => {
            let line = node.start_position().row + 1;
            vec![Finding::new(
                Severity::Error,
                "JYTHON_SYNTAX_ERROR",
                format!("Python syntax error near line {line}"),
            )
            .suggest(format!("Fix syntax near line {line}."))
            .at_line(line)]
        }
        None => Vec::new(),
    }
}

/// Depth-first search for the first ERROR or MISSING node, in document order.
fn first_error_node(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    let mut first: Option<Node<'_>> = None;
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let better = match first {
                Some(found) => node.start_byte() < found.start_byte(),
                None => true,
            };
            if better {
                first = Some(node);
            }
            continue;
        }
        if !node.has_error() {
            continue;
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    first
}
