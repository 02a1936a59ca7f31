//! Validation of expression-language fragments.
//!
//! Expressions appear in `expr`-typed bindings, expression structs, and
//! expression transforms. Checks are heuristic: polling-rate hygiene for
//! `now()`, malformed braced property references, unrecognized function
//! names against a curated catalog, and fragile component-tree traversal.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::report::{Issue, Severity};
use crate::script::TRAVERSAL_FUNCTIONS;

/// Polling rates below this many milliseconds are flagged as aggressive.
pub const LOW_POLLING_CUTOFF_MS: u64 = 5000;

/// Catalog of recognized expression-language functions, across all
/// documented categories. Not exhaustive, which is why unrecognized names
/// are only Info.
static KNOWN_EXPRESSION_FUNCTIONS: LazyLock<BTreeSet<&'static str>> = LazyLock::new(|| {
    BTreeSet::from([
        // Math
        "abs", "ceil", "floor", "max", "min", "round", "sqrt", "pow", "log", "mod", "rand",
        "signum",
        // String
        "concat", "endsWith", "indexOf", "left", "len", "lower", "ltrim", "mid", "numberFormat",
        "regexExtract", "repeat", "replace", "reverse", "right", "rtrim", "split", "startsWith",
        "substring", "toStr", "trim", "upper", "urlEncode", "urlDecode", "unicodeNormalize",
        // Date/time
        "dateArith", "dateDiff", "dateExtract", "dateFormat", "dateParse", "daysBetween",
        "hoursBetween", "millisBetween", "minutesBetween", "monthsBetween", "now",
        "secondsBetween", "setTime", "toDate", "weeksBetween", "yearsBetween",
        // Logic
        "if", "switch", "coalesce", "choose", "isNull", "hasChanged", "previousValue", "qualify",
        // Type casting
        "toBool", "toColor", "toDataSet", "toDouble", "toFloat", "toInt", "toLong",
        // Aggregates and datasets
        "avg", "columnCount", "forEach", "getColumn", "hasRows", "lookup", "rowCount", "sum",
        "dataSetToJSON", "jsonToDataSet",
        // Color
        "chooseColor", "colorMix",
        // JSON
        "jsonDecode", "jsonEncode", "jsonMerge", "jsonDelete", "jsonKeys", "jsonSet",
        "jsonLength", "jsonValueByKey",
        // Tag quality
        "hasQuality", "isGood", "isBad", "isUncertain", "isNotGood", "tag", "tagCount",
        // Advanced
        "binEncode", "binDecode", "forceQuality", "getMillis", "htmlToPlain", "isAuthorized",
        "mapLat", "mapLng", "runScript", "typeOf",
    ])
});

static NOW_NO_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnow\s*\(\s*\)").expect("NOW_NO_ARGS must compile"));

static NOW_WITH_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnow\s*\(\s*(\d+)\s*\)").expect("NOW_WITH_RATE must compile"));

static PROPERTY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]*)\}").expect("PROPERTY_REF must compile"));

static CALL_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-zA-Z_]\w*)\s*\(").expect("CALL_IDENT must compile"));

/// Runs all expression checks against a single fragment.
#[derive(Default)]
pub struct ExpressionValidator;

impl ExpressionValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        expression: &str,
        file_path: &str,
        component_path: &str,
        component_type: &str,
    ) -> Vec<Issue> {
        if expression.trim().is_empty() {
            return Vec::new();
        }

        let make = |severity: Severity, code: &str, message: String| {
            Issue::new(severity, code, message, file_path)
                .with_component_path(component_path)
                .with_component_type(component_type)
        };

        let mut issues = Vec::new();

        for _ in NOW_NO_ARGS.find_iter(expression) {
            issues.push(
                make(
                    Severity::Warning,
                    "EXPR_NOW_DEFAULT_POLLING",
                    "now() without arguments defaults to 1000ms polling; specify an explicit rate"
                        .to_string(),
                )
                .with_suggestion("Use now(5000) or now(0) for event-driven updates"),
            );
        }

        for caps in NOW_WITH_RATE.captures_iter(expression) {
            if let Ok(rate) = caps[1].parse::<u64>() {
                if rate > 0 && rate < LOW_POLLING_CUTOFF_MS {
                    issues.push(
                        make(
                            Severity::Info,
                            "EXPR_NOW_LOW_POLLING",
                            format!(
                                "now({rate}) polls at {rate}ms - consider a higher interval for performance"
                            ),
                        )
                        .with_suggestion(format!(
                            "Rates below {LOW_POLLING_CUTOFF_MS}ms can impact client performance"
                        )),
                    );
                }
            }
        }

        for caps in PROPERTY_REF.captures_iter(expression) {
            let reference = caps[1].trim();
            // Tag paths ([Provider]Path) and absolute/relative component
            // paths have their own grammar and may contain spaces.
            if reference.starts_with('[')
                || reference.starts_with('/')
                || reference.starts_with("..")
            {
                continue;
            }
            if reference.contains(' ') {
                issues.push(
                    make(
                        Severity::Error,
                        "EXPR_INVALID_PROPERTY_REF",
                        format!("Property reference '{{{reference}}}' contains spaces"),
                    )
                    .with_suggestion("Remove spaces from property reference path"),
                );
            }
        }

        for name in function_calls(expression) {
            if !KNOWN_EXPRESSION_FUNCTIONS.contains(name) {
                issues.push(
                    make(
                        Severity::Info,
                        "EXPR_UNKNOWN_FUNCTION",
                        format!("Unrecognized expression function '{name}'"),
                    )
                    .with_suggestion("Check the expression function reference for valid names"),
                );
            }
        }

        for func in TRAVERSAL_FUNCTIONS {
            let pattern = Regex::new(&format!(r"\b{func}\s*\("));
            if pattern.is_ok_and(|re| re.is_match(expression)) {
                issues.push(
                    make(
                        Severity::Warning,
                        "EXPR_BAD_COMPONENT_REF",
                        format!("Component tree traversal '{func}()' in expression is fragile"),
                    )
                    .with_suggestion("Use view custom properties or message handlers instead"),
                );
            }
        }

        issues
    }
}

/// Top-level function-call identifiers: a name followed by `(` whose
/// preceding character is not a dot (method calls are skipped).
fn function_calls(expression: &str) -> Vec<&str> {
    CALL_IDENT
        .captures_iter(expression)
        .filter_map(|caps| {
            let m = caps.get(1)?;
            let preceded_by_dot = expression[..m.start()].ends_with('.');
            if preceded_by_dot {
                None
            } else {
                Some(m.as_str())
            }
        })
        .collect()
}
