//! Java-interop import hygiene.
//!
//! Scripts can import from the JVM runtime. Imports are checked against a
//! known-package allow-list: wildcard imports of a known package are
//! discouraged, imports from a Java-shaped but unrecognized package get a
//! low-confidence notice, and explicitly imported names that never reappear
//! in the script body are reported as unused.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::report::Severity;

use super::{dedent, Finding};

/// Packages available in the gateway's embedded JVM. A lightweight subset,
/// just enough to distinguish real packages from typos.
static KNOWN_JAVA_PACKAGES: LazyLock<BTreeSet<&'static str>> = LazyLock::new(|| {
    BTreeSet::from([
        // Java standard library
        "java.lang",
        "java.lang.management",
        "java.util",
        "java.util.concurrent",
        "java.util.concurrent.atomic",
        "java.util.concurrent.locks",
        "java.util.function",
        "java.util.regex",
        "java.util.stream",
        "java.util.zip",
        "java.io",
        "java.net",
        "java.math",
        "java.time",
        "java.time.format",
        "java.time.temporal",
        "java.sql",
        "java.text",
        "java.nio",
        "java.nio.charset",
        "java.nio.channels",
        "java.nio.file",
        "java.security",
        "java.security.cert",
        "java.security.interfaces",
        "java.awt",
        "java.awt.datatransfer",
        "java.awt.event",
        "java.awt.geom",
        "javax.swing",
        "javax.swing.border",
        "javax.swing.table",
        "javax.crypto",
        "javax.imageio",
        "javax.naming.ldap",
        "javax.net.ssl",
        "javax.security.auth.x500",
        "javax.servlet",
        "javax.servlet.http",
        "javax.xml.parsers",
        // Platform SDK
        "com.inductiveautomation.ignition.common",
        "com.inductiveautomation.ignition.common.document",
        "com.inductiveautomation.ignition.common.execution",
        "com.inductiveautomation.ignition.common.execution.impl",
        "com.inductiveautomation.ignition.common.logging",
        "com.inductiveautomation.ignition.common.model",
        "com.inductiveautomation.ignition.common.model.values",
        "com.inductiveautomation.ignition.common.script",
        "com.inductiveautomation.ignition.common.script.builtin",
        "com.inductiveautomation.ignition.common.tags.browsing",
        "com.inductiveautomation.ignition.common.user",
        "com.inductiveautomation.ignition.common.util",
        "com.inductiveautomation.ignition.common.util.logutil",
        "com.inductiveautomation.ignition.gateway",
        "com.inductiveautomation.ignition.gateway.datasource",
        "com.inductiveautomation.ignition.designer",
        "com.inductiveautomation.ignition.client.images",
        "com.inductiveautomation.perspective.common",
        "com.inductiveautomation.perspective.gateway",
        "com.inductiveautomation.factorypmi.application",
        "com.inductiveautomation.factorypmi.application.components.template",
    ])
});

static IMPORT_STAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^from\s+([\w.]+)\s+import\s+\*").expect("IMPORT_STAR must compile")
});

static FROM_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^from\s+([\w.]+)\s+import\s+(.*)").expect("FROM_IMPORT must compile")
});

fn is_known_package(pkg: &str) -> bool {
    KNOWN_JAVA_PACKAGES.contains(pkg)
}

fn looks_like_java_package(pkg: &str) -> bool {
    pkg.starts_with("java.")
        || pkg.starts_with("javax.")
        || pkg.starts_with("com.inductiveautomation.")
}

pub(crate) fn check_java_imports(script: &str) -> Vec<Finding> {
    let dedented = dedent(script);
    let mut findings = Vec::new();
    let mut imported_names: Vec<(String, usize)> = Vec::new();

    for (index, line) in dedented.lines().enumerate() {
        let line_number = index + 1;
        let stripped = line.trim();
        if stripped.starts_with('#') {
            continue;
        }

        if let Some(caps) = IMPORT_STAR.captures(stripped) {
            let pkg = &caps[1];
            if is_known_package(pkg) {
                findings.push(
                    Finding::new(
                        Severity::Warning,
                        "JYTHON_IMPORT_STAR",
                        format!("Wildcard import 'from {pkg} import *' - import specific classes instead"),
                    )
                    .suggest(format!("Replace with explicit imports, e.g. 'from {pkg} import ClassName'"))
                    .at_line(line_number),
                );
            } else if looks_like_java_package(pkg) {
                findings.push(unknown_package(pkg, line_number));
            }
            continue;
        }

        if let Some(caps) = FROM_IMPORT.captures(stripped) {
            let pkg = &caps[1];
            let names = caps[2].trim();
            if is_known_package(pkg) {
                for part in names.split(',') {
                    let part = part.trim();
                    if part.is_empty() {
                        continue;
                    }
                    // Aliased imports are tracked under the alias.
                    let name = match part.split_once(" as ") {
                        Some((_, alias)) => alias.trim(),
                        None => part,
                    };
                    imported_names.push((name.to_string(), line_number));
                }
            } else if looks_like_java_package(pkg) {
                findings.push(unknown_package(pkg, line_number));
            }
        }
    }

    if !imported_names.is_empty() {
        let body: String = dedented
            .lines()
            .filter(|line| {
                let stripped = line.trim();
                !stripped.starts_with("from ") && !stripped.starts_with("import ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        for (name, line_number) in imported_names {
            let used = Regex::new(&format!(r"\b{}\b", regex::escape(&name)))
                .is_ok_and(|re| re.is_match(&body));
            if !used {
                findings.push(
                    Finding::new(
                        Severity::Info,
                        "JYTHON_UNUSED_JAVA_IMPORT",
                        format!("Imported Java class '{name}' is not used in the script"),
                    )
                    .suggest(format!("Remove unused import '{name}'"))
                    .at_line(line_number),
                );
            }
        }
    }

    findings
}

fn unknown_package(pkg: &str, line_number: usize) -> Finding {
    Finding::new(
        Severity::Info,
        "JYTHON_UNKNOWN_JAVA_PACKAGE",
        format!("Unknown Java package '{pkg}' - may be valid but is not recognized"),
    )
    .suggest("Verify the package name is correct")
    .at_line(line_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(script: &str) -> Vec<&'static str> {
        check_java_imports(script).iter().map(|f| f.code).collect()
    }

    #[test]
    fn wildcard_import_of_known_package_warns() {
        let found = check_java_imports("\tfrom java.util import *");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "JYTHON_IMPORT_STAR");
        assert_eq!(found[0].line, Some(1));
    }

    #[test]
    fn unknown_java_shaped_package_is_info() {
        assert!(codes("\tfrom java.utl import ArrayList").contains(&"JYTHON_UNKNOWN_JAVA_PACKAGE"));
        assert!(codes("\tfrom com.inductiveautomation.bogus import Thing")
            .contains(&"JYTHON_UNKNOWN_JAVA_PACKAGE"));
    }

    #[test]
    fn non_java_imports_are_ignored() {
        assert!(codes("\tfrom collections import OrderedDict\n\td = OrderedDict()").is_empty());
    }

    #[test]
    fn used_import_is_clean() {
        let script = "\tfrom java.util import ArrayList\n\titems = ArrayList()";
        assert!(codes(script).is_empty());
    }

    #[test]
    fn unused_import_reports_name_and_line() {
        let script = "\tfrom java.util import ArrayList, HashMap\n\titems = ArrayList()";
        let found = check_java_imports(script);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "JYTHON_UNUSED_JAVA_IMPORT");
        assert!(found[0].message.contains("HashMap"));
        assert_eq!(found[0].line, Some(1));
    }

    #[test]
    fn aliased_import_is_tracked_by_alias() {
        let script = "\tfrom java.lang import Exception as JException\n\traise JException()";
        assert!(codes(script).is_empty());

        let unused = "\tfrom java.lang import Exception as JException\n\tpass";
        assert!(codes(unused).contains(&"JYTHON_UNUSED_JAVA_IMPORT"));
    }

    #[test]
    fn commented_imports_are_skipped() {
        assert!(codes("\t# from java.util import *\n\tx = 1").is_empty());
    }
}
