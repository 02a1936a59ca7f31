//! Suppression of diagnostics by code, globally or per path pattern.
//!
//! Projects keep a small YAML ignore file next to their sources:
//!
//! ```yaml
//! ignore:
//!   - JYTHON_PREFER_PERSPECTIVE_PRINT
//! paths:
//!   "views/legacy/**":
//!     - UNUSED_CUSTOM_PROPERTY
//! ```
//!
//! Suppression is consulted by [`Report::push`](crate::report::Report::push)
//! at insertion time.

use std::collections::BTreeSet;
use std::path::Path;

use globset::{Glob, GlobMatcher};
use serde::Deserialize;

use crate::error::{Result, ViewlintError};

/// Conventional ignore file name looked up in the working directory.
pub const IGNORE_FILE_NAME: &str = ".viewlintignore.yml";

#[derive(Debug, Deserialize, Default)]
struct IgnoreFile {
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default)]
    paths: std::collections::BTreeMap<String, Vec<String>>,
}

/// A compiled set of suppression rules.
#[derive(Debug, Clone, Default)]
pub struct SuppressionConfig {
    global: BTreeSet<String>,
    scoped: Vec<(GlobMatcher, BTreeSet<String>)>,
}

impl SuppressionConfig {
    /// An empty configuration that suppresses nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration that globally ignores the given codes.
    pub fn with_global_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            global: codes.into_iter().map(Into::into).collect(),
            scoped: Vec::new(),
        }
    }

    /// Add a path-scoped rule: the codes are ignored for files matching the glob.
    pub fn add_path_rule<I, S>(&mut self, pattern: &str, codes: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let matcher = Glob::new(pattern)
            .map_err(|e| ViewlintError::IgnoreFileError {
                path: pattern.into(),
                message: e.to_string(),
            })?
            .compile_matcher();
        self.scoped
            .push((matcher, codes.into_iter().map(Into::into).collect()));
        Ok(())
    }

    /// Load suppression rules from a YAML ignore file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ViewlintError::IgnoreFileError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&text).map_err(|e| ViewlintError::IgnoreFileError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse suppression rules from YAML text.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let parsed: IgnoreFile = serde_yaml::from_str(text)?;

        let mut config = Self::with_global_codes(parsed.ignore);
        for (pattern, codes) in parsed.paths {
            let matcher = Glob::new(&pattern)?.compile_matcher();
            config.scoped.push((matcher, codes.into_iter().collect()));
        }
        Ok(config)
    }

    /// True if the code is ignored globally or for this file path.
    pub fn is_suppressed(&self, code: &str, file_path: &str) -> bool {
        if self.global.contains(code) {
            return true;
        }
        self.scoped
            .iter()
            .any(|(matcher, codes)| codes.contains(code) && matcher.is_match(file_path))
    }

    /// True if no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.scoped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_suppresses_nothing() {
        let config = SuppressionConfig::new();
        assert!(config.is_empty());
        assert!(!config.is_suppressed("ANY_CODE", "views/view.json"));
    }

    #[test]
    fn global_codes_apply_to_every_path() {
        let config = SuppressionConfig::with_global_codes(["NOISY_CODE"]);
        assert!(config.is_suppressed("NOISY_CODE", "a/view.json"));
        assert!(config.is_suppressed("NOISY_CODE", "b/tags.json"));
        assert!(!config.is_suppressed("OTHER", "a/view.json"));
    }

    #[test]
    fn scoped_codes_require_matching_path() {
        let mut config = SuppressionConfig::new();
        config
            .add_path_rule("views/legacy/**", ["OLD_CODE"])
            .unwrap();

        assert!(config.is_suppressed("OLD_CODE", "views/legacy/pump/view.json"));
        assert!(!config.is_suppressed("OLD_CODE", "views/new/view.json"));
        assert!(!config.is_suppressed("OTHER", "views/legacy/pump/view.json"));
    }

    #[test]
    fn parses_yaml_ignore_file() {
        let config = SuppressionConfig::from_yaml(
            r#"
ignore:
  - JYTHON_PREFER_PERSPECTIVE_PRINT
paths:
  "views/legacy/**":
    - UNUSED_CUSTOM_PROPERTY
"#,
        )
        .unwrap();

        assert!(config.is_suppressed("JYTHON_PREFER_PERSPECTIVE_PRINT", "anywhere.json"));
        assert!(config.is_suppressed("UNUSED_CUSTOM_PROPERTY", "views/legacy/a/view.json"));
        assert!(!config.is_suppressed("UNUSED_CUSTOM_PROPERTY", "views/a/view.json"));
    }

    #[test]
    fn rejects_invalid_glob() {
        let mut config = SuppressionConfig::new();
        assert!(config.add_path_rule("views/[", ["X"]).is_err());
    }
}
