//! Error types for viewlint operations.
//!
//! This module defines [`ViewlintError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration mistakes (unknown severity threshold, schema mode, or
//!   naming style) are `ViewlintError` values that fail the invocation.
//!   They are never downgraded to lint issues: malformed *content* produces
//!   issues, a misconfigured *tool* produces an error.
//! - Use `anyhow::Error` (via `ViewlintError::Other`) for unexpected errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for viewlint operations.
#[derive(Debug, Error)]
pub enum ViewlintError {
    /// Unknown severity threshold name.
    #[error("Unknown severity level: {name}")]
    UnknownSeverity { name: String },

    /// Unknown schema validation mode.
    #[error("Unknown schema mode '{name}'. Options: strict, robust, permissive")]
    UnknownSchemaMode { name: String },

    /// Unknown naming style name.
    #[error("Unknown naming style '{name}'. Options: snake_case, camelCase, PascalCase, UPPER_CASE, Title Case, any")]
    UnknownNamingStyle { name: String },

    /// Invalid custom naming regex supplied by the caller.
    #[error("Invalid naming pattern '{pattern}': {message}")]
    InvalidNamingPattern { pattern: String, message: String },

    /// Malformed suppression/ignore file.
    #[error("Failed to load ignore file {path}: {message}")]
    IgnoreFileError { path: PathBuf, message: String },

    /// A bundled schema document failed to load.
    #[error("Schema document error: {message}")]
    SchemaError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for viewlint operations.
pub type Result<T> = std::result::Result<T, ViewlintError>;
