//! Command-line interface for viewlint.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and the lint run pipeline.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`run`] - Document loading, lint dispatch, and report rendering

pub mod args;
mod run;

pub use args::{Cli, DocumentKind, ReportFormat};
pub use run::run;
