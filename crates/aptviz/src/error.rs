//! Error types for aptviz operations.
//!
//! Errors come in two flavours:
//!
//! - **`Error`**: failures that stop the run (a package the database cannot
//!   resolve, an external program that cannot be started, bad configuration)
//! - **`DiscoveryWarning`**: a single unusable line of installer output,
//!   collected and reported without aborting

use std::io;
use thiserror::Error;

/// The error type for aptviz operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The package database has no candidate for this package.
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// An external program failed to start or exited unsuccessfully.
    #[error("`{program}` failed: {message}")]
    Command {
        /// Program that was invoked
        program: String,
        /// What went wrong
        message: String,
    },

    /// A discovery line could not be parsed and strict mode is enabled.
    #[error("Malformed installer output: {0}")]
    MalformedDiscoveryLine(DiscoveryWarning),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A specialized Result type for aptviz operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A line of dry-run installer output that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryWarning {
    /// 1-based line number in the installer output
    pub line_number: usize,
    /// The offending line, verbatim
    pub line: String,
    /// Human-readable reason
    pub reason: String,
}

impl std::fmt::Display for DiscoveryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            line_number,
            line,
            reason,
        } = self;
        write!(f, "line {line_number}: {reason} ({line:?})")
    }
}

impl std::error::Error for DiscoveryWarning {}

impl DiscoveryWarning {
    /// Create a warning for a line with the wrong number of fields.
    #[must_use]
    pub fn bad_field_count(line_number: usize, line: &str, found: usize) -> Self {
        Self {
            line_number,
            line: line.to_string(),
            reason: format!("expected 5 whitespace-separated fields, found {found}"),
        }
    }
}
