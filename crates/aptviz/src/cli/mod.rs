//! CLI argument parsing and dispatch.
//!
//! This module provides the command-line interface for aptviz using clap's derive API.
//! There is a single command: the positional arguments are the root packages.
//!
//! # Example
//!
//! ```bash
//! aptviz python3-pip > pip.gv
//! aptviz --view -o deps/pip.gv python3-pip build-essential
//! aptviz --plan-file plan.txt --packages-file Packages --format json curl
//! ```

mod execute;
mod types;
mod validators;

use clap::Parser;
use std::path::PathBuf;

pub use types::FormatArg;
pub use validators::validate_package_name;

/// Aptviz - visualize how important each dependency of a package set is
///
/// Asks the installer what would be installed alongside the given packages,
/// classifies every package as required, recommended or suggested relative
/// to them, and emits a Graphviz graph of the result.
#[derive(Parser, Debug)]
#[command(name = "aptviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Packages to analyze (the roots of the graph)
    #[arg(required = true, value_name = "PACKAGE", value_parser = validate_package_name)]
    pub packages: Vec<String>,

    /// Write the graph description to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Serialization of the graph description
    #[arg(long, value_enum, default_value_t = FormatArg::Dot)]
    pub format: FormatArg,

    /// Render the graph with Graphviz and open the image
    #[arg(long)]
    pub view: bool,

    /// Read dry-run installer output from a file instead of running the installer
    #[arg(long, value_name = "PATH")]
    pub plan_file: Option<PathBuf>,

    /// Resolve dependencies from a Packages or dpkg status file instead of apt-cache
    #[arg(long, value_name = "PATH")]
    pub packages_file: Option<PathBuf>,

    /// Configuration file (defaults to ./aptviz.yaml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Abort on malformed installer output instead of skipping the line
    #[arg(long)]
    pub strict: bool,

    /// Do not print the run summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log filter for the requested verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
