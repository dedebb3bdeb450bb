//! Discovery of the known package set through a dry-run installer.
//!
//! The installer is asked what it would install for the root packages. Its
//! output is filtered in-process to the lines that announce an installation:
//!
//! ```text
//! Inst libffi-dev (3.3-6 Debian:testing [amd64])
//! ```
//!
//! Every such line must split into exactly five whitespace-separated fields.
//! Lines that don't are reported as [`DiscoveryWarning`]s and skipped, unless
//! strict mode turns the first one into a fatal error.
//!
//! # Test Utilities
//!
//! [`StaticInstaller`] answers every dry run with fixed output. Enable the
//! `test-util` feature to use it outside this crate:
//!
//! ```toml
//! [dev-dependencies]
//! aptviz = { version = "...", features = ["test-util"] }
//! ```

use crate::domain::PackageName;
use crate::error::{DiscoveryWarning, Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// First field of an installation line
const INST_MARKER: &str = "Inst";

/// Number of fields in a well-formed installation line
const INST_FIELD_COUNT: usize = 5;

/// Source of dry-run installer output.
pub trait Installer {
    /// Run the installer in simulation mode for `packages` and return its
    /// raw standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the installer cannot be run or reports failure.
    fn dry_run(&self, packages: &[PackageName]) -> Result<String>;
}

/// Runs a real `apt-get install --dry-run`.
#[derive(Debug, Clone)]
pub struct AptInstaller {
    program: String,
    args: Vec<String>,
}

impl AptInstaller {
    /// Create an installer invoking `program args... packages...`
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for AptInstaller {
    fn default() -> Self {
        Self::new(
            "apt-get",
            vec!["install".to_string(), "--dry-run".to_string()],
        )
    }
}

impl Installer for AptInstaller {
    fn dry_run(&self, packages: &[PackageName]) -> Result<String> {
        tracing::debug!(
            program = %self.program,
            count = packages.len(),
            "Running dry-run installer"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .args(packages.iter().map(PackageName::as_str))
            .output()
            .map_err(|e| Error::Command {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Command {
                program: self.program.clone(),
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Replays installer output previously saved to a file.
#[derive(Debug, Clone)]
pub struct PlanFileInstaller {
    path: PathBuf,
}

impl PlanFileInstaller {
    /// Read the plan from `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Installer for PlanFileInstaller {
    fn dry_run(&self, _packages: &[PackageName]) -> Result<String> {
        tracing::debug!(path = %self.path.display(), "Reading saved installer output");
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// Installer returning fixed output, for tests.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Default)]
pub struct StaticInstaller {
    output: String,
}

#[cfg(any(test, feature = "test-util"))]
impl StaticInstaller {
    /// Create an installer that always answers with `output`
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Installer for StaticInstaller {
    fn dry_run(&self, _packages: &[PackageName]) -> Result<String> {
        Ok(self.output.clone())
    }
}

/// A package the installer would install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// Package name, without the `:arch` qualifier apt adds for foreign architectures
    pub name: PackageName,
    /// Version that would be installed
    pub version: String,
    /// Distribution the version comes from
    pub distribution: String,
    /// Architecture
    pub arch: String,
}

impl PlanEntry {
    /// Parse an installation line.
    ///
    /// # Errors
    ///
    /// Returns `Err(found)` with the number of fields when the line does not
    /// have exactly five.
    pub fn parse(line: &str) -> std::result::Result<Self, usize> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [_, name, version, distribution, arch] = fields.as_slice() else {
            return Err(fields.len());
        };

        Ok(Self {
            name: PackageName::new(*name).without_arch(),
            version: version.trim_start_matches('(').to_string(),
            distribution: (*distribution).to_string(),
            arch: arch
                .trim_start_matches('[')
                .trim_end_matches(')')
                .trim_end_matches(']')
                .to_string(),
        })
    }
}

/// Parsed dry-run installer output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    /// Well-formed installation lines, in output order
    pub entries: Vec<PlanEntry>,
    /// Installation lines that were skipped
    pub warnings: Vec<DiscoveryWarning>,
}

impl InstallPlan {
    /// Parse raw installer output, skipping malformed installation lines.
    ///
    /// Lines not starting with `Inst` are ignored silently.
    #[must_use]
    pub fn parse(output: &str) -> Self {
        let mut plan = Self::default();

        for (index, line) in output.lines().enumerate() {
            if line.split_whitespace().next() != Some(INST_MARKER) {
                continue;
            }

            match PlanEntry::parse(line) {
                Ok(entry) => plan.entries.push(entry),
                Err(found) => {
                    let warning = DiscoveryWarning::bad_field_count(index + 1, line, found);
                    tracing::warn!(
                        line_number = warning.line_number,
                        line = %line,
                        fields = found,
                        expected = INST_FIELD_COUNT,
                        "Skipping malformed installer line"
                    );
                    plan.warnings.push(warning);
                }
            }
        }

        plan
    }

    /// Parse raw installer output, failing on the first malformed installation line.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedDiscoveryLine` for the first bad line.
    pub fn parse_strict(output: &str) -> Result<Self> {
        let mut plan = Self::parse(output);
        if plan.warnings.is_empty() {
            Ok(plan)
        } else {
            Err(Error::MalformedDiscoveryLine(plan.warnings.swap_remove(0)))
        }
    }

    /// Package names in output order, each listed once.
    #[must_use]
    pub fn package_names(&self) -> Vec<PackageName> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| seen.insert(&entry.name))
            .map(|entry| entry.name.clone())
            .collect()
    }
}

/// Result of asking the installer about the roots.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Known package set: the roots first, then every planned package
    pub known: Vec<PackageName>,
    /// The parsed plan
    pub plan: InstallPlan,
}

/// Compute the known package set for `roots`.
///
/// Roots are always members of the known set, even when the installer
/// leaves them out because they are already installed.
///
/// # Errors
///
/// Returns the installer's error, or `Error::MalformedDiscoveryLine` in
/// strict mode.
pub fn discover(
    installer: &dyn Installer,
    roots: &[PackageName],
    strict: bool,
) -> Result<Discovery> {
    let output = installer.dry_run(roots)?;
    let plan = if strict {
        InstallPlan::parse_strict(&output)?
    } else {
        InstallPlan::parse(&output)
    };

    let mut seen: HashSet<PackageName> = HashSet::new();
    let known: Vec<PackageName> = roots
        .iter()
        .map(PackageName::without_arch)
        .chain(plan.package_names())
        .filter(|name| seen.insert(name.clone()))
        .collect();

    tracing::info!(
        roots = roots.len(),
        planned = plan.entries.len(),
        skipped = plan.warnings.len(),
        known = known.len(),
        "Discovered known package set"
    );

    Ok(Discovery { known, plan })
}
