//! Package database abstraction.
//!
//! The map builder needs exactly two capabilities from a package database:
//! resolve a package name to its candidate version, and list the dependency
//! alternative groups that candidate declares for a given kind. Both live on
//! the [`PackageDatabase`] trait.
//!
//! Implementations:
//!
//! - [`AptCacheDatabase`]: asks `apt-cache show --no-all-versions` on the host
//! - [`InMemoryDatabase`]: records parsed from a `Packages` index or dpkg
//!   `status` file, or assembled by hand in tests

use crate::control::{PackageRecord, parse_stanzas};
use crate::domain::{AlternativeGroup, DependencyKind, PackageName};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Read access to package metadata.
pub trait PackageDatabase {
    /// Resolve `name` to the version that would be installed.
    ///
    /// # Errors
    ///
    /// Returns `Error::PackageNotFound` if the database has no candidate.
    fn candidate(&self, name: &PackageName) -> Result<PackageRecord>;

    /// Alternative groups the candidate declares under `kind`.
    fn dependencies<'a>(
        &self,
        candidate: &'a PackageRecord,
        kind: DependencyKind,
    ) -> &'a [AlternativeGroup] {
        candidate.dependencies(kind)
    }
}

/// Live lookups through `apt-cache`.
#[derive(Debug, Clone)]
pub struct AptCacheDatabase {
    program: String,
}

impl AptCacheDatabase {
    /// Use `program` as the `apt-cache` binary
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for AptCacheDatabase {
    fn default() -> Self {
        Self::new("apt-cache")
    }
}

/// Phrases `apt-cache` prints when a name has no installable version.
const NOT_FOUND_MARKERS: [&str; 2] = ["No packages found", "no candidate"];

impl PackageDatabase for AptCacheDatabase {
    fn candidate(&self, name: &PackageName) -> Result<PackageRecord> {
        tracing::debug!(package = %name, "Querying apt-cache");

        let output = Command::new(&self.program)
            .args(["show", "--no-all-versions", name.as_str()])
            .output()
            .map_err(|e| Error::Command {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if NOT_FOUND_MARKERS.iter().any(|m| stderr.contains(m)) {
                return Err(Error::PackageNotFound(name.to_string()));
            }
            return Err(Error::Command {
                program: self.program.clone(),
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        // Stanzas name the package without its `:arch` qualifier
        let wanted = name.without_arch();
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_stanzas(&stdout)
            .iter()
            .filter_map(PackageRecord::from_stanza)
            .find(|record| record.name == wanted)
            .ok_or_else(|| Error::PackageNotFound(name.to_string()))
    }
}

/// Records held in memory.
///
/// When the same package appears in several stanzas the first one is the
/// candidate; versions are not compared.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    records: HashMap<PackageName, PackageRecord>,
}

impl InMemoryDatabase {
    /// Create an empty database
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from control data (`Packages` or `status` format).
    #[must_use]
    pub fn from_control_text(text: &str) -> Self {
        let mut db = Self::new();
        for record in parse_stanzas(text).iter().filter_map(PackageRecord::from_stanza) {
            db.records.entry(record.name.clone()).or_insert(record);
        }
        tracing::debug!(packages = db.len(), "Loaded package records");
        db
    }

    /// Load control data from a file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_control_text(&text))
    }

    /// Number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the database holds no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PackageDatabase for InMemoryDatabase {
    fn candidate(&self, name: &PackageName) -> Result<PackageRecord> {
        self.records
            .get(&name.without_arch())
            .cloned()
            .ok_or_else(|| Error::PackageNotFound(name.to_string()))
    }
}
