//! Configuration management for aptviz.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Built-in defaults (`apt-get`, `apt-cache`, `dot`, `xdg-open`)
//! 2. A YAML file (`--config <PATH>`, or `aptviz.yaml` in the working directory)
//! 3. Environment variables (`APTVIZ_INSTALLER`, `APTVIZ_APT_CACHE`,
//!    `APTVIZ_PACKAGES_FILE`, `APTVIZ_STRICT`)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "aptviz.yaml";

/// Configuration file structure for aptviz
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AptvizConfig {
    /// Dry-run installer settings
    pub installer: InstallerConfig,

    /// Package database settings
    pub database: DatabaseConfig,

    /// Graph rendering settings
    pub render: RenderConfig,

    /// Image conversion and viewer settings
    pub viewer: ViewerConfig,

    /// Abort on the first malformed installer line instead of skipping it
    pub strict: bool,
}

/// Installer section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct InstallerConfig {
    /// Program to run
    pub program: String,

    /// Arguments placed before the package names
    pub args: Vec<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            program: "apt-get".to_string(),
            args: vec!["install".to_string(), "--dry-run".to_string()],
        }
    }
}

/// Database section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct DatabaseConfig {
    /// `apt-cache` compatible program used for live lookups
    pub program: String,

    /// Packages or status file to read instead of querying `program`
    pub packages_file: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            program: "apt-cache".to_string(),
            packages_file: None,
        }
    }
}

/// Render section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    /// Graphviz `rankdir` attribute
    pub rankdir: String,

    /// Comment written at the top of the graph
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rankdir: "LR".to_string(),
            title: "Dependency graph".to_string(),
        }
    }
}

/// Viewer section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ViewerConfig {
    /// Graphviz layout program
    pub dot_program: String,

    /// Image format passed as `-T<format>`
    pub format: String,

    /// Program that opens the rendered image
    pub open_program: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            dot_program: "dot".to_string(),
            format: "png".to_string(),
            open_program: "xdg-open".to_string(),
        }
    }
}

impl AptvizConfig {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, or `Error::Config`
    /// if it is not valid YAML for this structure.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first YAML error.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Without one, `aptviz.yaml` in `cwd` is
    /// used when present. Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Fails if the selected file cannot be loaded.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let candidate = cwd.join(CONFIG_FILE_NAME);
        let path = explicit.or_else(|| candidate.is_file().then_some(candidate.as_path()));
        let mut config = if let Some(path) = path {
            tracing::debug!(path = %path.display(), "Loading configuration");
            Self::load(path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(program) = lookup("APTVIZ_INSTALLER").filter(|v| !v.is_empty()) {
            self.installer.program = program;
        }
        if let Some(program) = lookup("APTVIZ_APT_CACHE").filter(|v| !v.is_empty()) {
            self.database.program = program;
        }
        if let Some(path) = lookup("APTVIZ_PACKAGES_FILE").filter(|v| !v.is_empty()) {
            self.database.packages_file = Some(PathBuf::from(path));
        }
        match lookup("APTVIZ_STRICT") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => self.strict = true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => {
                self.strict = false;
            }
            Some(v) => {
                tracing::warn!(
                    env_var = "APTVIZ_STRICT",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), ignoring"
                );
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_target_apt() {
        let config = AptvizConfig::default();
        assert_eq!(config.installer.program, "apt-get");
        assert_eq!(config.installer.args, vec!["install", "--dry-run"]);
        assert_eq!(config.database.program, "apt-cache");
        assert_eq!(config.render.rankdir, "LR");
        assert!(!config.strict);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "strict: true\nviewer:\n  format: svg\n";
        let config = AptvizConfig::from_yaml(yaml).unwrap();
        assert!(config.strict);
        assert_eq!(config.viewer.format, "svg");
        assert_eq!(config.viewer.dot_program, "dot");
        assert_eq!(config.installer.program, "apt-get");
    }

    #[test]
    fn kebab_case_keys() {
        let yaml = "database:\n  packages-file: /var/lib/dpkg/status\n";
        let config = AptvizConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.database.packages_file,
            Some(PathBuf::from("/var/lib/dpkg/status"))
        );
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        let result = AptvizConfig::from_yaml("installer: [unterminated");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AptvizConfig::default();
        config.apply_env(env_of(&[
            ("APTVIZ_INSTALLER", "/usr/local/bin/fake-apt"),
            ("APTVIZ_STRICT", "true"),
        ]));
        assert_eq!(config.installer.program, "/usr/local/bin/fake-apt");
        assert!(config.strict);
    }

    #[test]
    fn invalid_strict_value_is_ignored() {
        let mut config = AptvizConfig {
            strict: true,
            ..AptvizConfig::default()
        };
        config.apply_env(env_of(&[("APTVIZ_STRICT", "maybe")]));
        assert!(config.strict);
    }

    #[test]
    fn resolve_picks_up_file_in_cwd() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "render:\n  rankdir: TB\n").unwrap();

        let config = AptvizConfig::resolve(None, dir.path()).unwrap();
        assert_eq!(config.render.rankdir, "TB");
    }

    #[test]
    fn resolve_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yaml");
        let result = AptvizConfig::resolve(Some(&missing), dir.path());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
