//! Command execution logic.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::Cli;
use crate::config::AptvizConfig;
use crate::database::{AptCacheDatabase, InMemoryDatabase, PackageDatabase};
use crate::discovery::{AptInstaller, Installer, PlanFileInstaller};
use crate::domain::PackageName;
use crate::output::{self, OutputConfig};
use crate::pipeline::Pipeline;
use crate::render::Renderer;
use crate::viewer::{self, DEFAULT_DOT_FILE, OutputFormat};

/// Exit code when a graph was produced but installer lines were skipped
const EXIT_SKIPPED_LINES: u8 = 2;

impl Cli {
    /// Execute the run described by the parsed arguments.
    ///
    /// Returns exit code 0 on success, or 2 when malformed installer lines
    /// were skipped.
    ///
    /// # Errors
    ///
    /// Returns an error when the run cannot produce a graph.
    pub fn execute(&self) -> Result<ExitCode> {
        let cwd = std::env::current_dir()?;
        let config = self.resolve_config(&cwd)?;

        let format = OutputFormat::from(self.format);
        if self.view && format != OutputFormat::Dot {
            bail!("--view needs DOT output; drop --format json");
        }

        let installer = self.installer(&config);
        let database = Self::database(&config)?;
        let roots: Vec<PackageName> = self
            .packages
            .iter()
            .map(|p| PackageName::from(p.as_str()))
            .collect();

        let report = Pipeline::new(installer.as_ref(), database.as_ref())
            .strict(config.strict)
            .renderer(Renderer::new(&config.render))
            .run(&roots)?;

        let contents = viewer::serialize(&report.description, format)?;
        let target = self
            .output
            .clone()
            .or_else(|| self.view.then(|| PathBuf::from(DEFAULT_DOT_FILE)));

        match &target {
            Some(path) => viewer::write_output(path, &contents)
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => print!("{contents}"),
        }

        if let Some(path) = target.as_deref().filter(|_| self.view) {
            let image = viewer::view(path, &config.viewer)?;
            if !self.quiet {
                let out = OutputConfig::from_env();
                eprintln!(
                    "{} {}",
                    output::success("Opened", &out),
                    output::info(&image.display().to_string(), &out)
                );
            }
        }

        if !self.quiet {
            output::print_summary(&report)?;
        }

        if report.skipped_lines().is_empty() {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::from(EXIT_SKIPPED_LINES))
        }
    }

    /// Layer CLI flags over file and environment configuration.
    fn resolve_config(&self, cwd: &Path) -> Result<AptvizConfig> {
        let mut config = AptvizConfig::resolve(self.config.as_deref(), cwd)?;
        if self.strict {
            config.strict = true;
        }
        if let Some(path) = &self.packages_file {
            config.database.packages_file = Some(path.clone());
        }
        tracing::debug!(?config, "Resolved configuration");
        Ok(config)
    }

    fn installer(&self, config: &AptvizConfig) -> Box<dyn Installer> {
        match &self.plan_file {
            Some(path) => Box::new(PlanFileInstaller::new(path)),
            None => Box::new(AptInstaller::new(
                config.installer.program.clone(),
                config.installer.args.clone(),
            )),
        }
    }

    fn database(config: &AptvizConfig) -> Result<Box<dyn PackageDatabase>> {
        let Some(path) = &config.database.packages_file else {
            let program = config.database.program.clone();
            return Ok(Box::new(AptCacheDatabase::new(program)));
        };
        let db = InMemoryDatabase::load(path)
            .with_context(|| format!("Failed to load packages file {}", path.display()))?;
        tracing::info!(
            packages = db.len(),
            path = %path.display(),
            "Loaded package database"
        );
        Ok(Box::new(db))
    }
}
