//! End-to-end run: discovery, map building, propagation, rendering.
//!
//! External calls (installer, package database) all happen before the level
//! propagation starts; propagation and rendering are pure.

use crate::database::PackageDatabase;
use crate::discovery::{Discovery, Installer, discover};
use crate::domain::{DependencyStrength, LevelMap, PackageName};
use crate::error::{DiscoveryWarning, Error, Result};
use crate::graph::{DependencyGraph, build_dependency_graph};
use crate::level::{level_counts, propagate};
use crate::render::{GraphDescription, Renderer};
use std::collections::BTreeMap;

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Requested packages, without architecture qualifiers
    pub roots: Vec<PackageName>,
    /// Known package set and parsed installer plan
    pub discovery: Discovery,
    /// Dependency map between known packages
    pub graph: DependencyGraph,
    /// Importance level of every reachable package
    pub levels: LevelMap,
    /// Renderable description
    pub description: GraphDescription,
}

impl RunReport {
    /// Installer lines that were skipped.
    #[must_use]
    pub fn skipped_lines(&self) -> &[DiscoveryWarning] {
        &self.discovery.plan.warnings
    }

    /// Number of packages per level.
    #[must_use]
    pub fn level_counts(&self) -> BTreeMap<DependencyStrength, usize> {
        level_counts(&self.levels)
    }

    /// Dependency cycles in the map.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<PackageName>> {
        self.graph.cycles()
    }
}

/// Wires the external collaborators to the core.
pub struct Pipeline<'a> {
    installer: &'a dyn Installer,
    database: &'a dyn PackageDatabase,
    renderer: Renderer,
    strict: bool,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with the default renderer, skipping malformed lines
    #[must_use]
    pub fn new(installer: &'a dyn Installer, database: &'a dyn PackageDatabase) -> Self {
        Self {
            installer,
            database,
            renderer: Renderer::default(),
            strict: false,
        }
    }

    /// Abort on the first malformed installer line.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Use `renderer` for the description.
    #[must_use]
    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Run for `roots`.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if `roots` is empty
    /// - `Error::MalformedDiscoveryLine` in strict mode
    /// - any installer or database failure; no description is produced then
    pub fn run(&self, roots: &[PackageName]) -> Result<RunReport> {
        if roots.is_empty() {
            return Err(Error::Config("at least one package is required".to_string()));
        }

        let discovery = discover(self.installer, roots, self.strict)?;
        let roots: Vec<PackageName> = roots.iter().map(PackageName::without_arch).collect();
        let graph = build_dependency_graph(&discovery.known, self.database)?;
        let levels = propagate(&graph, &roots);
        let description = self.renderer.render(&graph, &levels);

        tracing::info!(
            roots = roots.len(),
            levels = levels.len(),
            nodes = description.nodes.len(),
            edges = description.edges.len(),
            "Rendered dependency graph"
        );

        Ok(RunReport {
            roots,
            discovery,
            graph,
            levels,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDatabase;
    use crate::discovery::StaticInstaller;

    const PLAN: &str = "\
Inst libbar (1.0 Debian:testing [amd64])
Inst bar (1.0 Debian:testing [amd64])
";

    const PACKAGES: &str = "\
Package: bar
Depends: libbar

Package: libbar
";

    #[test]
    fn run_produces_levels_and_description() {
        let installer = StaticInstaller::new(PLAN);
        let db = InMemoryDatabase::from_control_text(PACKAGES);

        let report = Pipeline::new(&installer, &db)
            .run(&[PackageName::from("bar")])
            .unwrap();

        assert_eq!(report.levels.len(), 2);
        assert_eq!(report.description.edges.len(), 1);
        assert!(report.skipped_lines().is_empty());
        assert_eq!(report.level_counts()[&DependencyStrength::Required], 2);
    }

    #[test]
    fn foreign_arch_packages_are_resolved() {
        let plan = "\
Inst libbar:i386 (1.0 Debian:testing [i386])
Inst bar:i386 (1.0 Debian:testing [i386])
";
        let installer = StaticInstaller::new(plan);
        let db = InMemoryDatabase::from_control_text(PACKAGES);

        let report = Pipeline::new(&installer, &db)
            .run(&[PackageName::from("bar:i386")])
            .unwrap();

        assert_eq!(report.roots, vec![PackageName::from("bar")]);
        let libbar = PackageName::from("libbar");
        assert_eq!(report.levels[&libbar], DependencyStrength::Required);
        assert_eq!(report.description.edges.len(), 1);
    }

    #[test]
    fn empty_roots_are_rejected() {
        let installer = StaticInstaller::new(PLAN);
        let db = InMemoryDatabase::from_control_text(PACKAGES);

        let result = Pipeline::new(&installer, &db).run(&[]);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
