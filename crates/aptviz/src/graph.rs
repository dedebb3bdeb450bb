//! Dependency map between known packages, stored as a petgraph `DiGraph`.
//!
//! # Edge Direction
//!
//! Edges point from **dependent to dependency**: `p -> d` with weight `s`
//! means p's candidate declares d as a dependency of strength s, and d is a
//! member of the known package set. There is at most one edge per ordered
//! pair; when several dependency kinds link the same pair, the edge keeps the
//! strongest of them.
//!
//! Nodes only exist for packages that take part in at least one edge.

use crate::database::PackageDatabase;
use crate::domain::{DependencyKind, DependencyStrength, PackageName};
use crate::error::Result;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Dependency map restricted to the known package set.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Nodes contain package names, edges contain the merged strength.
    graph: DiGraph<PackageName, DependencyStrength>,

    /// Mapping from package name to graph node.
    node_map: HashMap<PackageName, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(from, to, strength)` triples, merging duplicates.
    #[must_use]
    pub fn from_edges<I, N>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N, DependencyStrength)>,
        N: Into<PackageName>,
    {
        let mut graph = Self::new();
        for (from, to, strength) in edges {
            graph.add_edge(from.into(), to.into(), strength);
        }
        graph
    }

    fn ensure_node(&mut self, name: PackageName) -> NodeIndex {
        if let Some(&node) = self.node_map.get(&name) {
            return node;
        }
        let node = self.graph.add_node(name.clone());
        self.node_map.insert(name, node);
        node
    }

    /// Record `from -> to` with `strength`.
    ///
    /// An existing edge is only ever strengthened. Returns `true` if the
    /// graph changed.
    pub fn add_edge(
        &mut self,
        from: PackageName,
        to: PackageName,
        strength: DependencyStrength,
    ) -> bool {
        let from_node = self.ensure_node(from);
        let to_node = self.ensure_node(to);

        if let Some(edge) = self.graph.find_edge(from_node, to_node) {
            let current = &mut self.graph[edge];
            if strength > *current {
                *current = strength;
                true
            } else {
                false
            }
        } else {
            self.graph.add_edge(from_node, to_node, strength);
            true
        }
    }

    /// Strength of the edge `from -> to`, if any.
    #[must_use]
    pub fn strength(&self, from: &PackageName, to: &PackageName) -> Option<DependencyStrength> {
        let from_node = self.node_map.get(from)?;
        let to_node = self.node_map.get(to)?;
        self.graph
            .find_edge(*from_node, *to_node)
            .map(|edge| self.graph[edge])
    }

    /// Outgoing edges of `name`, in insertion order.
    #[must_use]
    pub fn dependencies(&self, name: &PackageName) -> Vec<(&PackageName, DependencyStrength)> {
        let Some(&node) = self.node_map.get(name) else {
            return Vec::new();
        };

        // petgraph walks adjacency lists newest first
        let mut deps: Vec<_> = self
            .graph
            .edges(node)
            .map(|edge| (&self.graph[edge.target()], *edge.weight()))
            .collect();
        deps.reverse();
        deps
    }

    /// Every edge as `(from, to, strength)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&PackageName, &PackageName, DependencyStrength)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
                *edge.weight(),
            )
        })
    }

    /// Every package that takes part in an edge, in first-seen order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageName> {
        self.graph.node_indices().map(|node| &self.graph[node])
    }

    /// Whether `name` takes part in any edge.
    #[must_use]
    pub fn contains(&self, name: &PackageName) -> bool {
        self.node_map.contains_key(name)
    }

    /// Number of packages with at least one edge.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Dependency cycles: strongly connected components with more than one
    /// package, plus packages that depend on themselves.
    ///
    /// Each cycle is sorted by name; cycles are sorted by their first member.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<PackageName>> {
        let mut cycles: Vec<Vec<PackageName>> = algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || self.graph.find_edge(component[0], component[0]).is_some()
            })
            .map(|component| {
                let mut names: Vec<PackageName> = component
                    .into_iter()
                    .map(|node| self.graph[node].clone())
                    .collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }
}

/// Build the dependency map for the known package set.
///
/// For every known package, every candidate of every alternative group of
/// every recognized dependency kind that is itself known becomes an edge of
/// that kind's strength. Kinds are merged by maximum strength.
///
/// # Errors
///
/// Returns `Error::PackageNotFound` as soon as a known package cannot be
/// resolved; no partial graph is returned.
pub fn build_dependency_graph(
    known: &[PackageName],
    database: &dyn PackageDatabase,
) -> Result<DependencyGraph> {
    let known_set: HashSet<&PackageName> = known.iter().collect();
    let mut graph = DependencyGraph::new();

    for name in known {
        let candidate = database.candidate(name)?;
        tracing::debug!(package = %name, version = ?candidate.version, "Resolved candidate");

        for kind in DependencyKind::ALL {
            let strength = kind.strength();
            for group in database.dependencies(&candidate, kind) {
                for alternative in group.iter().filter(|alt| known_set.contains(alt)) {
                    graph.add_edge(name.clone(), alternative.clone(), strength);
                }
            }
        }
    }

    tracing::info!(
        known = known.len(),
        packages = graph.package_count(),
        edges = graph.edge_count(),
        "Built dependency map"
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDatabase;
    use crate::domain::DependencyStrength::{Recommended, Required, Suggested};
    use crate::error::Error;

    fn names(names: &[&str]) -> Vec<PackageName> {
        names.iter().map(|n| PackageName::from(*n)).collect()
    }

    fn pkg(name: &str) -> PackageName {
        PackageName::from(name)
    }

    #[test]
    fn add_edge_keeps_strongest() {
        let mut graph = DependencyGraph::new();
        assert!(graph.add_edge(pkg("a"), pkg("b"), Suggested));
        assert!(graph.add_edge(pkg("a"), pkg("b"), Required));
        assert!(!graph.add_edge(pkg("a"), pkg("b"), Recommended));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.strength(&pkg("a"), &pkg("b")), Some(Required));
    }

    #[test]
    fn dependencies_in_insertion_order() {
        let graph = DependencyGraph::from_edges([
            ("a", "c", Required),
            ("a", "b", Suggested),
            ("b", "c", Recommended),
        ]);
        assert_eq!(
            graph.dependencies(&pkg("a")),
            vec![(&pkg("c"), Required), (&pkg("b"), Suggested)]
        );
        assert!(graph.dependencies(&pkg("zzz")).is_empty());
    }

    #[test]
    fn nodes_exist_only_through_edges() {
        let graph = DependencyGraph::from_edges([("a", "b", Required)]);
        let packages: Vec<PackageName> = graph.packages().cloned().collect();
        assert_eq!(packages, names(&["a", "b"]));
        assert!(!graph.contains(&pkg("c")));
    }

    #[test]
    fn cycles_are_reported() {
        let graph = DependencyGraph::from_edges([
            ("r", "a", Required),
            ("a", "b", Recommended),
            ("b", "a", Recommended),
            ("c", "c", Suggested),
        ]);
        assert_eq!(graph.cycles(), vec![names(&["a", "b"]), names(&["c"])]);
    }

    const PACKAGES: &str = "\
Package: app
Depends: libfoo (>= 1.0) | libfoo-compat, libc6
Pre-Depends: dpkg
Recommends: helper
Suggests: libc6, docs

Package: libfoo
Depends: libc6

Package: libfoo-compat
Depends: libc6

Package: libc6

Package: helper
Suggests: app

Package: docs
";

    #[test]
    fn builder_keeps_only_known_targets() {
        let db = InMemoryDatabase::from_control_text(PACKAGES);
        let known = names(&["app", "libfoo", "libc6", "helper"]);

        let graph = build_dependency_graph(&known, &db).unwrap();

        // dpkg, libfoo-compat and docs are not known
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.strength(&pkg("app"), &pkg("libfoo")), Some(Required));
        assert_eq!(
            graph.strength(&pkg("app"), &pkg("helper")),
            Some(Recommended)
        );
        assert_eq!(graph.strength(&pkg("helper"), &pkg("app")), Some(Suggested));
        assert!(!graph.contains(&pkg("docs")));
    }

    #[test]
    fn builder_records_every_known_alternative() {
        let db = InMemoryDatabase::from_control_text(PACKAGES);
        let known = names(&["app", "libfoo", "libfoo-compat", "libc6"]);

        let graph = build_dependency_graph(&known, &db).unwrap();

        assert_eq!(graph.strength(&pkg("app"), &pkg("libfoo")), Some(Required));
        assert_eq!(
            graph.strength(&pkg("app"), &pkg("libfoo-compat")),
            Some(Required)
        );
    }

    #[test]
    fn builder_merges_kinds_by_maximum() {
        // app both depends on and suggests libc6; Suggests is processed last
        let db = InMemoryDatabase::from_control_text(PACKAGES);
        let known = names(&["app", "libc6"]);

        let graph = build_dependency_graph(&known, &db).unwrap();

        assert_eq!(graph.strength(&pkg("app"), &pkg("libc6")), Some(Required));
    }

    #[test]
    fn builder_fails_on_unknown_package() {
        let db = InMemoryDatabase::from_control_text(PACKAGES);
        let known = names(&["app", "ghost"]);

        let Err(Error::PackageNotFound(name)) = build_dependency_graph(&known, &db) else {
            panic!("expected a not-found error");
        };
        assert_eq!(name, "ghost");
    }
}
