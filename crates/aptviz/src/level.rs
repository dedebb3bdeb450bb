//! Importance level propagation.
//!
//! Every root is `Required`. A package reached through an edge of strength
//! `s` from a package at level `l` is offered `min(l, s)`, and keeps the
//! strongest offer it receives over all paths. The result is the least fixed
//! point of that rule over the dependency map.
//!
//! # Algorithm
//!
//! A round-based worklist:
//!
//! 1. Seed the level map with the roots at `Required`; the work-set is the roots
//! 2. For each package in the work-set, offer every dependency its path level.
//!    A dependency that gets its first level, or a strictly higher one, joins
//!    the next work-set
//! 3. Repeat with the next work-set until it is empty
//!
//! Levels only ever rise and are bounded by `Required`, so a package can be
//! re-activated at most twice after its first level. Cycles therefore
//! terminate: once no member of a cycle improves, it drops out of the work-set.
//!
//! Packages not reachable from a root never enter the level map.

use crate::domain::{DependencyStrength, LevelMap, PackageName};
use crate::graph::DependencyGraph;
use std::collections::{BTreeMap, BTreeSet};

/// Step-by-step level propagation over a dependency graph.
///
/// Exposes the intermediate level map between rounds; [`propagate`] is the
/// one-shot entry point.
#[derive(Debug, Clone)]
pub struct Propagator<'g> {
    graph: &'g DependencyGraph,
    levels: LevelMap,
    work_set: BTreeSet<PackageName>,
    rounds: usize,
}

impl<'g> Propagator<'g> {
    /// Seed propagation with `roots` at `Required`.
    #[must_use]
    pub fn new(graph: &'g DependencyGraph, roots: &[PackageName]) -> Self {
        let levels: LevelMap = roots
            .iter()
            .map(|root| (root.clone(), DependencyStrength::Required))
            .collect();
        let work_set = roots.iter().cloned().collect();

        Self {
            graph,
            levels,
            work_set,
            rounds: 0,
        }
    }

    /// Run one round. Returns `true` while there is more work to do.
    pub fn step(&mut self) -> bool {
        if self.work_set.is_empty() {
            return false;
        }

        let work_set = std::mem::take(&mut self.work_set);
        self.work_set = advance(self.graph, &mut self.levels, work_set);
        self.rounds += 1;

        tracing::trace!(
            round = self.rounds,
            changed = self.work_set.len(),
            resolved = self.levels.len(),
            "Propagation round complete"
        );

        !self.work_set.is_empty()
    }

    /// Whether the fixed point has been reached.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.work_set.is_empty()
    }

    /// Current (possibly intermediate) level map.
    #[must_use]
    pub fn levels(&self) -> &LevelMap {
        &self.levels
    }

    /// Number of rounds run so far.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Run to the fixed point and return the level map.
    #[must_use]
    pub fn finish(mut self) -> LevelMap {
        while self.step() {}
        tracing::debug!(
            rounds = self.rounds,
            packages = self.levels.len(),
            "Level propagation converged"
        );
        self.levels
    }
}

/// Process one work-set and return the next one.
fn advance(
    graph: &DependencyGraph,
    levels: &mut LevelMap,
    work_set: BTreeSet<PackageName>,
) -> BTreeSet<PackageName> {
    let mut next = BTreeSet::new();

    for package in work_set {
        let Some(&level) = levels.get(&package) else {
            continue;
        };

        for (dependency, strength) in graph.dependencies(&package) {
            let offered = level.through(strength);
            let improved = levels
                .get(dependency)
                .is_none_or(|&current| offered > current);

            if improved {
                levels.insert(dependency.clone(), offered);
                next.insert(dependency.clone());
            }
        }
    }

    next
}

/// Compute the importance level of every package reachable from `roots`.
#[must_use]
pub fn propagate(graph: &DependencyGraph, roots: &[PackageName]) -> LevelMap {
    Propagator::new(graph, roots).finish()
}

/// Number of packages at each level, every level present.
#[must_use]
pub fn level_counts(levels: &LevelMap) -> BTreeMap<DependencyStrength, usize> {
    let mut counts: BTreeMap<DependencyStrength, usize> = DependencyStrength::ALL
        .into_iter()
        .map(|level| (level, 0))
        .collect();
    for level in levels.values() {
        *counts.entry(*level).or_default() += 1;
    }
    counts
}
