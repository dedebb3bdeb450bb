//! Property tests for level propagation on random small dependency maps.

use aptviz::level::Propagator;
use aptviz::{DependencyGraph, DependencyStrength, LevelMap, PackageName, propagate};
use proptest::prelude::*;
use std::collections::{BTreeSet, VecDeque};

const MAX_PACKAGES: usize = 8;

fn name(i: usize) -> PackageName {
    PackageName::new(format!("p{i}"))
}

fn strength_strategy() -> impl Strategy<Value = DependencyStrength> {
    prop_oneof![
        Just(DependencyStrength::Suggested),
        Just(DependencyStrength::Recommended),
        Just(DependencyStrength::Required),
    ]
}

/// A random map over `p0..pN` plus a non-empty root set.
fn graph_and_roots() -> impl Strategy<Value = (DependencyGraph, Vec<PackageName>, usize)> {
    (1..=MAX_PACKAGES).prop_flat_map(|n| {
        let edges = prop::collection::vec((0..n, 0..n, strength_strategy()), 0..n * 3);
        let roots = prop::collection::btree_set(0..n, 1..=n.min(3));
        (edges, roots).prop_map(move |(edges, roots)| {
            let edges = edges.into_iter().map(|(a, b, s)| (name(a), name(b), s));
            let graph = DependencyGraph::from_edges(edges);
            let roots: Vec<PackageName> = roots.into_iter().map(name).collect();
            (graph, roots, n)
        })
    })
}

/// Packages reachable from `roots` using only edges at least as strong as `threshold`.
fn reachable_at(
    graph: &DependencyGraph,
    roots: &[PackageName],
    threshold: DependencyStrength,
) -> BTreeSet<PackageName> {
    let mut seen: BTreeSet<PackageName> = roots.iter().cloned().collect();
    let mut queue: VecDeque<PackageName> = roots.iter().cloned().collect();
    while let Some(package) = queue.pop_front() {
        for (dependency, strength) in graph.dependencies(&package) {
            if strength >= threshold && seen.insert(dependency.clone()) {
                queue.push_back(dependency.clone());
            }
        }
    }
    seen
}

/// Level of every package as the strongest bottleneck over all paths.
fn bottleneck_levels(graph: &DependencyGraph, roots: &[PackageName]) -> LevelMap {
    let mut levels = LevelMap::new();
    // Weakest threshold first so stronger ones overwrite.
    for threshold in DependencyStrength::ALL {
        for package in reachable_at(graph, roots, threshold) {
            levels.insert(package, threshold);
        }
    }
    for root in roots {
        levels.insert(root.clone(), DependencyStrength::Required);
    }
    levels
}

proptest! {
    #[test]
    fn levels_match_strongest_path((graph, roots, _n) in graph_and_roots()) {
        prop_assert_eq!(propagate(&graph, &roots), bottleneck_levels(&graph, &roots));
    }

    #[test]
    fn result_is_a_fixed_point((graph, roots, _n) in graph_and_roots()) {
        let levels = propagate(&graph, &roots);

        for root in &roots {
            prop_assert_eq!(levels.get(root), Some(&DependencyStrength::Required));
        }
        for (from, to, strength) in graph.edges() {
            if let Some(&level) = levels.get(from) {
                let offered = level.through(strength);
                prop_assert!(levels.get(to).is_some_and(|&current| current >= offered));
            }
        }
    }

    #[test]
    fn unreachable_packages_have_no_level((graph, roots, _n) in graph_and_roots()) {
        let levels = propagate(&graph, &roots);
        let reachable = reachable_at(&graph, &roots, DependencyStrength::Suggested);

        let leveled: BTreeSet<PackageName> = levels.keys().cloned().collect();
        prop_assert_eq!(leveled, reachable);
    }

    #[test]
    fn levels_only_rise_and_rounds_are_bounded((graph, roots, n) in graph_and_roots()) {
        let mut propagator = Propagator::new(&graph, &roots);
        let mut previous = propagator.levels().clone();

        while !propagator.is_done() {
            propagator.step();
            let current = propagator.levels();
            for (package, level) in &previous {
                prop_assert!(current.get(package).is_some_and(|now| now >= level));
            }
            previous = current.clone();
        }

        prop_assert!(propagator.is_done());
        prop_assert!(propagator.rounds() <= 3 * n + 1);
        prop_assert_eq!(propagator.finish(), propagate(&graph, &roots));
    }

    #[test]
    fn propagation_is_deterministic((graph, roots, _n) in graph_and_roots()) {
        let mut reversed = roots.clone();
        reversed.reverse();
        prop_assert_eq!(propagate(&graph, &roots), propagate(&graph, &reversed));
    }
}
