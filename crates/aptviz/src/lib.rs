//! Aptviz - dependency importance graphs for Debian packages.
//!
//! Given a set of root packages, aptviz asks the installer which packages a
//! dry run would install, builds the dependency map among them, and assigns
//! every package reachable from the roots an importance level:
//! required, recommended or suggested. The result is rendered as a Graphviz
//! graph where node shape and edge style encode the level.
//!
//! # Example
//!
//! ```
//! use aptviz::{DependencyGraph, DependencyStrength, PackageName, propagate};
//!
//! let graph = DependencyGraph::from_edges([
//!     ("curl", "libcurl4", DependencyStrength::Required),
//!     ("curl", "ca-certificates", DependencyStrength::Recommended),
//! ]);
//! let levels = propagate(&graph, &[PackageName::from("curl")]);
//!
//! assert_eq!(levels[&PackageName::from("libcurl4")], DependencyStrength::Required);
//! assert_eq!(levels[&PackageName::from("ca-certificates")], DependencyStrength::Recommended);
//! ```

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod control;
pub mod database;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod graph;
pub mod level;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod viewer;

pub use domain::{DependencyKind, DependencyStrength, LevelMap, PackageName};
pub use error::{Error, Result};
pub use graph::{DependencyGraph, build_dependency_graph};
pub use level::propagate;
pub use pipeline::{Pipeline, RunReport};
