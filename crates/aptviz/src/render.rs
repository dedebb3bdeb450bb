//! Graph description for the dependency map.
//!
//! Node shape encodes a package's importance level, line style encodes an
//! edge's strength:
//!
//! | Level / strength | Node shape | Edge line       |
//! |------------------|------------|-----------------|
//! | Required         | oval       | solid           |
//! | Recommended      | box        | dashed, gray    |
//! | Suggested        | octagon    | dotted, gray    |
//!
//! A fixed legend cluster explains the encoding. The description serializes
//! to Graphviz DOT via `Display` and to JSON via serde.

use crate::config::RenderConfig;
use crate::domain::{DependencyStrength, LevelMap};
use crate::error::Result;
use crate::graph::DependencyGraph;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Shape of a package node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    /// Required packages
    Oval,
    /// Recommended packages
    Box,
    /// Suggested packages
    Octagon,
}

impl NodeShape {
    /// Shape for a package at `level`.
    #[must_use]
    pub fn for_level(level: DependencyStrength) -> Self {
        match level {
            DependencyStrength::Required => NodeShape::Oval,
            DependencyStrength::Recommended => NodeShape::Box,
            DependencyStrength::Suggested => NodeShape::Octagon,
        }
    }

    fn as_dot(self) -> &'static str {
        match self {
            NodeShape::Oval => "oval",
            NodeShape::Box => "box",
            NodeShape::Octagon => "octagon",
        }
    }
}

/// Line style of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Required dependencies
    Solid,
    /// Recommended dependencies
    Dashed,
    /// Suggested dependencies
    Dotted,
    /// Layout-only edges in the legend
    Invis,
}

impl LineStyle {
    fn as_dot(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
            LineStyle::Invis => "invis",
        }
    }
}

/// Visual style of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeStyle {
    /// Line pattern
    pub line: LineStyle,
    /// Line color, Graphviz default when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

impl EdgeStyle {
    /// Style for an edge of `strength`.
    #[must_use]
    pub fn for_strength(strength: DependencyStrength) -> Self {
        match strength {
            DependencyStrength::Required => Self {
                line: LineStyle::Solid,
                color: None,
            },
            DependencyStrength::Recommended => Self {
                line: LineStyle::Dashed,
                color: Some("gray"),
            },
            DependencyStrength::Suggested => Self {
                line: LineStyle::Dotted,
                color: Some("gray"),
            },
        }
    }

    fn invisible() -> Self {
        Self {
            line: LineStyle::Invis,
            color: None,
        }
    }
}

/// A node in the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Unique node id (the package name for data nodes)
    pub id: String,
    /// Display label when it differs from the id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Node shape; Graphviz default when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<NodeShape>,
}

/// A directed edge in the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Visual style
    pub style: EdgeStyle,
    /// Edge label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The fixed legend subgraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    /// Subgraph name; the `cluster_` prefix makes Graphviz draw a frame
    pub name: String,
    /// Frame title
    pub label: String,
    /// Legend nodes
    pub nodes: Vec<Node>,
    /// Legend edges
    pub edges: Vec<Edge>,
    /// Node ids pinned to the first rank
    pub rank_min: Vec<String>,
    /// Node ids pinned to the last rank
    pub rank_max: Vec<String>,
}

/// Complete graph description handed to the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphDescription {
    /// Graph comment
    pub title: String,
    /// Graphviz `rankdir`
    pub rankdir: String,
    /// One node per package
    pub nodes: Vec<Node>,
    /// One edge per dependency
    pub edges: Vec<Edge>,
    /// Style legend
    pub legend: Legend,
}

impl GraphDescription {
    /// Serialize as Graphviz DOT.
    #[must_use]
    pub fn to_dot(&self) -> String {
        self.to_string()
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find a data node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Builds graph descriptions with a given layout.
#[derive(Debug, Clone)]
pub struct Renderer {
    title: String,
    rankdir: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl Renderer {
    /// Create a renderer from the render configuration
    #[must_use]
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            title: config.title.clone(),
            rankdir: config.rankdir.clone(),
        }
    }

    /// Describe the dependency map.
    ///
    /// Every edge whose endpoints both have a level is emitted once, styled
    /// by strength; each endpoint is emitted once as a node shaped by its
    /// level. Edges touching an unleveled package are left out.
    #[must_use]
    pub fn render(&self, graph: &DependencyGraph, levels: &LevelMap) -> GraphDescription {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut emitted: HashSet<&str> = HashSet::new();

        for (from, to, strength) in graph.edges() {
            let (Some(&from_level), Some(&to_level)) = (levels.get(from), levels.get(to)) else {
                tracing::debug!(from = %from, to = %to, "Skipping edge outside the reachable set");
                continue;
            };

            for (name, level) in [(from, from_level), (to, to_level)] {
                if emitted.insert(name.as_str()) {
                    nodes.push(Node {
                        id: name.to_string(),
                        label: None,
                        shape: Some(NodeShape::for_level(level)),
                    });
                }
            }

            edges.push(Edge {
                source: from.to_string(),
                target: to.to_string(),
                style: EdgeStyle::for_strength(strength),
                label: None,
            });
        }

        GraphDescription {
            title: self.title.clone(),
            rankdir: self.rankdir.clone(),
            nodes,
            edges,
            legend: legend(),
        }
    }
}

/// Describe the dependency map with the default layout.
#[must_use]
pub fn render(graph: &DependencyGraph, levels: &LevelMap) -> GraphDescription {
    Renderer::default().render(graph, levels)
}

/// Build the legend cluster.
///
/// Three level nodes stacked with invisible edges, and one labelled example
/// edge per dependency strength. Ids are prefixed so they never collide with
/// package names.
#[must_use]
pub fn legend() -> Legend {
    use DependencyStrength::{Recommended, Required, Suggested};

    let level_node = |id: &str, label: &str, level| Node {
        id: id.to_string(),
        label: Some(label.to_string()),
        shape: Some(NodeShape::for_level(level)),
    };

    let mut nodes = vec![
        level_node("legend_sp", "Suggested Package", Suggested),
        level_node("legend_dp", "Required Package", Required),
        level_node("legend_rp", "Recommended Package", Recommended),
    ];
    let mut edges = vec![
        Edge {
            source: "legend_sp".to_string(),
            target: "legend_rp".to_string(),
            style: EdgeStyle::invisible(),
            label: None,
        },
        Edge {
            source: "legend_rp".to_string(),
            target: "legend_dp".to_string(),
            style: EdgeStyle::invisible(),
            label: None,
        },
    ];
    let mut rank_min = vec!["legend_sp".to_string()];
    let mut rank_max = vec!["legend_dp".to_string()];

    let examples = [
        ("Depends", Required),
        ("Recommends", Recommended),
        ("Suggests", Suggested),
    ];
    for (index, (label, strength)) in examples.into_iter().enumerate() {
        let from = format!("legend_{}", index * 2);
        let to = format!("legend_{}", index * 2 + 1);

        nodes.push(Node {
            id: from.clone(),
            label: Some("package_1".to_string()),
            shape: None,
        });
        nodes.push(Node {
            id: to.clone(),
            label: Some("package_2".to_string()),
            shape: Some(NodeShape::for_level(strength)),
        });
        edges.push(Edge {
            source: from.clone(),
            target: to.clone(),
            style: EdgeStyle::for_strength(strength),
            label: Some(label.to_string()),
        });
        rank_min.push(from);
        rank_max.push(to);
    }

    Legend {
        name: "cluster_0".to_string(),
        label: "Legends".to_string(),
        nodes,
        edges,
        rank_min,
        rank_max,
    }
}

// ============================================================================
// DOT serialization
// ============================================================================

/// Quote a DOT identifier.
fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

fn write_node(f: &mut fmt::Formatter<'_>, indent: &str, node: &Node) -> fmt::Result {
    let mut attrs = Vec::new();
    if let Some(label) = &node.label {
        attrs.push(format!("label={}", quote(label)));
    }
    if let Some(shape) = node.shape {
        attrs.push(format!("shape={}", shape.as_dot()));
    }

    if attrs.is_empty() {
        writeln!(f, "{indent}{}", quote(&node.id))
    } else {
        writeln!(f, "{indent}{} [{}]", quote(&node.id), attrs.join(" "))
    }
}

fn write_edge(f: &mut fmt::Formatter<'_>, indent: &str, edge: &Edge) -> fmt::Result {
    let mut attrs = Vec::new();
    if let Some(label) = &edge.label {
        attrs.push(format!("label={}", quote(label)));
    }
    attrs.push(format!("style={}", edge.style.line.as_dot()));
    if let Some(color) = edge.style.color {
        attrs.push(format!("color={color}"));
    }

    writeln!(
        f,
        "{indent}{} -> {} [{}]",
        quote(&edge.source),
        quote(&edge.target),
        attrs.join(" ")
    )
}

fn write_rank(
    f: &mut fmt::Formatter<'_>,
    indent: &str,
    rank: &str,
    ids: &[String],
) -> fmt::Result {
    let ids: Vec<String> = ids.iter().map(String::as_str).map(quote).collect();
    writeln!(f, "{indent}{{rank={rank}; {}}}", ids.join("; "))
}

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\tsubgraph {} {{", self.name)?;
        writeln!(f, "\t\tlabel={}", quote(&self.label))?;
        writeln!(f, "\t\tshape=rectangle")?;
        for node in &self.nodes {
            write_node(f, "\t\t", node)?;
        }
        for edge in &self.edges {
            write_edge(f, "\t\t", edge)?;
        }
        write_rank(f, "\t\t", "min", &self.rank_min)?;
        write_rank(f, "\t\t", "max", &self.rank_max)?;
        writeln!(f, "\t}}")
    }
}

impl fmt::Display for GraphDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "// {}", self.title)?;
        writeln!(f, "digraph {{")?;
        writeln!(f, "\trankdir={}", self.rankdir)?;
        for node in &self.nodes {
            write_node(f, "\t", node)?;
        }
        for edge in &self.edges {
            write_edge(f, "\t", edge)?;
        }
        write!(f, "{}", self.legend)?;
        writeln!(f, "}}")
    }
}
