//! Importance ranking for size-bounded diagrams.
//!
//! When a graph has more nodes than a diagram can usefully show, we keep the
//! best-connected ones. The score is deliberately simple:
//!
//! ```text
//! score(n) = in_degree(n) + out_degree(n) + (entry_point_bonus if n is an entry point)
//! ```
//!
//! Degrees are counted on the deduplicated edge set restricted to the given
//! nodes. Nodes are ordered by score, descending, with ties kept in input
//! order. That tie rule is part of the contract: the same input order always
//! gives the same selection.

use crate::edge::GraphEdge;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use sourceflow_core::config::DEFAULT_ENTRY_POINT_BONUS;
use std::collections::HashSet;

/// A node with its connectivity score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedNode {
    pub name: String,
    pub score: usize,
}

/// The nodes and edges kept for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub nodes: Vec<String>,
    pub edges: Vec<GraphEdge>,
}

/// Selects the most connected nodes of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportanceRanker {
    pub entry_point_bonus: usize,
}

impl Default for ImportanceRanker {
    fn default() -> Self {
        Self {
            entry_point_bonus: DEFAULT_ENTRY_POINT_BONUS,
        }
    }
}

impl ImportanceRanker {
    pub fn new(entry_point_bonus: usize) -> Self {
        Self { entry_point_bonus }
    }

    /// Scores every node, sorted by score descending (stable).
    pub fn rank(
        &self,
        nodes: &[String],
        edges: &[GraphEdge],
        entry_points: &[String],
    ) -> Vec<RankedNode> {
        let known: HashSet<&str> = nodes.iter().map(String::as_str).collect();
        let entries: HashSet<&str> = entry_points.iter().map(String::as_str).collect();

        // GraphMap collapses repeated (source, target) pairs into one edge.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for node in nodes {
            graph.add_node(node.as_str());
        }
        for edge in edges {
            let (source, target) = (edge.source.as_str(), edge.target.as_str());
            if known.contains(source) && known.contains(target) {
                graph.add_edge(source, target, ());
            }
        }

        let mut ranked: Vec<RankedNode> = nodes
            .iter()
            .map(|node| {
                let name = node.as_str();
                let degree = graph.neighbors_directed(name, Direction::Incoming).count()
                    + graph.neighbors_directed(name, Direction::Outgoing).count();
                let bonus = if entries.contains(name) {
                    self.entry_point_bonus
                } else {
                    0
                };
                RankedNode {
                    name: node.clone(),
                    score: degree + bonus,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// Keeps at most `max_nodes` nodes and the edges between them.
    ///
    /// `None`, `Some(0)` and any budget of at least `nodes.len()` return the
    /// input unchanged. Otherwise the top-scoring nodes are returned in score
    /// order, with the surviving edges deduplicated in input order.
    pub fn select(
        &self,
        nodes: &[String],
        edges: &[GraphEdge],
        entry_points: &[String],
        max_nodes: Option<usize>,
    ) -> Selection {
        let limit = match max_nodes {
            Some(limit) if limit > 0 && limit < nodes.len() => limit,
            _ => {
                return Selection {
                    nodes: nodes.to_vec(),
                    edges: edges.to_vec(),
                }
            }
        };

        let kept: Vec<String> = self
            .rank(nodes, edges, entry_points)
            .into_iter()
            .take(limit)
            .map(|ranked| ranked.name)
            .collect();

        let kept_set: HashSet<&str> = kept.iter().map(String::as_str).collect();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let edges = edges
            .iter()
            .filter(|edge| {
                kept_set.contains(edge.source.as_str())
                    && kept_set.contains(edge.target.as_str())
                    && seen.insert((edge.source.as_str(), edge.target.as_str()))
            })
            .cloned()
            .collect();

        Selection { nodes: kept, edges }
    }
}
