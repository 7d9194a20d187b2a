//! Edge types for the knowledge graph views.
//!
//! The summary stores adjacency lists; renderers and the ranker work on flat
//! edge lists instead. These are the types they exchange.

use serde::{Deserialize, Serialize};

/// The type of relationship an edge stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Function A calls function B.
    Calls,

    /// File A depends on file B.
    DependsOn,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Calls => "calls",
            Self::DependsOn => "depends_on",
        };
        write!(f, "{}", s)
    }
}

/// A directed edge between two named nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl GraphEdge {
    /// Creates a call edge.
    pub fn calls(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Calls,
        }
    }

    /// Creates a file dependency edge.
    pub fn depends_on(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::DependsOn,
        }
    }
}
