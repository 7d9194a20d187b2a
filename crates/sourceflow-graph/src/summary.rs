//! The analysis summary: the one artifact renderers consume.
//!
//! Field names are the stable interchange format, both for the JSON export
//! and for replay from cache.

use crate::edge::GraphEdge;
use crate::path::ExecutionPath;
use crate::records::FunctionRecord;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Aggregated graph model for a whole project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSummary {
    pub total_files: usize,
    pub total_functions: usize,
    /// Distinct declared dependencies across all files.
    pub total_dependencies: usize,
    pub entry_points: Vec<String>,
    pub function_details: IndexMap<String, FunctionRecord>,
    pub file_functions: IndexMap<String, Vec<String>>,
    /// Call graph restricted to resolvable callees.
    pub function_calls: IndexMap<String, Vec<String>>,
    pub file_dependencies: IndexMap<String, Vec<String>>,
    pub file_summaries: IndexMap<String, String>,
    pub entry_point_paths: Vec<ExecutionPath>,
}

/// Nodes and edges of one diagram, before any size limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphView {
    pub nodes: Vec<String>,
    pub edges: Vec<GraphEdge>,
}

impl AnalysisSummary {
    /// Function call view: every known function, every resolvable call.
    pub fn function_view(&self) -> GraphView {
        let nodes = self.function_details.keys().cloned().collect();
        let edges = distinct_edges(&self.function_calls, |target| {
            self.function_details.contains_key(target)
        })
        .map(|(source, target)| GraphEdge::calls(source, target))
        .collect();
        GraphView { nodes, edges }
    }

    /// File dependency view: analyzed files, dependencies between them.
    ///
    /// Declared dependencies on modules that were never analyzed (`os`,
    /// `serde`, ...) have no node and are left out.
    pub fn file_view(&self) -> GraphView {
        let nodes = self.file_summaries.keys().cloned().collect();
        let edges = distinct_edges(&self.file_dependencies, |target| {
            self.file_summaries.contains_key(target)
        })
        .map(|(source, target)| GraphEdge::depends_on(source, target))
        .collect();
        GraphView { nodes, edges }
    }

    /// File owning the current record for `name`.
    pub fn file_of(&self, name: &str) -> Option<&str> {
        self.function_details
            .get(name)
            .map(|record| record.file_path.as_str())
    }

    pub fn is_entry_point(&self, name: &str) -> bool {
        self.entry_points.iter().any(|entry| entry == name)
    }

    /// Pretty JSON, as written to `analysis_data.json`.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Reads a summary back from JSON. Missing fields default to empty.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Flattens adjacency lists into distinct (source, target) pairs.
fn distinct_edges<'a>(
    adjacency: &'a IndexMap<String, Vec<String>>,
    keep: impl Fn(&str) -> bool + 'a,
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    let mut seen: IndexSet<(&'a str, &'a str)> = IndexSet::new();
    for (source, targets) in adjacency {
        for target in targets {
            if keep(target) {
                seen.insert((source.as_str(), target.as_str()));
            }
        }
    }
    seen.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> AnalysisSummary {
        let mut summary = AnalysisSummary::default();
        for (name, file) in [("main", "a.py"), ("helper", "b.py")] {
            summary.function_details.insert(
                name.to_string(),
                FunctionRecord {
                    file_path: file.to_string(),
                    ..Default::default()
                },
            );
        }
        summary.function_calls.insert(
            "main".to_string(),
            vec!["helper".to_string(), "helper".to_string(), "gone".to_string()],
        );
        summary
            .file_summaries
            .insert("a.py".to_string(), "A".to_string());
        summary
            .file_summaries
            .insert("b.py".to_string(), "B".to_string());
        summary.file_dependencies.insert(
            "a.py".to_string(),
            vec!["os".to_string(), "b.py".to_string()],
        );
        summary.entry_points.push("main".to_string());
        summary
    }

    #[test]
    fn test_function_view_dedupes_and_resolves() {
        let view = summary().function_view();
        assert_eq!(view.nodes, vec!["main", "helper"]);
        assert_eq!(view.edges, vec![GraphEdge::calls("main", "helper")]);
    }

    #[test]
    fn test_file_view_drops_external_modules() {
        let view = summary().file_view();
        assert_eq!(view.nodes, vec!["a.py", "b.py"]);
        assert_eq!(view.edges, vec![GraphEdge::depends_on("a.py", "b.py")]);
    }

    #[test]
    fn test_lookups() {
        let summary = summary();
        assert_eq!(summary.file_of("helper"), Some("b.py"));
        assert_eq!(summary.file_of("nope"), None);
        assert!(summary.is_entry_point("main"));
        assert!(!summary.is_entry_point("helper"));
    }

    #[test]
    fn test_json_preserves_order() {
        let summary = summary();
        let text = summary.to_json_pretty().unwrap();
        assert!(text.find("\"main\"").unwrap() < text.find("\"helper\"").unwrap());
        assert_eq!(AnalysisSummary::from_json(&text).unwrap(), summary);
    }

    #[test]
    fn test_partial_json_defaults() {
        let summary = AnalysisSummary::from_json(r#"{"entry_points": ["main"]}"#).unwrap();
        assert_eq!(summary.entry_points, vec!["main"]);
        assert!(summary.function_details.is_empty());
    }
}
