//! SourceFlow Render - Diagram text from analysis summaries
//!
//! Three diagrams are produced from one [`AnalysisSummary`]:
//! - function calls, grouped by file
//! - file dependencies
//! - execution paths from entry points
//!
//! Each can be emitted as Mermaid or Graphviz DOT. The first two are passed
//! through [`ImportanceRanker`] first, each with its own node and edge set,
//! so a `max_nodes` budget keeps large projects readable.

mod dot;
mod mermaid;

use sourceflow_graph::{AnalysisSummary, ImportanceRanker, Selection};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Which diagram to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Functions,
    Dependencies,
    ExecutionPaths,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 3] = [
        DiagramKind::Functions,
        DiagramKind::Dependencies,
        DiagramKind::ExecutionPaths,
    ];

    /// Output file name without extension.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Functions => "code_structure",
            Self::Dependencies => "code_dependencies",
            Self::ExecutionPaths => "execution_paths",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Functions => "function call",
            Self::Dependencies => "dependency",
            Self::ExecutionPaths => "execution path",
        };
        write!(f, "{}", s)
    }
}

/// Output text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Mermaid,
    Dot,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mermaid => "mmd",
            Self::Dot => "dot",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mermaid" | "mmd" => Ok(Self::Mermaid),
            "dot" | "graphviz" => Ok(Self::Dot),
            other => Err(format!("unknown format '{}' (expected mermaid or dot)", other)),
        }
    }
}

/// Knobs shared by all diagrams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Node budget for the function and dependency diagrams.
    pub max_nodes: Option<usize>,
    pub entry_point_bonus: usize,
}

impl RenderOptions {
    fn ranker(&self) -> ImportanceRanker {
        ImportanceRanker::new(self.entry_point_bonus)
    }
}

/// Renders one diagram as text.
pub fn render(
    summary: &AnalysisSummary,
    kind: DiagramKind,
    format: Format,
    options: &RenderOptions,
) -> String {
    match (kind, format) {
        (DiagramKind::Functions, Format::Mermaid) => {
            mermaid::functions(summary, &function_selection(summary, options))
        }
        (DiagramKind::Functions, Format::Dot) => {
            dot::functions(summary, &function_selection(summary, options))
        }
        (DiagramKind::Dependencies, Format::Mermaid) => {
            mermaid::dependencies(summary, &file_selection(summary, options))
        }
        (DiagramKind::Dependencies, Format::Dot) => {
            dot::dependencies(summary, &file_selection(summary, options))
        }
        (DiagramKind::ExecutionPaths, Format::Mermaid) => mermaid::execution_paths(summary),
        (DiagramKind::ExecutionPaths, Format::Dot) => dot::execution_paths(summary),
    }
}

fn function_selection(summary: &AnalysisSummary, options: &RenderOptions) -> Selection {
    let view = summary.function_view();
    let selection =
        options
            .ranker()
            .select(&view.nodes, &view.edges, &summary.entry_points, options.max_nodes);
    debug!(
        "Function diagram: {} of {} nodes, {} edges",
        selection.nodes.len(),
        view.nodes.len(),
        selection.edges.len()
    );
    selection
}

fn file_selection(summary: &AnalysisSummary, options: &RenderOptions) -> Selection {
    let view = summary.file_view();
    // Files are never entry points; the bonus only matters for functions.
    let selection = options
        .ranker()
        .select(&view.nodes, &view.edges, &[], options.max_nodes);
    debug!(
        "Dependency diagram: {} of {} files, {} edges",
        selection.nodes.len(),
        view.nodes.len(),
        selection.edges.len()
    );
    selection
}

/// Turns a function or file name into a diagram-safe identifier.
pub fn sanitize_id(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '.' | '/' | '\\' | ':' | ' ' | '-' => '_',
            other => other,
        })
        .collect();

    match sanitized.chars().next() {
        Some(first) if !first.is_alphabetic() => format!("n_{}", sanitized),
        _ => sanitized,
    }
}

/// Words Mermaid treats as syntax when they appear as a bare node id.
const RESERVED_IDS: &[&str] = &[
    "end", "graph", "subgraph", "flowchart", "direction", "style", "class", "classdef",
    "linkstyle", "click", "call", "href", "default",
];

/// Assigns one diagram-safe id per name within a diagram.
///
/// Names that sanitize to the same text, or to a reserved word, still get
/// distinct ids. File groups and function nodes share one id space.
#[derive(Debug, Default)]
pub(crate) struct NodeIds {
    assigned: HashMap<(Scope, String), String>,
    taken: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Scope {
    Node,
    Group,
    Path(usize),
}

impl NodeIds {
    pub(crate) fn node(&mut self, name: &str) -> String {
        self.assign(Scope::Node, name, sanitize_id(name))
    }

    pub(crate) fn group(&mut self, name: &str) -> String {
        self.assign(Scope::Group, name, sanitize_id(name))
    }

    /// Node of the `path`-th execution path, suffixed with its index.
    pub(crate) fn path_node(&mut self, path: usize, name: &str) -> String {
        self.assign(
            Scope::Path(path),
            name,
            format!("{}_{}", sanitize_id(name), path),
        )
    }

    fn assign(&mut self, scope: Scope, name: &str, base: String) -> String {
        let key = (scope, name.to_string());
        if let Some(id) = self.assigned.get(&key) {
            return id.clone();
        }

        let base = if base.is_empty() || RESERVED_IDS.contains(&base.to_lowercase().as_str()) {
            format!("n_{}", base)
        } else {
            base
        };
        let mut id = base.clone();
        let mut n = 2;
        while self.taken.contains(&id) {
            id = format!("{}_{}", base, n);
            n += 1;
        }

        self.taken.insert(id.clone());
        self.assigned.insert(key, id.clone());
        id
    }
}

/// Last path component, for labels.
pub(crate) fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
