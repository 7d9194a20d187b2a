//! Mermaid flowchart text.

use crate::{base_name, NodeIds};
use sourceflow_graph::{AnalysisSummary, Selection};
use std::collections::HashSet;

const OPEN: &str = "```mermaid";
const CLOSE: &str = "```";

fn no_data(header: &str, message: &str) -> String {
    [
        OPEN.to_string(),
        header.to_string(),
        format!("  noData[\"{}\"];", message),
        CLOSE.to_string(),
    ]
    .join("\n")
}

/// Mermaid labels cannot contain raw double quotes.
fn label(text: &str) -> String {
    text.replace('"', "#quot;")
}

/// Cylinder for entry points, plain box otherwise.
fn node(id: &str, name: &str, entry: bool) -> String {
    if entry {
        format!("{}[(\"{}\")];", id, label(name))
    } else {
        format!("{}[\"{}\"];", id, label(name))
    }
}

pub(crate) fn functions(summary: &AnalysisSummary, selection: &Selection) -> String {
    if summary.function_details.is_empty() && summary.file_functions.is_empty() {
        return no_data("graph TD;", "No function data available");
    }

    let mut lines = vec![OPEN.to_string(), "graph TD;".to_string()];
    let mut ids = NodeIds::default();
    let selected: HashSet<&str> = selection.nodes.iter().map(String::as_str).collect();

    for (file, functions) in &summary.file_functions {
        let members: Vec<&String> = functions
            .iter()
            .filter(|f| selected.contains(f.as_str()))
            .collect();
        if members.is_empty() {
            continue;
        }

        lines.push(format!(
            "  subgraph {} [\"{}\"]",
            ids.group(file),
            label(base_name(file))
        ));
        for func in members {
            lines.push(format!(
                "    {}",
                node(&ids.node(func), func, summary.is_entry_point(func))
            ));
        }
        lines.push("  end".to_string());
    }

    for edge in &selection.edges {
        lines.push(format!(
            "  {} --> {};",
            ids.node(&edge.source),
            ids.node(&edge.target)
        ));
    }

    lines.push(CLOSE.to_string());
    lines.join("\n")
}

pub(crate) fn dependencies(summary: &AnalysisSummary, selection: &Selection) -> String {
    if summary.file_summaries.is_empty() {
        return no_data("graph LR;", "No file dependency data available");
    }

    let mut lines = vec![OPEN.to_string(), "graph LR;".to_string()];
    let mut ids = NodeIds::default();
    for file in &selection.nodes {
        lines.push(format!(
            "  {}[\"{}\"];",
            ids.node(file),
            label(base_name(file))
        ));
    }
    for edge in &selection.edges {
        lines.push(format!(
            "  {} -.-> {};",
            ids.node(&edge.source),
            ids.node(&edge.target)
        ));
    }

    lines.push(CLOSE.to_string());
    lines.join("\n")
}

pub(crate) fn execution_paths(summary: &AnalysisSummary) -> String {
    if summary.entry_point_paths.is_empty() {
        return no_data("graph LR;", "No execution path data available");
    }

    let mut lines = vec![OPEN.to_string(), "graph LR;".to_string()];
    let mut ids = NodeIds::default();
    for (i, path) in summary.entry_point_paths.iter().enumerate() {
        if path.is_empty() {
            continue;
        }

        lines.push(format!("  subgraph Path_{}", i));
        let path_ids: Vec<String> = path.iter().map(|func| ids.path_node(i, func)).collect();
        for (j, (id, func)) in path_ids.iter().zip(path).enumerate() {
            lines.push(format!("    {}", node(id, func, j == 0)));
        }
        for pair in path_ids.windows(2) {
            lines.push(format!("    {} ===> {};", pair[0], pair[1]));
        }
        lines.push("  end".to_string());
    }

    lines.push(CLOSE.to_string());
    lines.join("\n")
}
