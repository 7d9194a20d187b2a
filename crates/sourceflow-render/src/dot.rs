//! Graphviz DOT text.
//!
//! Same three diagrams as the Mermaid output. Node ids come from
//! [`NodeIds`], quoted; labels carry the readable names.

use crate::{base_name, NodeIds};
use sourceflow_graph::{AnalysisSummary, Selection};
use std::collections::HashSet;

const ENTRY_FILL: &str = "#a6e3a1";
const NODE_FILL: &str = "#89b4fa";
const FILE_FILL: &str = "#f9e2af";

fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn header(name: &str, rankdir: &str) -> Vec<String> {
    vec![
        format!("digraph {} {{", name),
        format!("    rankdir={};", rankdir),
        "    node [shape=box, style=filled, fontname=\"Helvetica\", fontsize=12];".to_string(),
        "    edge [fontname=\"Helvetica\", fontsize=10];".to_string(),
    ]
}

fn no_data(name: &str, message: &str) -> String {
    let mut lines = header(name, "TB");
    lines.push(format!(
        "    noData [label=\"{}\", shape=note];",
        escape_label(message)
    ));
    lines.push("}".to_string());
    lines.join("\n")
}

fn function_node(id: &str, name: &str, entry: bool) -> String {
    if entry {
        format!(
            "\"{}\" [label=\"{}\", shape=doublecircle, fillcolor=\"{}\"];",
            escape_label(id),
            escape_label(name),
            ENTRY_FILL
        )
    } else {
        format!(
            "\"{}\" [label=\"{}\", fillcolor=\"{}\"];",
            escape_label(id),
            escape_label(name),
            NODE_FILL
        )
    }
}

pub(crate) fn functions(summary: &AnalysisSummary, selection: &Selection) -> String {
    if summary.function_details.is_empty() && summary.file_functions.is_empty() {
        return no_data("code_structure", "No function data available");
    }

    let mut lines = header("code_structure", "TB");
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

        lines.push(String::new());
        lines.push(format!("    subgraph \"cluster_{}\" {{", escape_label(&ids.group(file))));
        lines.push(format!("        label=\"{}\";", escape_label(base_name(file))));
        for func in members {
            lines.push(format!(
                "        {}",
                function_node(&ids.node(func), func, summary.is_entry_point(func))
            ));
        }
        lines.push("    }".to_string());
    }

    lines.push(String::new());
    for edge in &selection.edges {
        lines.push(format!(
            "    \"{}\" -> \"{}\";",
            escape_label(&ids.node(&edge.source)),
            escape_label(&ids.node(&edge.target))
        ));
    }

    lines.push("}".to_string());
    lines.join("\n")
}

pub(crate) fn dependencies(summary: &AnalysisSummary, selection: &Selection) -> String {
    if summary.file_summaries.is_empty() {
        return no_data("code_dependencies", "No file dependency data available");
    }

    let mut lines = header("code_dependencies", "LR");
    let mut ids = NodeIds::default();
    for file in &selection.nodes {
        lines.push(format!(
            "    \"{}\" [label=\"{}\", shape=folder, fillcolor=\"{}\"];",
            escape_label(&ids.node(file)),
            escape_label(base_name(file)),
            FILE_FILL
        ));
    }

    lines.push(String::new());
    for edge in &selection.edges {
        lines.push(format!(
            "    \"{}\" -> \"{}\" [style=dashed];",
            escape_label(&ids.node(&edge.source)),
            escape_label(&ids.node(&edge.target))
        ));
    }

    lines.push("}".to_string());
    lines.join("\n")
}

pub(crate) fn execution_paths(summary: &AnalysisSummary) -> String {
    if summary.entry_point_paths.is_empty() {
        return no_data("execution_paths", "No execution path data available");
    }

    let mut lines = header("execution_paths", "LR");
    let mut ids = NodeIds::default();
    for (i, path) in summary.entry_point_paths.iter().enumerate() {
        if path.is_empty() {
            continue;
        }

        lines.push(String::new());
        lines.push(format!("    subgraph cluster_path_{} {{", i));
        lines.push(format!("        label=\"Path {}\";", i));

        let path_ids: Vec<String> = path.iter().map(|func| ids.path_node(i, func)).collect();
        for (j, (id, func)) in path_ids.iter().zip(path).enumerate() {
            lines.push(format!("        {}", function_node(id, func, j == 0)));
        }
        for pair in path_ids.windows(2) {
            lines.push(format!(
                "        \"{}\" -> \"{}\" [penwidth=2];",
                escape_label(&pair[0]),
                escape_label(&pair[1])
            ));
        }
        lines.push("    }".to_string());
    }

    lines.push("}".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use crate::{render, DiagramKind, Format, RenderOptions};
    use sourceflow_core::{FileAnalysis, FunctionEntry};
    use sourceflow_graph::{AnalysisSummary, RelationshipBuilder};

    fn example() -> AnalysisSummary {
        let mut builder = RelationshipBuilder::new();
        builder.add_file_analysis(
            "src/a.py",
            &FileAnalysis::default()
                .with_function(FunctionEntry::new("main", vec!["helper".into()]))
                .with_entry_point("main"),
        );
        builder.add_file_analysis(
            "src/b.py",
            &FileAnalysis::default().with_function(FunctionEntry::new("say \"hi\"", vec![])),
        );
        builder.add_file_analysis(
            "src/c.py",
            &FileAnalysis::default()
                .with_function(FunctionEntry::new("helper", vec![]))
                .with_dependency("src/b.py"),
        );
        builder.summary()
    }

    #[test]
    fn test_function_diagram() {
        let dot = render(
            &example(),
            DiagramKind::Functions,
            Format::Dot,
            &RenderOptions::default(),
        );
        assert!(dot.starts_with("digraph code_structure {"));
        assert!(dot.contains("subgraph \"cluster_src_a_py\" {"));
        assert!(dot.contains("label=\"a.py\";"));
        assert!(dot.contains("\"main\" [label=\"main\", shape=doublecircle"));
        assert!(dot.contains("label=\"say \\\"hi\\\"\""));
        assert!(dot.contains("\"main\" -> \"helper\";"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn test_dependency_diagram_is_dashed() {
        let dot = render(
            &example(),
            DiagramKind::Dependencies,
            Format::Dot,
            &RenderOptions::default(),
        );
        assert!(dot.contains("rankdir=LR;"));
        assert!(dot.contains("\"src_a_py\" -> \"src_c_py\" [style=dashed];"));
        assert!(dot.contains("\"src_c_py\" -> \"src_b_py\" [style=dashed];"));
    }

    #[test]
    fn test_execution_paths_diagram() {
        let dot = render(
            &example(),
            DiagramKind::ExecutionPaths,
            Format::Dot,
            &RenderOptions::default(),
        );
        assert!(dot.contains("subgraph cluster_path_0 {"));
        assert!(dot.contains("\"main_0\" [label=\"main\", shape=doublecircle"));
        assert!(dot.contains("\"main_0\" -> \"helper_0\" [penwidth=2];"));
    }

    #[test]
    fn test_function_named_like_file_keeps_own_node() {
        let mut builder = RelationshipBuilder::new();
        builder.add_file_analysis(
            "app.py",
            &FileAnalysis::default()
                .with_function(FunctionEntry::new("app_py", vec!["a_b".into()]))
                .with_function(FunctionEntry::new("a_b", vec![]))
                .with_function(FunctionEntry::new("a.b", vec![])),
        );

        let dot = render(
            &builder.summary(),
            DiagramKind::Functions,
            Format::Dot,
            &RenderOptions::default(),
        );
        assert!(dot.contains("subgraph \"cluster_app_py\" {"));
        assert!(dot.contains("\"app_py_2\" [label=\"app_py\""));
        assert!(dot.contains("\"a_b\" [label=\"a_b\""));
        assert!(dot.contains("\"a_b_2\" [label=\"a.b\""));
        assert!(dot.contains("\"app_py_2\" -> \"a_b\";"));
    }

    #[test]
    fn test_empty_summary_has_placeholder() {
        let empty = AnalysisSummary::default();
        for kind in DiagramKind::ALL {
            let dot = render(&empty, kind, Format::Dot, &RenderOptions::default());
            assert!(dot.contains("noData [label="));
        }
    }
}
