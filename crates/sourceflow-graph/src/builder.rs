//! Relationship builder: aggregates per-file analyses into one graph.
//!
//! Files are ingested one at a time, fully merged before the next one. Once
//! everything is in, [`RelationshipBuilder::summary`] derives the call graph,
//! file dependencies and execution paths and hands them over as a single
//! serializable value.

use crate::dependencies::{derive_file_dependencies, FileDependencyIndex};
use crate::path::{ExecutionPath, PathTracer};
use crate::records::{Collision, FunctionRecord, RecordStore};
use crate::summary::AnalysisSummary;
use indexmap::{IndexMap, IndexSet};
use sourceflow_core::FileAnalysis;
use tracing::{debug, info};

/// Builds cross-file relationships from analysis records.
#[derive(Debug, Default)]
pub struct RelationshipBuilder {
    store: RecordStore,
    file_summaries: IndexMap<String, String>,
    /// Declared dependencies per file, as reported.
    declared_dependencies: IndexMap<String, Vec<String>>,
    /// Entry points in first-declaration order.
    entry_points: IndexSet<String>,
}

impl RelationshipBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file's analysis results.
    ///
    /// Re-adding a file replaces its summary and declared dependencies and
    /// overwrites its function records.
    pub fn add_file_analysis(&mut self, file_path: &str, analysis: &FileAnalysis) {
        debug!(
            "Ingesting {} ({} functions, {} entry points)",
            file_path,
            analysis.functions.len(),
            analysis.entry_points.len()
        );

        self.file_summaries
            .insert(file_path.to_string(), analysis.summary.clone());
        self.declared_dependencies
            .insert(file_path.to_string(), analysis.dependencies.clone());
        self.entry_points
            .extend(analysis.entry_points.iter().cloned());

        self.store.ingest(file_path, &analysis.functions);
    }

    /// The underlying record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Gets details for a specific function.
    pub fn function_details(&self, name: &str) -> Option<&FunctionRecord> {
        self.store.get(name)
    }

    /// Functions whose current record belongs to `file_path`.
    pub fn functions_by_file(&self, file_path: &str) -> Vec<String> {
        self.store
            .identifiers_owned_by(file_path)
            .map(str::to_string)
            .collect()
    }

    /// Functions that call `name`.
    pub fn callers(&self, name: &str) -> &[String] {
        self.store.callers(name)
    }

    /// Functions `name` calls, as reported.
    pub fn callees(&self, name: &str) -> &[String] {
        self.store.callees(name)
    }

    /// Declared entry points, deduplicated.
    pub fn entry_points(&self) -> impl Iterator<Item = &str> {
        self.entry_points.iter().map(String::as_str)
    }

    /// Same-name replacements across files seen so far.
    pub fn collisions(&self) -> &[Collision] {
        self.store.collisions()
    }

    /// One execution path per entry point that resolves to a record.
    pub fn entry_point_paths(&self) -> Vec<ExecutionPath> {
        let tracer = PathTracer::new(&self.store);
        self.entry_points
            .iter()
            .filter(|entry| self.store.contains(entry))
            .map(|entry| tracer.trace(entry))
            .collect()
    }

    /// Declared plus call-derived file dependencies.
    pub fn file_dependencies(&self) -> FileDependencyIndex {
        derive_file_dependencies(&self.store, &self.declared_dependencies)
    }

    /// Distinct declared dependencies across all files.
    pub fn distinct_dependencies(&self) -> usize {
        self.declared_dependencies
            .values()
            .flatten()
            .collect::<IndexSet<_>>()
            .len()
    }

    /// Assembles the summary handed to renderers.
    pub fn summary(&self) -> AnalysisSummary {
        let mut file_functions: IndexMap<String, Vec<String>> = IndexMap::new();
        for (name, record) in self.store.iter() {
            if !record.file_path.is_empty() {
                file_functions
                    .entry(record.file_path.clone())
                    .or_default()
                    .push(name.to_string());
            }
        }

        let function_calls: IndexMap<String, Vec<String>> = self
            .store
            .iter()
            .filter_map(|(name, _)| {
                let callees: Vec<String> = self
                    .store
                    .resolved_callees(name)
                    .map(str::to_string)
                    .collect();
                (!callees.is_empty()).then(|| (name.to_string(), callees))
            })
            .collect();

        let file_dependencies: IndexMap<String, Vec<String>> = self
            .file_dependencies()
            .into_iter()
            .filter(|(_, deps)| !deps.is_empty())
            .map(|(file, deps)| (file, deps.into_iter().collect()))
            .collect();

        let summary = AnalysisSummary {
            total_files: self.file_summaries.len(),
            total_functions: self.store.len(),
            total_dependencies: self.distinct_dependencies(),
            entry_points: self.entry_points.iter().cloned().collect(),
            function_details: self.store.records().clone(),
            file_functions,
            function_calls,
            file_dependencies,
            file_summaries: self.file_summaries.clone(),
            entry_point_paths: self.entry_point_paths(),
        };

        info!(
            "Built summary: {} files, {} functions, {} execution paths",
            summary.total_files,
            summary.total_functions,
            summary.entry_point_paths.len()
        );
        summary
    }
}
