//! The record store.
//!
//! Holds one `FunctionRecord` per bare identifier, in ingestion order, plus
//! the reverse call graph. The forward call graph is the records' own call
//! lists: an entry is a graph edge only while its target is a known record.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sourceflow_core::FunctionEntry;
use tracing::warn;

/// Everything known about one function, as exported in summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionRecord {
    pub description: String,
    pub inputs: String,
    pub outputs: String,
    /// Called identifiers in analyzer order, resolvable or not.
    pub calls: Vec<String>,
    /// The file that reported this record.
    pub file_path: String,
}

impl FunctionRecord {
    fn from_entry(file_path: &str, entry: &FunctionEntry) -> Self {
        Self {
            description: entry.description.clone(),
            inputs: entry.inputs.clone(),
            outputs: entry.outputs.clone(),
            calls: entry.calls.clone(),
            file_path: file_path.to_string(),
        }
    }
}

/// Two files reported the same bare identifier; the later one won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub name: String,
    pub previous_file: String,
    pub file: String,
}

/// Function records keyed by bare identifier.
///
/// Identifiers are not unique across files. A later record for a known name
/// replaces the earlier one (last write wins) and keeps its position in
/// iteration order. Replacements that change the owning file are kept in
/// [`RecordStore::collisions`] so the ambiguity is visible.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: IndexMap<String, FunctionRecord>,
    /// callee -> callers, one entry per call-list occurrence.
    ///
    /// Keys need not be known records: an edge to a not-yet-ingested callee
    /// becomes valid once that callee shows up.
    reverse_calls: IndexMap<String, Vec<String>>,
    collisions: Vec<Collision>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the function entries reported for one file.
    pub fn ingest(&mut self, file_path: &str, functions: &[FunctionEntry]) {
        for entry in functions {
            self.insert(file_path, entry);
        }
    }

    /// Inserts or overwrites a single record.
    pub fn insert(&mut self, file_path: &str, entry: &FunctionEntry) {
        let record = FunctionRecord::from_entry(file_path, entry);
        let name = entry.name.clone();

        if let Some(previous) = self.records.insert(name.clone(), record) {
            if previous.file_path != file_path {
                warn!(
                    "Function '{}' from {} replaces the one from {}",
                    name, file_path, previous.file_path
                );
                self.collisions.push(Collision {
                    name: name.clone(),
                    previous_file: previous.file_path.clone(),
                    file: file_path.to_string(),
                });
            }
            self.retract_callers(&name, &previous.calls);
        }

        for callee in &entry.calls {
            self.reverse_calls
                .entry(callee.clone())
                .or_default()
                .push(name.clone());
        }
    }

    /// Removes one caller occurrence per call in `calls`.
    fn retract_callers(&mut self, caller: &str, calls: &[String]) {
        for callee in calls {
            if let Some(callers) = self.reverse_calls.get_mut(callee) {
                if let Some(pos) = callers.iter().position(|c| c == caller) {
                    callers.remove(pos);
                }
            }
        }
    }

    /// Gets the current record for an identifier.
    pub fn get(&self, name: &str) -> Option<&FunctionRecord> {
        self.records.get(name)
    }

    /// True if the identifier resolves to a record.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Identifiers whose current record is owned by `file_path`.
    pub fn identifiers_owned_by<'a>(&'a self, file_path: &'a str) -> impl Iterator<Item = &'a str> {
        self.records
            .iter()
            .filter(move |(_, record)| record.file_path == file_path)
            .map(|(name, _)| name.as_str())
    }

    /// Raw call list as reported, including unresolved names.
    pub fn callees(&self, name: &str) -> &[String] {
        self.records
            .get(name)
            .map(|record| record.calls.as_slice())
            .unwrap_or_default()
    }

    /// Call-list entries that resolve to known records, in call-list order.
    pub fn resolved_callees<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.callees(name)
            .iter()
            .map(String::as_str)
            .filter(move |callee| self.contains(callee))
    }

    /// Functions whose call lists mention `name`.
    pub fn callers(&self, name: &str) -> &[String] {
        self.reverse_calls
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates records in ingestion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FunctionRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Access to the underlying ordered map.
    pub fn records(&self) -> &IndexMap<String, FunctionRecord> {
        &self.records
    }

    /// Same-name replacements across files, in the order they happened.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
