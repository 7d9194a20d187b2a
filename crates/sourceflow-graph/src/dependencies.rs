//! File dependency derivation.
//!
//! A file depends on another if it says so (declared dependencies from the
//! analyzer) or if one of its functions calls a function owned by the other.
//! The two sources are unioned: a declaration is never dropped because the
//! call graph does not confirm it.

use crate::records::RecordStore;
use indexmap::{IndexMap, IndexSet};

/// file -> files (or declared module names) it depends on.
pub type FileDependencyIndex = IndexMap<String, IndexSet<String>>;

/// Builds the file dependency index.
///
/// Declared dependencies come first, in declaration order, followed by
/// call-derived ones in record order. Self-references are dropped from both.
pub fn derive_file_dependencies(
    store: &RecordStore,
    declared: &IndexMap<String, Vec<String>>,
) -> FileDependencyIndex {
    let mut index = FileDependencyIndex::new();

    for (file, deps) in declared {
        let entry = index.entry(file.clone()).or_default();
        for dep in deps {
            if dep != file {
                entry.insert(dep.clone());
            }
        }
    }

    for (name, record) in store.iter() {
        for callee in store.resolved_callees(name) {
            let Some(target) = store.get(callee) else {
                continue;
            };
            if target.file_path != record.file_path {
                index
                    .entry(record.file_path.clone())
                    .or_default()
                    .insert(target.file_path.clone());
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourceflow_core::FunctionEntry;

    fn func(name: &str, calls: &[&str]) -> FunctionEntry {
        FunctionEntry::new(name, calls.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_call_derived_dependency() {
        let mut store = RecordStore::new();
        store.ingest("a.py", &[func("main", &["helper", "local"]), func("local", &[])]);
        store.ingest("b.py", &[func("helper", &[])]);

        let index = derive_file_dependencies(&store, &IndexMap::new());
        assert_eq!(index.len(), 1);
        assert_eq!(index["a.py"].iter().collect::<Vec<_>>(), vec!["b.py"]);
    }

    #[test]
    fn test_declared_dependencies_are_kept() {
        let store = RecordStore::new();
        let mut declared = IndexMap::new();
        declared.insert(
            "a.py".to_string(),
            vec!["os".to_string(), "a.py".to_string(), "c.py".to_string(), "os".to_string()],
        );

        let index = derive_file_dependencies(&store, &declared);
        let deps: Vec<&String> = index["a.py"].iter().collect();
        assert_eq!(deps, vec!["os", "c.py"]);
    }

    #[test]
    fn test_union_of_declared_and_derived() {
        let mut store = RecordStore::new();
        store.ingest("a.py", &[func("main", &["helper"])]);
        store.ingest("b.py", &[func("helper", &[])]);

        let mut declared = IndexMap::new();
        declared.insert("a.py".to_string(), vec!["json".to_string(), "b.py".to_string()]);

        let index = derive_file_dependencies(&store, &declared);
        let deps: Vec<&String> = index["a.py"].iter().collect();
        assert_eq!(deps, vec!["json", "b.py"]);
    }

    #[test]
    fn test_no_self_dependency() {
        let mut store = RecordStore::new();
        store.ingest("a.py", &[func("f", &["g", "f"]), func("g", &[])]);

        let index = derive_file_dependencies(&store, &IndexMap::new());
        assert!(index.get("a.py").map_or(true, |deps| deps.is_empty()));
    }
}
