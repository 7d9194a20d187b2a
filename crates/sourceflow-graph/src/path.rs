//! Execution path tracing.
//!
//! From an entry point, follow the first callee that resolves and is not
//! already on the path, until none is left. This yields one plausible main
//! route through the program, not every route.

use crate::records::RecordStore;
use std::collections::HashSet;
use tracing::debug;

/// An ordered chain of identifiers starting at an entry point.
///
/// Adjacent pairs are call edges and no identifier repeats.
pub type ExecutionPath = Vec<String>;

/// Greedy single-path tracer over a record store.
pub struct PathTracer<'a> {
    store: &'a RecordStore,
}

impl<'a> PathTracer<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Traces the path starting at `entry`.
    ///
    /// Callees are considered in call-list order and only if they resolve
    /// to a record. Cycle avoidance is local to this path. An `entry` that
    /// is not itself a record yields an empty path.
    pub fn trace(&self, entry: &str) -> ExecutionPath {
        if !self.store.contains(entry) {
            return Vec::new();
        }

        let mut path = vec![entry.to_string()];
        let mut on_path: HashSet<&str> = HashSet::from([entry]);
        let mut current = entry;

        while let Some(next) = self
            .store
            .resolved_callees(current)
            .find(|callee| !on_path.contains(callee))
        {
            on_path.insert(next);
            path.push(next.to_string());
            current = next;
        }

        debug!("Traced {} steps from {}", path.len(), entry);
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourceflow_core::FunctionEntry;

    fn store(funcs: &[(&str, &[&str])]) -> RecordStore {
        let mut store = RecordStore::new();
        for (name, calls) in funcs {
            let calls = calls.iter().map(|c| c.to_string()).collect();
            store.insert("test.py", &FunctionEntry::new(*name, calls));
        }
        store
    }

    #[test]
    fn test_linear_chain() {
        let store = store(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        assert_eq!(PathTracer::new(&store).trace("a"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_first_resolvable_callee_wins() {
        // "print" is external, so "b" is the first resolvable callee even
        // though "c" would give a longer path.
        let store = store(&[
            ("a", &["print", "b", "c"]),
            ("b", &[]),
            ("c", &["d"]),
            ("d", &[]),
        ]);
        assert_eq!(PathTracer::new(&store).trace("a"), vec!["a", "b"]);
    }

    #[test]
    fn test_cycle_skips_to_next_callee() {
        // a -> b -> a is a cycle; b falls through to c.
        let store = store(&[("a", &["b"]), ("b", &["a", "c"]), ("c", &[])]);
        assert_eq!(PathTracer::new(&store).trace("a"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_self_recursion_terminates() {
        let store = store(&[("loop", &["loop"])]);
        assert_eq!(PathTracer::new(&store).trace("loop"), vec!["loop"]);
    }

    #[test]
    fn test_absent_entry_is_empty() {
        let store = store(&[("a", &[])]);
        assert!(PathTracer::new(&store).trace("missing").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let store = store(&[("a", &["b", "c"]), ("b", &["c"]), ("c", &["a"])]);
        let tracer = PathTracer::new(&store);
        assert_eq!(tracer.trace("a"), tracer.trace("a"));
        assert_eq!(tracer.trace("a"), vec!["a", "b", "c"]);
    }
}
