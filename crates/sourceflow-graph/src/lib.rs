//! SourceFlow Graph - Cross-file code knowledge graph
//!
//! This crate turns per-file analysis records into a queryable graph:
//! a call graph, its reverse, a file dependency index and a set of execution
//! paths rooted at declared entry points. It also ranks nodes by
//! connectivity so diagrams can be limited to the most important ones.
//!
//! # Architecture
//!
//! Everything is owned by a single [`RelationshipBuilder`]:
//! - [`RecordStore`] holds one record per bare identifier, in ingestion order
//! - the call graph is the records' call lists, filtered to known records
//! - [`PathTracer`] and [`ImportanceRanker`] only read
//!
//! Ingestion is sequential and single-threaded. Graph building never fails: bad
//! input is repaired upstream, unresolved calls are simply not edges.
//!
//! # Example
//!
//! ```
//! use sourceflow_core::{FileAnalysis, FunctionEntry};
//! use sourceflow_graph::RelationshipBuilder;
//!
//! let mut builder = RelationshipBuilder::new();
//! builder.add_file_analysis(
//!     "a.py",
//!     &FileAnalysis::default()
//!         .with_function(FunctionEntry::new("main", vec!["helper".into()]))
//!         .with_entry_point("main"),
//! );
//! builder.add_file_analysis(
//!     "b.py",
//!     &FileAnalysis::default().with_function(FunctionEntry::new("helper", vec![])),
//! );
//!
//! let summary = builder.summary();
//! assert_eq!(summary.entry_point_paths, vec![vec!["main", "helper"]]);
//! ```

mod builder;
mod cache;
mod dependencies;
mod edge;
mod path;
mod ranking;
mod records;
mod summary;

pub use builder::RelationshipBuilder;
pub use cache::{AnalysisCache, CacheError, RecordStamp};
pub use dependencies::{derive_file_dependencies, FileDependencyIndex};
pub use edge::{EdgeKind, GraphEdge};
pub use path::{ExecutionPath, PathTracer};
pub use ranking::{ImportanceRanker, RankedNode, Selection};
pub use records::{Collision, FunctionRecord, RecordStore};
pub use summary::{AnalysisSummary, GraphView};
