//! SourceFlow Core - Analysis records and project discovery
//!
//! This crate holds everything that happens before the knowledge graph is
//! built: finding code files, obtaining a per-file analysis record for each
//! of them, and decoding those records into typed values.
//!
//! # Pipeline
//!
//! ```text
//! DirectoryExplorer ──► FileAnalyzer ──► FileAnalysis ──► (sourceflow-graph)
//!     (walkdir)        (sidecar/LLM)    (lenient decode)
//! ```
//!
//! Decoding never fails. Analyzer output is produced by a language model and
//! is routinely partial, so every missing or garbled field falls back to an
//! empty value instead of rejecting the record.
//!
//! # Example
//!
//! ```
//! use sourceflow_core::parse_response;
//!
//! let analysis = parse_response(r#"{"functions": [{"name": "main", "calls": ["run"]}]}"#);
//! assert_eq!(analysis.functions[0].calls, vec!["run".to_string()]);
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod explorer;
pub mod record;
pub mod response;

pub use analyzer::{FileAnalyzer, SidecarAnalyzer};
pub use config::Config;
pub use error::{CoreError, Result};
pub use explorer::DirectoryExplorer;
pub use record::{FileAnalysis, FunctionEntry, UNKNOWN_NAME};
pub use response::parse_response;
