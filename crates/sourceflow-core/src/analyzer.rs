//! The per-file analysis seam.
//!
//! Producing a `FileAnalysis` from source text is the job of an external
//! analyzer (typically a language model). The graph builder only needs the
//! result, so analyzers plug in behind [`FileAnalyzer`].

use crate::error::{CoreError, Result};
use crate::record::FileAnalysis;
use crate::response::parse_response;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Produces the analysis record for one file.
pub trait FileAnalyzer {
    /// Analyzes `file`, which lives somewhere under `root`.
    fn analyze(&self, root: &Path, file: &Path) -> Result<FileAnalysis>;
}

/// Reads precomputed analyzer responses from a mirror directory.
///
/// The response for `<root>/src/app.py` is expected at
/// `<records_dir>/src/app.py.json`. Its content is the raw analyzer output,
/// fences and all; it goes through [`parse_response`].
#[derive(Debug, Clone)]
pub struct SidecarAnalyzer {
    records_dir: PathBuf,
}

impl SidecarAnalyzer {
    pub fn new(records_dir: impl Into<PathBuf>) -> Self {
        Self {
            records_dir: records_dir.into(),
        }
    }

    /// Where the record for `file` is expected.
    pub fn record_path(&self, root: &Path, file: &Path) -> PathBuf {
        let relative = file.strip_prefix(root).unwrap_or(file);
        let mut name = relative.as_os_str().to_os_string();
        name.push(".json");
        self.records_dir.join(name)
    }
}

impl FileAnalyzer for SidecarAnalyzer {
    fn analyze(&self, root: &Path, file: &Path) -> Result<FileAnalysis> {
        let record = self.record_path(root, file);
        if !record.is_file() {
            return Err(CoreError::MissingRecord {
                file: file.to_path_buf(),
                record,
            });
        }

        debug!("Reading analysis record {}", record.display());
        let text = fs::read_to_string(&record).map_err(|e| CoreError::io(&record, e))?;
        Ok(parse_response(&text))
    }
}
