//! Analysis cache keyed by the state of its inputs.
//!
//! Each analyzed file contributes a [`RecordStamp`] describing the record it
//! was built from. A cached summary is only handed back when the stamps of
//! the current run match the ones it was stored with, so editing, adding or
//! removing a record forces a fresh merge.

use crate::summary::AnalysisSummary;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;
use thiserror::Error;
use tracing::debug;

const STAMPS_KEY: &str = "stamps";
const SUMMARY_KEY: &str = "summary";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache database error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Cache encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Size and modification time of one file's analysis record.
///
/// `record` is `None` when the record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStamp {
    pub file: String,
    pub record: Option<(u64, u64)>,
}

impl RecordStamp {
    /// Stamps `file` with the current metadata of `record_path`.
    pub fn of(file: impl Into<String>, record_path: &Path) -> Self {
        let record = fs::metadata(record_path).ok().map(|meta| {
            let modified = meta
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map(|age| age.as_nanos() as u64)
                .unwrap_or_default();
            (meta.len(), modified)
        });
        Self {
            file: file.into(),
            record,
        }
    }
}

/// sled-backed cache holding the summary of the last run.
pub struct AnalysisCache {
    db: Db,
}

impl AnalysisCache {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// The cached summary, if it was built from exactly `stamps`.
    pub fn lookup(&self, stamps: &[RecordStamp]) -> Result<Option<AnalysisSummary>, CacheError> {
        let Some(stored) = self.db.get(STAMPS_KEY)? else {
            return Ok(None);
        };
        let stored: Vec<RecordStamp> = bincode::deserialize(&stored)?;
        if stored != stamps {
            debug!("Cache is stale ({} stamps stored, {} now)", stored.len(), stamps.len());
            return Ok(None);
        }

        match self.db.get(SUMMARY_KEY)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Replaces the cached summary and the stamps it was built from.
    pub fn insert(
        &self,
        stamps: &[RecordStamp],
        summary: &AnalysisSummary,
    ) -> Result<(), CacheError> {
        let mut batch = sled::Batch::default();
        batch.insert(STAMPS_KEY, bincode::serialize(stamps)?);
        batch.insert(SUMMARY_KEY, bincode::serialize(summary)?);
        self.db.apply_batch(batch)?;
        self.db.flush()?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RelationshipBuilder;
    use sourceflow_core::{FileAnalysis, FunctionEntry};
    use tempfile::tempdir;

    fn summary() -> AnalysisSummary {
        let mut builder = RelationshipBuilder::new();
        builder.add_file_analysis(
            "a.py",
            &FileAnalysis::default()
                .with_function(FunctionEntry::new("main", vec!["helper".to_string()]))
                .with_function(FunctionEntry::new("helper", vec![]))
                .with_entry_point("main"),
        );
        builder.summary()
    }

    #[test]
    fn test_lookup_requires_matching_stamps() {
        let dir = tempdir().unwrap();
        let cache = AnalysisCache::open(dir.path().join("cache")).unwrap();
        let stamps = vec![RecordStamp {
            file: "a.py".to_string(),
            record: Some((120, 7)),
        }];
        assert!(cache.lookup(&stamps).unwrap().is_none());

        let summary = summary();
        cache.insert(&stamps, &summary).unwrap();
        assert_eq!(cache.lookup(&stamps).unwrap(), Some(summary));

        let edited = vec![RecordStamp {
            file: "a.py".to_string(),
            record: Some((121, 8)),
        }];
        assert!(cache.lookup(&edited).unwrap().is_none());
        assert!(cache.lookup(&[]).unwrap().is_none());

        cache.clear().unwrap();
        assert!(cache.lookup(&stamps).unwrap().is_none());
    }

    #[test]
    fn test_stamp_tracks_record_presence() {
        let dir = tempdir().unwrap();
        let record = dir.path().join("a.py.json");

        let missing = RecordStamp::of("a.py", &record);
        assert_eq!(missing.record, None);

        fs::write(&record, "{}").unwrap();
        let present = RecordStamp::of("a.py", &record);
        assert_eq!(present.record.map(|(len, _)| len), Some(2));
        assert_ne!(missing, present);
    }
}
