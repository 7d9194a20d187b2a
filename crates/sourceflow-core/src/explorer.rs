//! Directory exploration.
//!
//! Walks a project tree and collects the files worth analyzing. Build output,
//! VCS metadata and virtualenvs are pruned before descending into them.

use crate::error::{CoreError, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// File extensions treated as code by default.
pub const DEFAULT_CODE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "java", "cpp", "c", "h", "hpp", "cs", "go", "rs", "rb", "php", "swift",
];

/// Directory names skipped by default.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "venv",
    ".env",
    "__pycache__",
    "dist",
    "build",
    ".idea",
    ".vscode",
];

/// Finds code files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryExplorer {
    /// Lowercased extensions without the leading dot.
    extensions: HashSet<String>,
    skip_dirs: HashSet<String>,
}

impl Default for DirectoryExplorer {
    fn default() -> Self {
        Self::new(
            DEFAULT_CODE_EXTENSIONS.iter().copied(),
            DEFAULT_SKIP_DIRS.iter().copied(),
        )
    }
}

impl DirectoryExplorer {
    /// Creates an explorer with custom extension and skip lists.
    ///
    /// Extensions may be given with or without the leading dot.
    pub fn new<E, S>(extensions: E, skip_dirs: S) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
            skip_dirs: skip_dirs
                .into_iter()
                .map(|d| d.as_ref().to_string())
                .collect(),
        }
    }

    /// Recursively collects code files under `root`, sorted by path.
    pub fn explore(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(CoreError::InvalidDirectory(root.to_path_buf()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_skipped_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_code_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        info!("Found {} code files in {}", files.len(), root.display());
        Ok(files)
    }

    /// Counts files per lowercased extension.
    pub fn file_stats(files: &[PathBuf]) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();
        for file in files {
            let ext = file
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            *stats.entry(ext).or_insert(0) += 1;
        }
        stats
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        // Never prune the root itself, even if it is called "build".
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .skip_dirs
                .contains(entry.file_name().to_string_lossy().as_ref())
    }

    fn is_code_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| self.extensions.contains(&e.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_explore_filters_and_prunes() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("src/main.py"), "def main(): pass").unwrap();
        fs::write(root.join("src/Util.RS"), "fn util() {}").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "x()").unwrap();

        let files = DirectoryExplorer::default().explore(root).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["Util.RS", "main.py"]);
    }

    #[test]
    fn test_custom_extensions() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "").unwrap();
        fs::write(dir.path().join("b.kt"), "").unwrap();

        let explorer = DirectoryExplorer::new([".kt"], Vec::<String>::new());
        let files = explorer.explore(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("b.kt"));
    }

    #[test]
    fn test_invalid_root() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = DirectoryExplorer::default().explore(&missing).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDirectory(_)));
    }

    #[test]
    fn test_file_stats() {
        let files = vec![
            PathBuf::from("a.py"),
            PathBuf::from("b.PY"),
            PathBuf::from("c.rs"),
        ];
        let stats = DirectoryExplorer::file_stats(&files);
        assert_eq!(stats.get("py"), Some(&2));
        assert_eq!(stats.get("rs"), Some(&1));
    }
}
