//! Project configuration stored in `.sourceflow/config.json`.

use crate::error::{CoreError, Result};
use crate::explorer::{DirectoryExplorer, DEFAULT_CODE_EXTENSIONS, DEFAULT_SKIP_DIRS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding SourceFlow state inside a project.
pub const CONFIG_DIR: &str = ".sourceflow";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Score bonus given to entry points when limiting diagram size.
pub const DEFAULT_ENTRY_POINT_BONUS: usize = 5;

/// Per-project settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    /// Extensions to analyze, without the leading dot.
    pub extensions: Vec<String>,
    /// Directory names to skip while exploring.
    pub ignore: Vec<String>,
    /// Node budget for function and dependency diagrams. Unset means no limit.
    pub max_nodes: Option<usize>,
    pub entry_point_bonus: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            extensions: DEFAULT_CODE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ignore: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            max_nodes: None,
            entry_point_bonus: DEFAULT_ENTRY_POINT_BONUS,
        }
    }
}

impl Config {
    /// Path of the config file for a project root.
    pub fn path(project: &Path) -> PathBuf {
        project.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Loads the project config, or defaults if there is none.
    pub fn load(project: &Path) -> Result<Self> {
        let path = Self::path(project);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path).map_err(|e| CoreError::io(&path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the default config. Returns `false` if one already exists.
    pub fn write_default(project: &Path) -> Result<bool> {
        let path = Self::path(project);
        if path.exists() {
            return Ok(false);
        }
        let dir = project.join(CONFIG_DIR);
        fs::create_dir_all(&dir).map_err(|e| CoreError::io(&dir, e))?;
        let text = serde_json::to_string_pretty(&Self::default())?;
        fs::write(&path, text).map_err(|e| CoreError::io(&path, e))?;
        Ok(true)
    }

    /// Builds an explorer from the configured extensions and ignore list.
    pub fn explorer(&self) -> DirectoryExplorer {
        DirectoryExplorer::new(&self.extensions, &self.ignore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        assert!(Config::write_default(dir.path()).unwrap());
        assert!(!Config::write_default(dir.path()).unwrap());

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.entry_point_bonus, DEFAULT_ENTRY_POINT_BONUS);
        assert_eq!(config.max_nodes, None);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        fs::write(Config::path(dir.path()), r#"{"max_nodes": 25}"#).unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.max_nodes, Some(25));
        assert_eq!(config.extensions, Config::default().extensions);
    }

    #[test]
    fn test_malformed_config_errors() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        fs::write(Config::path(dir.path()), "{ nope").unwrap();

        assert!(matches!(
            Config::load(dir.path()),
            Err(CoreError::Json(_))
        ));
    }
}
