//! Configuration types and parsing for migrator.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File names probed by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["migrator.yml", "migrator.yaml"];

/// Runner configuration from migrator.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory holding one script subdirectory per database
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,

    /// Directory holding the DuckDB database files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Restrict runs to these databases (empty means all)
    #[serde(default)]
    pub databases: Vec<String>,
}

fn default_scripts_dir() -> String {
    "migrations".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
            data_dir: default_data_dir(),
            databases: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, falling back to defaults when
    /// neither migrator.yml nor migrator.yaml exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                log::debug!("Using config file {}", path.display());
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.scripts_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "scripts_dir cannot be empty".to_string(),
            });
        }
        if self.data_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "data_dir cannot be empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.databases {
            if name.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "databases entries cannot be empty".to_string(),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("database '{name}' is listed more than once"),
                });
            }
        }
        Ok(())
    }

    /// Scripts root resolved against `root`
    pub fn scripts_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.scripts_dir)
    }

    /// Data directory resolved against `root`
    pub fn data_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
