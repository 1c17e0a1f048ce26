//! Editor configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lingo_state::{DEFAULT_HISTORY_LIMIT, DEFAULT_RESOURCE_NAME};

use crate::error::EditorError;

/// Editor configuration
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory holding the editor settings file
    pub settings_dir: PathBuf,
    /// Editor settings file name
    pub settings_file: String,
    /// Project settings file name, inside each project directory
    pub project_file: String,
    /// Resource base name for new projects
    pub default_resource_name: String,
    /// Number of remembered projects
    pub history_limit: usize,
    /// Release lookup timeout in seconds
    pub version_check_timeout_secs: u64,
    /// Version of the running editor
    pub current_version: String,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`EditorError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let content = fs::read_to_string(path).map_err(|e| EditorError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| EditorError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// With settings directory
    #[inline]
    #[must_use]
    pub fn with_settings_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings_dir = dir.into();
        self
    }

    /// With history limit
    #[inline]
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Full path of the editor settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.settings_dir.join(&self.settings_file)
    }

    /// Full path of a project's settings file
    #[must_use]
    pub fn project_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.project_file)
    }

    /// Release lookup timeout
    #[must_use]
    pub fn version_check_timeout(&self) -> Duration {
        Duration::from_secs(self.version_check_timeout_secs)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
        Self {
            settings_dir: home.join(".lingo"),
            settings_file: "editor.toml".to_string(),
            project_file: ".lingo-project".to_string(),
            default_resource_name: DEFAULT_RESOURCE_NAME.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            version_check_timeout_secs: 30,
            current_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
