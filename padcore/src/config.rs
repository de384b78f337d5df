//! Editor configuration
//!
//! Read once at start from `<config dir>/config.json`. The editor never
//! writes this file; a missing file means defaults.

use crate::storage::{self, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Show the "Saved" message box after every successful save.
    pub confirm_saves: bool,
    pub window_width: f32,
    pub window_height: f32,
    /// `tracing-subscriber` filter directive, e.g. `"debug"`.
    pub log_filter: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            confirm_saves: true,
            window_width: 800.0,
            window_height: 600.0,
            log_filter: None,
        }
    }
}

impl EditorConfig {
    pub fn path(app_name: &str) -> PathBuf {
        storage::config_dir(app_name).join(CONFIG_FILE)
    }

    pub fn load(path: &Path) -> storage::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load the config if the file exists.
    pub fn load_optional(path: &Path) -> storage::Result<Option<Self>> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
