//! Application configuration.
//!
//! A small JSON file under the platform config directory. A missing file
//! yields defaults; a malformed one is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::list::SortOrder;

const CONFIG_FILE_NAME: &str = "config.json";
const DB_FILE_NAME: &str = "jotter.db";
const APP_DIR_NAME: &str = "jotter";

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "JOTTER_DB_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database file; the platform data directory when unset
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// Sort order used when a list request names none
    #[serde(default)]
    pub default_sort: SortOrder,
}

/// `<config_dir>/jotter/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| Error::Config("Failed to resolve config directory".to_string()))
}

/// `<data_local_dir>/jotter/jotter.db`
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(DB_FILE_NAME)
}

impl AppConfig {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!(
                "Failed to read config at {}: {error}",
                path.display()
            ))
        })?;
        serde_json::from_str(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })
    }

    /// Database path: explicit override, then `JOTTER_DB_PATH`, then the
    /// configured path, then the platform default.
    pub fn resolve_db_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        let from_env = std::env::var_os(DB_PATH_ENV)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty());
        self.resolve_db_path_with(explicit, from_env)
    }

    fn resolve_db_path_with(&self, explicit: Option<PathBuf>, from_env: Option<PathBuf>) -> PathBuf {
        explicit
            .or(from_env)
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(default_db_path)
    }
}
