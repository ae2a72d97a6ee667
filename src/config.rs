//! Configuration file support
//!
//! Settings come from a TOML file. Every key is optional:
//!
//! ```toml
//! history_dir = "/var/lib/record-history"
//! retention_days = 30
//! log_filter = "record_history=info"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::utils::{default_history_root, history_root_from_env};

/// Default retention window in days
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Default `tracing` filter when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Root of the history tree
    pub history_dir: Option<PathBuf>,
    /// Age in days after which files are purged; 0 disables purging
    pub retention_days: u32,
    pub log_filter: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            history_dir: None,
            retention_days: DEFAULT_RETENTION_DAYS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl HistoryConfig {
    /// Platform config location, e.g. `~/.config/record-history/config.toml` on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("record-history").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Load from `explicit` if given (must exist), else from [`HistoryConfig::default_path`]
    /// if that file exists, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Pick the history root: `cli_override`, then `RECORD_HISTORY_DIR`, then the
    /// config file, then `History/` beside the executable
    pub fn resolve_history_root(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = history_root_from_env() {
            return Ok(dir);
        }
        if let Some(dir) = &self.history_dir {
            return Ok(dir.clone());
        }
        default_history_root()
    }
}
