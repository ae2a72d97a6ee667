use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable overriding the history root
pub const HISTORY_DIR_ENV: &str = "RECORD_HISTORY_DIR";

/// Name of the history directory created beside the executable
pub const DEFAULT_HISTORY_DIR_NAME: &str = "History";

/// Get the default history root (`History/` next to the running executable)
pub fn default_history_root() -> Result<PathBuf> {
    let exe = env::current_exe().context("Failed to locate the running executable")?;
    let base = exe.parent().context("Executable path has no parent directory")?;
    Ok(base.join(DEFAULT_HISTORY_DIR_NAME))
}

/// History root from [`HISTORY_DIR_ENV`], if set and not blank
pub fn history_root_from_env() -> Option<PathBuf> {
    env::var_os(HISTORY_DIR_ENV).filter(|v| !v.is_empty()).map(PathBuf::from)
}
