//! Data file location.

use std::path::PathBuf;
use studymap_core::{CoreError, CoreResult};

/// Environment variable naming the data file
pub const DATA_PATH_ENV: &str = "SMAP_DATA_PATH";

/// Data file location relative to the home directory
pub const DEFAULT_DATA_SUBPATH: &str = ".studymap/data.json";

/// Default data file: `~/.studymap/data.json`.
///
/// # Errors
///
/// Returns `CoreError::InvalidPath` when the home directory is unknown.
pub fn default_data_path() -> CoreResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DATA_SUBPATH))
        .ok_or_else(|| CoreError::InvalidPath {
            path: PathBuf::from("~"),
            reason: "could not determine home directory".to_string(),
        })
}

/// Get the data file path from the command line, environment, or default.
///
/// Priority:
/// 1. Command line `--data` argument
/// 2. `SMAP_DATA_PATH` environment variable (if non-empty)
/// 3. `~/.studymap/data.json`
pub fn resolve_data_path(cli_path: Option<PathBuf>) -> CoreResult<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path);
    }

    if let Ok(env_path) = std::env::var(DATA_PATH_ENV)
        && !env_path.is_empty()
    {
        return Ok(PathBuf::from(env_path));
    }

    default_data_path()
}
