//! Configuration loading and database path resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the database file
pub const DATABASE_ENV_VAR: &str = "YOME_DATABASE";

/// Database file name used by the compiled default
pub const DATABASE_FILE_NAME: &str = "yome.db";

/// Database path resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`database = "..."`)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_database_path(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        debug!("Database path from command line: {}", path);
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            debug!("Database path from {}: {}", env_var_name, path);
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Some(path) = database_from_config(&config_path)? {
            debug!("Database path from {}: {}", config_path.display(), path.display());
            return Ok(path);
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_database_path())
}

/// Read the `database` key from a TOML config file.
///
/// Returns `Ok(None)` when the key is absent; a file that cannot be parsed
/// is a configuration error.
pub fn database_from_config(config_path: &Path) -> Result<Option<PathBuf>> {
    let content = std::fs::read_to_string(config_path)?;
    let config = toml::from_str::<toml::Value>(&content).map_err(|e| {
        Error::Config(format!("Invalid config file {}: {}", config_path.display(), e))
    })?;

    match config.get("database") {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(PathBuf::from(s)))
            .ok_or_else(|| {
                Error::Config(format!(
                    "'database' in {} must be a string",
                    config_path.display()
                ))
            }),
    }
}

/// Get the configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("yome").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/yome/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default database path
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("yome"))
        .unwrap_or_else(|| PathBuf::from("./yome_data"))
        .join(DATABASE_FILE_NAME)
}
