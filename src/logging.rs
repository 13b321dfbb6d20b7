use crate::error::{BitboardError, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable naming a log4rs config file.
pub const CONFIG_ENV: &str = "BITBOARD_LOG_CONFIG";

/// Picked up from the working directory when `BITBOARD_LOG_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "log4rs.yaml";

pub fn config_path() -> Option<PathBuf> {
    match env::var_os(CONFIG_ENV) {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if path.exists() {
                Some(path)
            } else {
                None
            }
        }
    }
}

/*
 * Route panics through the logger, then configure it from a log4rs file if
 * one is found, falling back to env_logger (RUST_LOG, stderr).
 */
pub fn init() -> Result<()> {
    log_panics::init();

    match config_path() {
        Some(path) => log4rs::init_file(&path, Default::default()).map_err(|e| {
            BitboardError::ConfigError(format!(
                "Could not load log config {}: {}",
                path.display(),
                e
            ))
        }),
        None => env_logger::try_init().map_err(|e| {
            BitboardError::ConfigError(format!("Could not initialize logger: {}", e))
        }),
    }
}
