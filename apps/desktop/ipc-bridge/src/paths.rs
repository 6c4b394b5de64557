//! Where the binary keeps its files.

use crate::error::BridgeHostError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Overrides the config directory; also read from `.env`.
pub const CONFIG_DIR_ENV: &str = "IPC_BRIDGE_CONFIG_DIR";

const APP_DIR_NAME: &str = "ipc-bridge";

/// `$IPC_BRIDGE_CONFIG_DIR` when set and non-empty, otherwise `<platform config dir>/ipc-bridge`.
///
/// # Errors
///
/// Returns [`BridgeHostError::Host`] when neither is available.
pub fn resolve_config_dir() -> Result<PathBuf, BridgeHostError> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    match env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => return Ok(PathBuf::from(dir)),
        _ => {}
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(BridgeHostError::Host {
            message: format!("No config directory: set {CONFIG_DIR_ENV}"),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Log files live next to the config, under `logs/`.
pub fn log_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("logs")
}
