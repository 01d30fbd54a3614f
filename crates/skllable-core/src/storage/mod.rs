mod config;
mod store;

pub use config::{CalendarConfig, Config, CredentialsConfig, LoggingConfig};
pub use store::{InMemorySessionStore, JsonSessionFile, SessionStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/skllable[-dev]/` based on SKLLABLE_ENV.
///
/// Set SKLLABLE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir().ok_or(ConfigError::NoConfigDir)?.join(".config");

    let env = std::env::var("SKLLABLE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("skllable-dev")
    } else {
        base_dir.join("skllable")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
