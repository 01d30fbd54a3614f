//! Shared state for command handlers.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use skllable_core::{Config, ConfigError, LocalCalendar};

pub struct Context {
    pub config: Config,
    /// Explicit config file, if one was given
    pub config_path: Option<PathBuf>,
    pub now: DateTime<Utc>,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>, now: Option<DateTime<Utc>>) -> Result<Self, ConfigError> {
        let config = match &config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        Ok(Self {
            config,
            config_path,
            now: now.unwrap_or_else(Utc::now),
        })
    }

    pub fn calendar(&self) -> Result<LocalCalendar, ConfigError> {
        self.config.local_calendar()
    }

    pub fn save_config(&self) -> Result<(), ConfigError> {
        match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => self.config.save(),
        }
    }
}

/// Read a JSON document; `-` reads stdin.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?
    };
    Ok(serde_json::from_str(&content)?)
}

/// Read a JSON list, treating a missing file as empty.
pub fn read_json_list<T: DeserializeOwned>(
    path: Option<&Path>,
) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) if path == Path::new("-") || path.exists() => read_json(path),
        _ => Ok(Vec::new()),
    }
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
