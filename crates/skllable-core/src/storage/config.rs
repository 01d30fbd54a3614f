//! TOML-based configuration.
//!
//! Holds the tunable parts of the rule engine:
//! - Session validation bounds
//! - The UTC offset used to bucket sessions into local days
//! - Credential validity and signing seed
//! - Log level
//!
//! Configuration is stored at `~/.config/skllable/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::calendar::LocalCalendar;
use crate::credential::{CredentialEvaluator, CredentialIssuer, CredentialSigner, DEFAULT_VALIDITY_DAYS};
use crate::error::ConfigError;
use crate::session::{SessionValidator, ValidationRules};

/// Calendar configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Learner's offset east of UTC, in minutes
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Credential issuance configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    /// Seed the HMAC signing key is derived from
    #[serde(default = "default_signing_seed")]
    pub signing_seed: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/skllable/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_validity_days() -> u32 {
    DEFAULT_VALIDITY_DAYS
}

fn default_signing_seed() -> String {
    "skllable-local".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            validity_days: default_validity_days(),
            signing_seed: default_signing_seed(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("only leaf values can be set".to_string()));
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing the defaults there if the file
    /// does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed or is out of
    /// range, or if the defaults cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or holds values
    /// that fail [`Config::check`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a leaf value by dot-separated key, keeping the existing type.
    ///
    /// The change is applied in memory only; call [`Config::save`] or
    /// [`Config::save_to`] to persist it.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value does not parse as the
    /// key's type, or the result fails [`Config::check`]. The config is left
    /// unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;

        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.check()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints serde cannot express.
    ///
    /// # Errors
    /// Returns the first offending key.
    pub fn check(&self) -> Result<(), ConfigError> {
        let rules = &self.validation;
        if rules.min_session_minutes > rules.max_session_minutes {
            return Err(ConfigError::InvalidValue {
                key: "validation.min_session_minutes".to_string(),
                message: format!(
                    "{} exceeds validation.max_session_minutes ({})",
                    rules.min_session_minutes, rules.max_session_minutes
                ),
            });
        }
        if self.credentials.validity_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "credentials.validity_days".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        self.local_calendar()?;
        Ok(())
    }

    /// Calendar for the configured offset.
    ///
    /// # Errors
    /// Returns an error if the offset is out of range.
    pub fn local_calendar(&self) -> Result<LocalCalendar, ConfigError> {
        LocalCalendar::from_offset_minutes(self.calendar.utc_offset_minutes)
    }

    pub fn validator(&self) -> SessionValidator {
        SessionValidator::with_rules(self.validation.clone())
    }

    /// # Errors
    /// Returns an error if the calendar offset is out of range.
    pub fn evaluator(&self) -> Result<CredentialEvaluator, ConfigError> {
        Ok(CredentialEvaluator::new(self.local_calendar()?))
    }

    pub fn signer(&self) -> CredentialSigner {
        CredentialSigner::from_seed(&self.credentials.signing_seed)
    }

    /// # Errors
    /// Returns an error if the calendar offset is out of range.
    pub fn issuer(&self) -> Result<CredentialIssuer, ConfigError> {
        Ok(CredentialIssuer::new(self.evaluator()?, self.signer())
            .with_validity_days(self.credentials.validity_days))
    }
}
