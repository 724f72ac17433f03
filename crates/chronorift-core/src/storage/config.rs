//! TOML-based application configuration.
//!
//! Stores the constants the rotation is derived from:
//! - Reference anchor (instant and slot index) and the civil timezone
//! - The slot table (chest and ore location pairs)
//! - Weekly re-anchor rule and the suppressed maintenance hour
//! - Boundary step and list page size
//!
//! Configuration is stored at `~/.config/chronorift/config.toml`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::calendar::LocalCalendar;
use crate::error::ConfigError;
use crate::rotation::{default_slots, AnchorRule, RotationSlot};

/// 2025-04-10T04:00:00Z, midnight EDT, when "Sealed Sanctuary" held the chest.
const REFERENCE_EPOCH_SECS: i64 = 1_744_257_600;

pub fn default_reference_instant() -> DateTime<Utc> {
    DateTime::from_timestamp(REFERENCE_EPOCH_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Reference anchor, zone and slot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default = "default_reference_instant")]
    pub reference_instant: DateTime<Utc>,
    #[serde(default = "default_reference_index")]
    pub reference_index: usize,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_slots")]
    pub slots: Vec<RotationSlot>,
}

/// Nightly maintenance window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuppressionConfig {
    #[serde(default = "default_suppressed_hour")]
    pub hour: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Predictions loaded per page of the forward list.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/chronorift/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub anchor: AnchorRule,
    #[serde(default)]
    pub suppression: SuppressionConfig,
    #[serde(default)]
    pub boundary: BoundaryConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

// Default functions
fn default_reference_index() -> usize {
    1
}
fn default_timezone() -> String {
    "America/New_York".into()
}
fn default_suppressed_hour() -> u32 {
    22
}
fn default_step_minutes() -> u32 {
    20
}
fn default_page_size() -> usize {
    3
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            reference_instant: default_reference_instant(),
            reference_index: default_reference_index(),
            timezone: default_timezone(),
            slots: default_slots(),
        }
    }
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            hour: default_suppressed_hour(),
        }
    }
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            step_minutes: default_step_minutes(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
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
        let unknown = || ConfigError::invalid(key, "unknown config key");
        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(ConfigError::invalid(key, "config key is empty"));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| ConfigError::invalid(key, e.to_string()))?,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| {
                            ConfigError::invalid(key, format!("cannot parse '{value}' as number"))
                        })?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)
                            .map_err(|e| ConfigError::invalid(key, e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Set a config value by dot-separated key, then validate the result.
    ///
    /// The change is applied in memory only; call [`Self::save_to`] to
    /// persist it. On error `self` is left untouched.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Reject configurations that would give silently wrong predictions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let step = self.boundary.step_minutes;
        if step == 0 || 60 % step != 0 {
            return Err(ConfigError::invalid(
                "boundary.step_minutes",
                format!("{step} must be a positive divisor of 60"),
            ));
        }
        if self.rotation.slots.is_empty() {
            return Err(ConfigError::invalid(
                "rotation.slots",
                "at least one slot is required",
            ));
        }
        if self.rotation.reference_index >= self.rotation.slots.len() {
            return Err(ConfigError::invalid(
                "rotation.reference_index",
                format!(
                    "{} is out of range for {} slots",
                    self.rotation.reference_index,
                    self.rotation.slots.len()
                ),
            ));
        }
        if self.anchor.hour > 23 {
            return Err(ConfigError::invalid("anchor.hour", "must be in 0..=23"));
        }
        if self.suppression.hour > 23 {
            return Err(ConfigError::invalid("suppression.hour", "must be in 0..=23"));
        }
        if self.schedule.page_size == 0 {
            return Err(ConfigError::invalid("schedule.page_size", "must be positive"));
        }
        LocalCalendar::from_name(&self.rotation.timezone)?;
        Ok(())
    }
}
