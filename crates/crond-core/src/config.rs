//! crond configuration system.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CrondError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrondConfig {
    /// Crontab file read by `list` and `check` when no path is given.
    #[serde(default = "default_crontab")]
    pub crontab: String,
    /// Fixed offset from UTC used for "now" when no start time is given.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_crontab() -> String { "~/.crond/crontab".into() }

impl Default for CrondConfig {
    fn default() -> Self {
        Self {
            crontab: default_crontab(),
            utc_offset_minutes: 0,
            preview: PreviewConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl CrondConfig {
    /// Load config from the default path (~/.crond/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CrondError::Config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CrondError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| CrondError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.utc_offset().is_none() {
            return Err(CrondError::Config(format!(
                "utc_offset_minutes {} is outside -1439..=1439",
                self.utc_offset_minutes
            )));
        }
        if self.preview.count == 0 {
            return Err(CrondError::Config("preview.count must be at least 1".into()));
        }
        Ok(())
    }

    /// The configured offset, if it is a valid one.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
    }

    /// Crontab path with `~` expanded.
    pub fn crontab_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.crontab).as_ref())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the crond home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".crond")
    }
}

/// Settings for previewing upcoming runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_preview_count")]
    pub count: usize,
}

fn default_preview_count() -> usize { 5 }

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { count: default_preview_count() }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String { "info".into() }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
