//! Operator configuration.
//!
//! Looked up in order: `.work/config.toml`, then
//! `<user config dir>/dealflow/config.toml`, then built-in defaults. Every
//! key is optional.
//!
//! ```toml
//! [reminder]
//! enrollment_delay_business_days = 3
//!
//! [[recipients.active]]
//! name = "Dana"
//! email = "dana@example.com"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::constants::DEFAULT_ENROLLMENT_DELAY_BUSINESS_DAYS;
use crate::pipeline::PipelinePolicy;
use crate::recipients::{Recipient, StaticRecipients};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub recipients: RecipientsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_enrollment_delay")]
    pub enrollment_delay_business_days: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enrollment_delay_business_days: default_enrollment_delay(),
        }
    }
}

fn default_enrollment_delay() -> u32 {
    DEFAULT_ENROLLMENT_DELAY_BUSINESS_DAYS
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientsConfig {
    /// Team members copied on the follow-up email.
    #[serde(default)]
    pub active: Vec<Recipient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `DEALFLOW_LOG` and `RUST_LOG` are unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Resolve configuration for a work directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let candidates = [Some(work_dir.join("config.toml")), user_config_path()];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn policy(&self) -> PipelinePolicy {
        PipelinePolicy {
            enrollment_delay_business_days: self.reminder.enrollment_delay_business_days,
        }
    }

    pub fn recipient_directory(&self) -> StaticRecipients {
        StaticRecipients(self.recipients.active.clone())
    }
}

/// `<user config dir>/dealflow/config.toml`, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dealflow").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.policy().enrollment_delay_business_days, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[reminder]
enrollment_delay_business_days = 5

[[recipients.active]]
name = "Dana"
email = "dana@example.com"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.reminder.enrollment_delay_business_days, 5);
        assert_eq!(
            config.recipient_directory().0,
            vec![Recipient::new("Dana", "dana@example.com")]
        );
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_work_dir_config_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.toml"),
            "[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[reminder]\nenrollment_delay_business_days = \"soon\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let mut config = Config::default();
        config.recipients.active.push(Recipient::new("Sam", "sam@example.com"));
        config.save(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
