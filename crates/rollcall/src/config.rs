//! Configuration management for rollcall.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::regno::{RegNoDecoder, DEFAULT_ANCHOR_YEAR};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "rollcall";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "attendance.db";

/// Default roster file name.
const ROSTER_FILE_NAME: &str = "students.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ROLLCALL_`)
/// 2. TOML config file at `~/.config/rollcall/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registration-number decoding.
    pub decoder: DecoderConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Roster configuration.
    pub roster: RosterConfig,
    /// Analytics configuration.
    pub analytics: AnalyticsConfig,
}

/// Registration-number decoding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Two-digit year whose cohort is currently in first year.
    pub anchor_year: u8,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/rollcall/attendance.db`
    pub database_path: Option<PathBuf>,
}

/// Roster-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Path to the JSON roster.
    /// Defaults to `~/.local/share/rollcall/students.json`
    pub path: Option<PathBuf>,
}

/// Analytics-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Students strictly below this percentage are flagged.
    pub low_attendance_threshold: u8,
    /// Section used when none is given.
    pub default_section: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            anchor_year: DEFAULT_ANCHOR_YEAR,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            low_attendance_threshold: 65,
            default_section: "A".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `ROLLCALL_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ROLLCALL_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.decoder.anchor_year > 99 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "anchor_year ({}) must be a two-digit year",
                    self.decoder.anchor_year
                ),
            });
        }

        if self.analytics.low_attendance_threshold > 100 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "low_attendance_threshold ({}) cannot exceed 100",
                    self.analytics.low_attendance_threshold
                ),
            });
        }

        if self.analytics.default_section.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "default_section must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Build a registration-number decoder for the configured anchor year.
    #[must_use]
    pub fn decoder(&self) -> RegNoDecoder {
        RegNoDecoder::new(self.decoder.anchor_year)
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the roster path, resolving defaults if not set.
    #[must_use]
    pub fn roster_path(&self) -> PathBuf {
        self.roster
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(ROSTER_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.decoder.anchor_year, 25);
        assert!(config.storage.database_path.is_none());
        assert!(config.roster.path.is_none());
        assert_eq!(config.analytics.low_attendance_threshold, 65);
        assert_eq!(config.analytics.default_section, "A");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_anchor_year() {
        let mut config = Config::default();
        config.decoder.anchor_year = 100;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("anchor_year"));
    }

    #[test]
    fn test_validate_threshold() {
        let mut config = Config::default();
        config.analytics.low_attendance_threshold = 101;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("low_attendance_threshold"));
    }

    #[test]
    fn test_validate_empty_section() {
        let mut config = Config::default();
        config.analytics.default_section = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_section"));
    }

    #[test]
    fn test_decoder_uses_anchor_year() {
        let mut config = Config::default();
        config.decoder.anchor_year = 26;
        assert_eq!(config.decoder().anchor_year(), 26);
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("attendance.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_roster_path_default() {
        let config = Config::default();
        assert!(config.roster_path().to_string_lossy().contains("students.json"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("rollcall"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[decoder]\nanchor_year = 26\n\n[analytics]\nlow_attendance_threshold = 75"
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.decoder.anchor_year, 26);
        assert_eq!(config.analytics.low_attendance_threshold, 75);
        assert_eq!(config.analytics.default_section, "A");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analytics]\ndefault_section = \"\"").unwrap();

        let result = Config::load_from(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("anchor_year"));
        assert!(json.contains("low_attendance_threshold"));
    }

    #[test]
    fn test_analytics_config_deserialize() {
        let json = r#"{"low_attendance_threshold": 50}"#;
        let analytics: AnalyticsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(analytics.low_attendance_threshold, 50);
        assert_eq!(analytics.default_section, "A");
    }
}
