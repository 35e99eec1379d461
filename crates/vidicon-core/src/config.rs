// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves trail, stream and logging settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::geometry::{GeometryError, StreamGeometry};
use crate::VidiconOptions;

/// Stream settings used when the command line gives no size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Frame width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    /// Frame height in rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
}

impl StreamSettings {
    /// Geometry if both dimensions are present
    pub fn geometry(&self) -> Option<Result<StreamGeometry, GeometryError>> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(StreamGeometry::new(w, h)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// tracing filter directive, overridden by RUST_LOG
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trail filter options
    pub trail: VidiconOptions,

    /// Stream geometry defaults
    pub stream: StreamSettings,

    /// Log output settings
    pub logging: LoggingSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid trail option in config: {0}")]
    InvalidOption(#[from] crate::OptionError),
}

impl Config {
    /// Get the default config file path (~/.config/vidicon/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vidicon").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.trail.validate()?;
        Ok(config)
    }

    /// Load config from a path that may not exist; a missing file gives the defaults
    pub fn load_or_default(path: &std::path::Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::ReadError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.trail.apply_str("fade=0.9:burn_r=0.4").unwrap();
        config.trail.burn_in = false;
        config.stream.width = Some(320);
        config.stream.height = Some(240);

        let temp_path = std::env::temp_dir().join("vidicon_test_config.toml");
        config.save(&temp_path).unwrap();
        let loaded = Config::load(&temp_path).unwrap();
        let _ = std::fs::remove_file(&temp_path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: Config = toml::from_str(
            r#"
            [trail]
            fade = 0.8

            [stream]
            width = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.trail.fade, 0.8);
        assert_eq!(config.trail.gain, -1.0);
        assert_eq!(config.trail.burn_g, -2.0);
        assert!(config.trail.burn_in);
        assert!(config.stream.geometry().is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_out_of_range_option_rejected_on_load() {
        let temp_path = std::env::temp_dir().join("vidicon_test_bad_config.toml");
        std::fs::write(&temp_path, "[trail]\ngain = 5.0\n").unwrap();
        let result = Config::load(&temp_path);
        let _ = std::fs::remove_file(&temp_path);

        assert!(matches!(result, Err(ConfigError::InvalidOption(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_path = std::env::temp_dir().join("vidicon_test_missing_config.toml");
        let _ = std::fs::remove_file(&temp_path);
        assert_eq!(Config::load_or_default(&temp_path).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_file_is_not_masked_by_defaults() {
        let temp_path = std::env::temp_dir().join("vidicon_test_invalid_default_config.toml");
        std::fs::write(&temp_path, "[trail]\ngain = 5.0\n").unwrap();
        let result = Config::load_or_default(&temp_path);
        let _ = std::fs::remove_file(&temp_path);

        assert!(matches!(result, Err(ConfigError::InvalidOption(_))));
    }

    #[test]
    fn test_default_path() {
        if let Some(p) = Config::default_path() {
            assert!(p.ends_with("vidicon/config.toml"));
        }
    }
}
