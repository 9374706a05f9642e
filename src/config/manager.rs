//! Configuration manager for loading and saving configuration
//!
//! The configuration lives in `$KEYBOARD_INSET_HOME/config.json`, or in
//! `./keyboard-inset/config.json` when the variable is unset. Writes go through
//! a temporary file and a rename so a crash never leaves a half-written file.

use crate::config::models::InsetConfig;
use crate::error::{InsetError, Result, StringError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the configuration directory
pub const CONFIG_HOME_VAR: &str = "KEYBOARD_INSET_HOME";

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        match std::env::var_os(CONFIG_HOME_VAR) {
            Some(home) => PathBuf::from(home).join("config.json"),
            None => PathBuf::from(".").join("keyboard-inset").join("config.json"),
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<InsetConfig> {
        Self::load_from(&Self::get_config_path())
    }

    /// Save configuration to the default path
    pub fn save(config: &InsetConfig) -> Result<()> {
        Self::save_to(config, &Self::get_config_path())
    }

    /// Load configuration from `path`
    ///
    /// A missing or unparsable file yields the defaults. A file that parses
    /// but holds out-of-range values is an error.
    pub fn load_from(path: &Path) -> Result<InsetConfig> {
        if !path.exists() {
            info!("Configuration file not found at {}, using defaults", path.display());
            return Ok(InsetConfig::default());
        }

        let json = std::fs::read_to_string(path)?;

        let config: InsetConfig = match serde_json::from_str(&json) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                return Ok(InsetConfig::default());
            }
        };

        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save configuration to `path` with an atomic write
    pub fn save_to(config: &InsetConfig, path: &Path) -> Result<()> {
        config.validate()?;

        let config_dir = path.parent().ok_or_else(|| {
            InsetError::ConfigError(StringError::new(format!(
                "Invalid config path: {}",
                path.display()
            )))
        })?;
        std::fs::create_dir_all(config_dir)?;

        let json = serde_json::to_string_pretty(config)?;
        let mut temp = tempfile::NamedTempFile::new_in(config_dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(path)
            .map_err(|e| InsetError::ConfigError(Box::new(e)))?;

        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}
