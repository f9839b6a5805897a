//! Configuration file support for Liftbook.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftbook/config.toml`.
//! `LIFTBOOK_DATA_DIR` overrides the configured data directory.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `database.data_dir`
pub const DATA_DIR_ENV: &str = "LIFTBOOK_DATA_DIR";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Document database location
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_database_name")]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            name: default_database_name(),
        }
    }
}

impl DatabaseConfig {
    /// Directory holding this database's collection files
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir.join(&self.name)
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::Config("database name must not be empty".into()));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Config(format!(
                "database name '{}' must be a plain directory name",
                self.name
            )));
        }
        Ok(())
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("liftbook")
}

fn default_database_name() -> String {
    "workout_application".into()
}

impl Config {
    /// Load configuration from the standard config path, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.database.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply `LIFTBOOK_DATA_DIR` if it is set and non-empty
    pub fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            tracing::debug!("Using data dir from {}", DATA_DIR_ENV);
            self.database.data_dir = PathBuf::from(dir);
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("liftbook").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
