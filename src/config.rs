//! Configuration management for Chatterbox
//!
//! Handles loading, parsing, validating, and merging configuration from
//! the YAML config file, environment variables, and CLI overrides.

use crate::error::{ChatterboxError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Chatterbox
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Storage configuration
///
/// Controls where the durable substrate keeps its database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the substrate database; defaults to the user's
    /// application data directory when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration, merging file, environment, and CLI sources
    ///
    /// Missing config files are not an error; defaults are used and a
    /// warning is logged. Environment variables override file values, CLI
    /// arguments override both.
    ///
    /// # Errors
    ///
    /// Returns `ChatterboxError::Config` if the file exists but cannot be
    /// read or parsed.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatterboxError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatterboxError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(data_dir) = std::env::var("CHATTERBOX_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(data_dir));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(data_dir) = &cli.data_dir {
            self.storage.data_dir = Some(data_dir.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ChatterboxError::Config` if the configured data directory
    /// exists but is not a directory.
    pub fn validate(&self) -> Result<()> {
        if let Some(data_dir) = &self.storage.data_dir {
            if data_dir.as_os_str().is_empty() {
                return Err(ChatterboxError::Config(
                    "storage.data_dir must not be empty".to_string(),
                )
                .into());
            }
            if data_dir.exists() && !data_dir.is_dir() {
                return Err(ChatterboxError::Config(format!(
                    "storage.data_dir is not a directory: {}",
                    data_dir.display()
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Resolve the directory holding the substrate database, creating it
    /// if necessary
    ///
    /// Falls back to the platform application data directory when no
    /// directory was configured.
    ///
    /// # Errors
    ///
    /// Returns `ChatterboxError::Config` if no data directory can be
    /// determined, or an IO error if it cannot be created.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        let data_dir = match &self.storage.data_dir {
            Some(dir) => dir.clone(),
            None => {
                let proj_dirs = ProjectDirs::from("com", "chatterbox", "chatterbox").ok_or_else(
                    || ChatterboxError::Config("Could not determine data directory".to_string()),
                )?;
                proj_dirs.data_dir().join("store")
            }
        };

        std::fs::create_dir_all(&data_dir)
            .map_err(|e| ChatterboxError::Config(format!("Failed to create data directory: {}", e)))?;

        Ok(data_dir)
    }
}
