//! Global configuration management
//!
//! Reads user-wide settings from `config.toml` in the config directory.
//! Every setting is optional; command-line flags win over the file.
//!
//! ```toml
//! [engine]
//! ignore_stamps = false
//! strict_services = true
//! substring_fallback = false
//!
//! [output]
//! quiet = false
//! ```

use crate::infra::dirs::CbtDirs;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Global configuration error types
#[derive(Error, Debug)]
pub enum GlobalConfigError {
    /// Failed to read the config file
    #[error("Failed to access config file '{path}': {error}")]
    Io { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: String, error: String },
}

/// Global configuration for cbt
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GlobalConfig {
    /// Engine defaults
    #[serde(default)]
    pub engine: EngineConfig,

    /// Output preferences
    #[serde(default)]
    pub output: OutputConfig,
}

/// Engine defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Re-run commands even when stamped
    pub ignore_stamps: Option<bool>,

    /// Fail when an injection point has no eligible service
    pub strict_services: Option<bool>,

    /// Let bare selectors fall back to substring matches on the kind
    pub substring_fallback: Option<bool>,
}

/// Output preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Enable quiet mode
    pub quiet: Option<bool>,
}

impl GlobalConfig {
    /// Load global configuration from the config directory
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `GlobalConfigError::Parse` if the file exists but is not
    /// valid TOML.
    pub fn load(dirs: &CbtDirs) -> Result<Self, GlobalConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load global configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, GlobalConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GlobalConfigError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| GlobalConfigError::Parse {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Whether stamps are ignored by default
    #[must_use]
    pub fn ignore_stamps(&self) -> bool {
        self.engine.ignore_stamps.unwrap_or(false)
    }

    /// Whether unmatched injection points are errors by default
    #[must_use]
    pub fn strict_services(&self) -> bool {
        self.engine.strict_services.unwrap_or(false)
    }

    /// Whether selector substring fallback is enabled
    #[must_use]
    pub fn substring_fallback(&self) -> bool {
        self.engine.substring_fallback.unwrap_or(false)
    }

    /// Whether output is quiet by default
    #[must_use]
    pub fn quiet(&self) -> bool {
        self.output.quiet.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert!(!config.ignore_stamps());
        assert!(!config.strict_services());
        assert!(!config.substring_fallback());
        assert!(!config.quiet());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = GlobalConfig::load_from_path(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let content = r"
[engine]
strict_services = true
substring_fallback = true
";
        fs::write(&config_path, content).unwrap();

        let config = GlobalConfig::load_from_path(&config_path).unwrap();
        assert!(config.strict_services());
        assert!(config.substring_fallback());
        assert!(!config.ignore_stamps());
        assert_eq!(config.output.quiet, None);
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "invalid toml [[[").unwrap();

        let result = GlobalConfig::load_from_path(&config_path);
        assert!(matches!(result, Err(GlobalConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[engine]\nignore_stamps = true\nsubstring_fallback = false\n\n[output]\nquiet = true\n",
        )
        .unwrap();

        let config = GlobalConfig::load_from_path(&config_path).unwrap();
        assert_eq!(
            config,
            GlobalConfig {
                engine: EngineConfig {
                    ignore_stamps: Some(true),
                    strict_services: None,
                    substring_fallback: Some(false),
                },
                output: OutputConfig { quiet: Some(true) },
            }
        );
    }
}
