//! Platform-specific directory management
//!
//! The global config lives in the platform config directory, under `cbt`.
//! `CBT_CONFIG_DIR` overrides it.

use std::env;
use std::path::PathBuf;

use crate::config::defaults::{ENV_CONFIG_DIR, GLOBAL_CONFIG_FILE_NAME};

/// Application name used in directory paths
const APP_NAME: &str = "cbt";

/// Platform-specific directory provider for cbt
#[derive(Debug, Clone)]
pub struct CbtDirs {
    config_dir: PathBuf,
}

impl CbtDirs {
    /// Resolve directories from the environment, then platform defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/cbt` or `~/.config/cbt`
    /// - macOS: `~/Library/Application Support/cbt`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Path to `config.toml` in the config directory
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(GLOBAL_CONFIG_FILE_NAME)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for CbtDirs {
    fn default() -> Self {
        Self::new()
    }
}
