//! Workspace root, variables and persisted configuration
//!
//! A workspace is any directory containing `.crazy_build/`. Its
//! `config.json` holds persisted variables:
//!
//! ```json
//! {"env": {"TARGET": "mipsel-unknown-linux"}}
//! ```
//!
//! Variable lookup layers, lowest first: the config file, the process
//! environment, then `WORKSPACE`, which is always the absolute root.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::config::defaults::{CONFIG_FILE_NAME, STAMP_DIR_NAME, WORKSPACE_DIR_NAME, WORKSPACE_VAR};
use crate::error::WorkspaceError;
use crate::infra::filesystem;

/// What the engine needs from a workspace
pub trait WorkspaceResolver {
    /// Substitute every known `${VAR}` in `template`
    fn resolve(&self, template: &str) -> String;

    /// Directory holding completion stamps
    fn stamp_dir_path(&self) -> PathBuf;
}

/// Contents of `.crazy_build/config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Persisted variables
    #[serde(rename = "env", default)]
    pub vars: BTreeMap<String, String>,
}

/// A loaded workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: WorkspaceConfig,
    variables: BTreeMap<String, String>,
}

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("Invalid variable pattern"))
}

impl Workspace {
    /// Walk up from `start` to the first directory containing the marker
    pub fn find_root(start: &Path) -> Result<PathBuf, WorkspaceError> {
        start
            .ancestors()
            .find(|dir| dir.join(WORKSPACE_DIR_NAME).is_dir())
            .map(Path::to_path_buf)
            .ok_or_else(|| WorkspaceError::NotFound {
                marker: WORKSPACE_DIR_NAME.to_string(),
                start: start.to_path_buf(),
            })
    }

    /// Load the workspace at `explicit`, or the one enclosing `cwd`
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self, WorkspaceError> {
        let root = match explicit {
            Some(root) => {
                if !root.join(WORKSPACE_DIR_NAME).is_dir() {
                    return Err(WorkspaceError::NotFound {
                        marker: WORKSPACE_DIR_NAME.to_string(),
                        start: root.to_path_buf(),
                    });
                }
                root.to_path_buf()
            }
            None => Self::find_root(cwd)?,
        };
        Self::load(&root)
    }

    /// Load the workspace rooted at `root`
    ///
    /// A missing `config.json` is treated as empty.
    pub fn load(root: &Path) -> Result<Self, WorkspaceError> {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        let config_file = Self::config_path(&root);

        let config = if config_file.is_file() {
            let content = filesystem::read_file(&config_file)?;
            serde_json::from_str(&content).map_err(|e| WorkspaceError::ParseConfig {
                path: config_file.clone(),
                error: e.to_string(),
            })?
        } else {
            WorkspaceConfig::default()
        };

        let mut variables = config.vars.clone();
        variables.extend(
            env::vars_os().filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
        );
        variables.insert(WORKSPACE_VAR.to_string(), root.display().to_string());

        tracing::debug!(root = %root.display(), variables = variables.len(), "Workspace loaded");
        Ok(Self {
            root,
            config,
            variables,
        })
    }

    /// Create a workspace at `path`
    ///
    /// An existing workspace is left untouched. Returns whether a new one
    /// was created.
    pub fn init(path: &Path) -> Result<bool, WorkspaceError> {
        let marker = path.join(WORKSPACE_DIR_NAME);
        if marker.is_dir() {
            return Ok(false);
        }
        filesystem::create_dir_all(&marker)?;
        write_config(&Self::config_path(path), &WorkspaceConfig::default())?;
        tracing::info!("Initialized workspace at {}", path.display());
        Ok(true)
    }

    fn config_path(root: &Path) -> PathBuf {
        root.join(WORKSPACE_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    /// Absolute workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persisted configuration
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Path to `config.json`
    pub fn config_file(&self) -> PathBuf {
        Self::config_path(&self.root)
    }

    /// Stamp directory
    pub fn stamp_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR_NAME).join(STAMP_DIR_NAME)
    }

    /// Value of variable `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Set variable `key` to `value` after resolving it
    ///
    /// With `persist`, the unresolved value is also recorded in the config
    /// for the next [`Workspace::save`].
    pub fn set_var(&mut self, key: &str, value: &str, persist: bool) {
        let resolved = self.resolve(value);
        self.variables.insert(key.to_string(), resolved);
        if persist {
            self.config.vars.insert(key.to_string(), value.to_string());
        }
    }

    /// Write the config back to `config.json`
    pub fn save(&self) -> Result<(), WorkspaceError> {
        write_config(&self.config_file(), &self.config)
    }

    /// Substitute every `${VAR}` whose variable is set
    ///
    /// Unknown variables are left as written.
    pub fn resolve(&self, template: &str) -> String {
        variable_pattern()
            .replace_all(template, |caps: &Captures<'_>| match self.variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl WorkspaceResolver for Workspace {
    fn resolve(&self, template: &str) -> String {
        Workspace::resolve(self, template)
    }

    fn stamp_dir_path(&self) -> PathBuf {
        self.stamp_dir()
    }
}

fn write_config(path: &Path, config: &WorkspaceConfig) -> Result<(), WorkspaceError> {
    let content = serde_json::to_string_pretty(config).map_err(|e| WorkspaceError::SerializeConfig {
        error: e.to_string(),
    })?;
    filesystem::write_file(path, &content)?;
    Ok(())
}
