//! Default configuration values

/// Directory marking the root of a workspace
pub const WORKSPACE_DIR_NAME: &str = ".crazy_build";

/// Workspace configuration file inside [`WORKSPACE_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Directory holding completion stamps inside [`WORKSPACE_DIR_NAME`]
pub const STAMP_DIR_NAME: &str = "stamps";

/// Variable always set to the absolute workspace root
pub const WORKSPACE_VAR: &str = "WORKSPACE";

/// Selector used by verb commands when none is given
pub const DEFAULT_SELECTOR: &str = "default";

/// Global configuration file name inside the config directory
pub const GLOBAL_CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the workspace root
pub const ENV_WORKSPACE: &str = "CBT_WORKSPACE";

/// Environment variable overriding the global config directory
pub const ENV_CONFIG_DIR: &str = "CBT_CONFIG_DIR";
