//! Error types for crazy-build
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Artifact selection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Selector has more than one `:` or is empty
    #[error("Could not parse artifact selector '{selector}'")]
    InvalidSelector { selector: String },

    /// No artifact matches the selector
    #[error("No artifact matches '{selector}'")]
    NotFound { selector: String },

    /// A selected artifact does not answer the verb
    #[error("Artifact '{artifact}' has no verb '{verb}'")]
    UnknownVerb { artifact: String, verb: String },
}

/// Command string errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Missing `.verb` part, or an empty selector/verb
    #[error("Command '{command}' is not of the form <selector>.<verb>")]
    Malformed { command: String },
}

/// Service injection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No registered service is compatible, satisfied and available
    #[error("No available service satisfies '{requirement}' for {capability} on artifact '{artifact}'")]
    Unmatched {
        artifact: String,
        capability: String,
        requirement: String,
    },
}

/// Errors returned by a dispatched verb
#[derive(Error, Debug)]
pub enum ActionError {
    /// The action itself failed
    #[error("{0}")]
    Failed(String),

    /// The artifact does not answer the verb
    #[error("Verb '{verb}' is not supported")]
    UnsupportedVerb { verb: String },

    /// An injection point the action needs was never bound
    #[error("No service bound for {capability}")]
    MissingService { capability: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to read directory
    #[error("Failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to remove file
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },
}

/// Execution engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed command string
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Selector did not resolve, or verb unknown
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// Strict service binding failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Stamp could not be recorded
    #[error("Stamp error: {0}")]
    Stamp(#[from] FilesystemError),

    /// A command depends on itself, directly or transitively
    #[error("Circular dependency detected: {}", cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },

    /// The dispatched verb failed
    #[error("Command '{command}' failed: {source}")]
    ActionFailed {
        command: String,
        #[source]
        source: ActionError,
    },
}

/// Workspace errors
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// No workspace marker directory in the start directory or its parents
    #[error("No {marker} directory found in '{start}' or any parent. Run 'cbt init' to create a workspace.")]
    NotFound { marker: String, start: PathBuf },

    /// Config file is not valid JSON
    #[error("Failed to parse workspace config '{path}': {error}")]
    ParseConfig { path: PathBuf, error: String },

    /// Config could not be serialized
    #[error("Failed to serialize workspace config: {error}")]
    SerializeConfig { error: String },

    /// Underlying filesystem failure
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}
