//! crazy-build - build orchestration engine
//!
//! Artifacts expose verbs (configure, build, ...) that are addressed by
//! commands of the form `<selector>.<verb>`. The engine runs a command's
//! declared prerequisites first, injects the services each artifact needs,
//! dispatches the verb and records a stamp so the command runs at most once
//! per workspace.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Artifact registry, injector, stamps and execution engine
//! - [`infra`] - Workspace, directories and filesystem access
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling
//! - [`builtin`] - Artifacts declared by the `cbt` binary

pub mod builtin;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
