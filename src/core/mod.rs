//! Core orchestration logic
//!
//! # Submodules
//!
//! - [`artifact`] - Artifact trait, verbs and verb tables
//! - [`version`] - Version suffix parsing for kind names
//! - [`registry`] - Artifact registry and selector lookup
//! - [`service`] - Service registry and injector
//! - [`interest`] - Two-phase configuration interest protocol
//! - [`resolver`] - Dependency declarations between commands
//! - [`command`] - `<selector>.<verb>` command strings
//! - [`stamps`] - Persisted completion stamps
//! - [`context`] - Declare phase and sealed context
//! - [`engine`] - Execution engine
//! - [`global_config`] - Global configuration management

pub mod artifact;
pub mod command;
pub mod context;
pub mod engine;
pub mod global_config;
pub mod interest;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod stamps;
pub mod version;
