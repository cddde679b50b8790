//! Infrastructure layer
//!
//! Handles filesystem access and workspace state.
//! This module is the only place where side effects occur.

pub mod dirs;
pub mod filesystem;
pub mod workspace;
