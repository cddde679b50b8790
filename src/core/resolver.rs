//! Dependency declarations between commands
//!
//! `depends("A.build", ["A.configure"])` records that `A.configure` must
//! complete before `A.build` runs. Declarations accumulate: declaring the
//! same command again appends, and repeated edges are kept.

use std::collections::HashMap;

/// Command to ordered prerequisite commands
#[derive(Debug, Clone, Default)]
pub struct DependencyMap {
    edges: HashMap<String, Vec<String>>,
}

impl DependencyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append prerequisites for `command`
    pub fn depends<I, S>(&mut self, command: &str, dependencies: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edges
            .entry(command.to_string())
            .or_default()
            .extend(dependencies.into_iter().map(Into::into));
    }

    /// Prerequisites of `command`, in declaration order
    pub fn dependencies_of(&self, command: &str) -> &[String] {
        self.edges.get(command).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of commands with declared prerequisites
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether nothing has been declared
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
