//! Configuration interest protocol
//!
//! Two phases:
//!
//! 1. Declare - every artifact's [`Artifact::check_configuration`] hook runs
//!    once and may register interest in any number of configuration names.
//! 2. Resolve - [`ConfigurationInterest::who_want_to_configure`] answers who
//!    registered for a name.
//!
//! Answers are only complete once phase 1 has covered the whole registry;
//! [`ConfigurationInterest::declare_all`] does that and marks the map
//! complete.
//!
//! [`Artifact::check_configuration`]: crate::core::artifact::Artifact::check_configuration

use std::collections::BTreeMap;

use crate::core::registry::{ArtifactRef, ArtifactRegistry};

/// Configuration name to interested artifacts
#[derive(Debug, Clone, Default)]
pub struct ConfigurationInterest {
    interests: BTreeMap<String, Vec<ArtifactRef>>,
    complete: bool,
}

impl ConfigurationInterest {
    /// Create an empty, incomplete interest map
    pub fn new() -> Self {
        Self::default()
    }

    /// Run phase 1 over every artifact in `registry`
    pub fn declare_all(registry: &ArtifactRegistry) -> Self {
        let mut interest = Self::new();
        for artifact in registry.get_all() {
            let mut declarer = InterestDeclarer {
                interest: &mut interest,
                who: artifact,
            };
            registry.get(artifact).check_configuration(&mut declarer);
        }
        interest.mark_complete();
        tracing::debug!(names = interest.interests.len(), "Configuration interests declared");
        interest
    }

    /// Register `who` as interested in configuration `name`
    pub fn i_want_to_configure(&mut self, name: &str, who: ArtifactRef) {
        self.interests.entry(name.to_string()).or_default().push(who);
    }

    /// Everyone registered for `name`, in registration order
    ///
    /// An unclaimed name yields an empty list.
    pub fn who_want_to_configure(&self, name: &str) -> &[ArtifactRef] {
        if !self.complete {
            tracing::warn!(name, "Configuration interest queried before the declare phase completed");
        }
        self.interests.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Mark phase 1 as finished
    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    /// Whether phase 1 has finished
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Configuration names with at least one interested artifact
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.interests.keys().map(String::as_str)
    }
}

/// Handed to [`Artifact::check_configuration`], bound to the artifact itself
///
/// [`Artifact::check_configuration`]: crate::core::artifact::Artifact::check_configuration
pub struct InterestDeclarer<'a> {
    interest: &'a mut ConfigurationInterest,
    who: ArtifactRef,
}

impl InterestDeclarer<'_> {
    /// Register interest in configuration `name`
    pub fn i_want_to_configure(&mut self, name: &str) {
        self.interest.i_want_to_configure(name, self.who);
    }
}
