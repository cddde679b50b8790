//! Artifact registry
//!
//! Holds every declared artifact in registration order and answers selector
//! queries:
//!
//! - `Type:ID` - exact kind name and exact id
//! - bare token - exact id first; otherwise a case-insensitive kind prefix
//!   whose remainder must be empty or parse as a version
//!   (see [`crate::core::version`])
//!
//! When [`FindOptions::substring_fallback`] is set, a bare token that matched
//! nothing in the prefix tier falls back to substring containment on kind
//! names. That tier can return unrelated artifacts for short tokens and is
//! off by default.

use crate::core::artifact::{Artifact, Lifecycle};
use crate::core::version::{match_kind, Version};
use crate::error::SelectorError;

/// Handle to an artifact in an [`ArtifactRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactRef(usize);

impl ArtifactRef {
    /// Registration index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Parsed selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `Type:ID`
    Qualified { kind: &'a str, id: &'a str },
    /// `ID` or `Type`
    Bare(&'a str),
}

impl<'a> Selector<'a> {
    /// Parse a selector string
    pub fn parse(selector: &'a str) -> Result<Self, SelectorError> {
        let invalid = || SelectorError::InvalidSelector {
            selector: selector.to_string(),
        };

        let mut parts = selector.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(token), None, None) if !token.is_empty() => Ok(Self::Bare(token)),
            (Some(kind), Some(id), None) if !kind.is_empty() && !id.is_empty() => {
                Ok(Self::Qualified { kind, id })
            }
            _ => Err(invalid()),
        }
    }
}

/// Selector matching policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Fall back to substring containment on kind names
    pub substring_fallback: bool,
}

struct Entry {
    artifact: Box<dyn Artifact>,
    args: Vec<String>,
    lifecycle: Lifecycle,
}

/// Ordered set of declared artifacts
#[derive(Default)]
pub struct ArtifactRegistry {
    entries: Vec<Entry>,
    options: FindOptions,
}

impl ArtifactRegistry {
    /// Create an empty registry
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Set the matching policy
    pub fn set_options(&mut self, options: FindOptions) {
        self.options = options;
    }

    /// Current matching policy
    pub fn options(&self) -> FindOptions {
        self.options
    }

    /// Append an artifact
    pub(crate) fn add(&mut self, artifact: impl Artifact + 'static) -> ArtifactRef {
        self.add_boxed(Box::new(artifact))
    }

    /// Append an already boxed artifact
    pub(crate) fn add_boxed(&mut self, artifact: Box<dyn Artifact>) -> ArtifactRef {
        tracing::debug!(kind = artifact.kind(), id = artifact.id(), "Registering artifact");
        self.entries.push(Entry {
            artifact,
            args: Vec::new(),
            lifecycle: Lifecycle::Loaded,
        });
        ArtifactRef(self.entries.len() - 1)
    }

    /// Number of artifacts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every artifact, in registration order
    pub fn get_all(&self) -> Vec<ArtifactRef> {
        (0..self.entries.len()).map(ArtifactRef).collect()
    }

    /// Artifact behind `artifact`
    ///
    /// # Panics
    /// If the handle came from another registry with more artifacts.
    pub fn get(&self, artifact: ArtifactRef) -> &dyn Artifact {
        self.entries[artifact.0].artifact.as_ref()
    }

    /// Mutable artifact behind `artifact`
    pub fn get_mut(&mut self, artifact: ArtifactRef) -> &mut dyn Artifact {
        self.entries[artifact.0].artifact.as_mut()
    }

    /// Arguments set for the next invocation
    pub fn args(&self, artifact: ArtifactRef) -> &[String] {
        &self.entries[artifact.0].args
    }

    /// Set the arguments passed to the artifact's verbs
    pub(crate) fn set_args(&mut self, artifact: ArtifactRef, args: Vec<String>) {
        self.entries[artifact.0].args = args;
    }

    /// Lifecycle state
    pub fn lifecycle(&self, artifact: ArtifactRef) -> Lifecycle {
        self.entries[artifact.0].lifecycle
    }

    pub(crate) fn set_lifecycle(&mut self, artifact: ArtifactRef, lifecycle: Lifecycle) {
        self.entries[artifact.0].lifecycle = lifecycle;
    }

    /// Find artifacts matching `query`
    ///
    /// Returns an empty list when nothing matches; only a malformed
    /// selector is an error.
    pub fn find(&self, query: &str) -> Result<Vec<ArtifactRef>, SelectorError> {
        let found = match Selector::parse(query)? {
            Selector::Qualified { kind, id } => self.find_qualified(kind, id),
            Selector::Bare(token) => {
                let by_id = self.find_by_id(token);
                if by_id.is_empty() {
                    self.find_by_kind(token)
                        .into_iter()
                        .map(|(artifact, _)| artifact)
                        .collect()
                } else {
                    by_id
                }
            }
        };
        tracing::debug!(query, matches = found.len(), "Artifact lookup");
        Ok(found)
    }

    /// Highest-versioned match for a bare kind query
    ///
    /// Falls back to the first match when no candidate has a numeric version.
    pub fn find_newest(&self, query: &str) -> Result<Option<ArtifactRef>, SelectorError> {
        let Selector::Bare(token) = Selector::parse(query)? else {
            return Ok(self.find(query)?.into_iter().next());
        };

        let by_id = self.find_by_id(token);
        if !by_id.is_empty() {
            return Ok(by_id.into_iter().next());
        }

        let candidates = self.find_by_kind(token);
        let newest = candidates
            .iter()
            .filter_map(|(artifact, version)| Some((*artifact, version.as_semver()?)))
            .max_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(artifact, _)| artifact);

        Ok(newest.or_else(|| candidates.first().map(|(artifact, _)| *artifact)))
    }

    fn find_qualified(&self, kind: &str, id: &str) -> Vec<ArtifactRef> {
        self.matching(|artifact| artifact.kind() == kind && artifact.id() == id)
    }

    fn find_by_id(&self, id: &str) -> Vec<ArtifactRef> {
        self.matching(|artifact| artifact.id() == id)
    }

    fn find_by_kind(&self, token: &str) -> Vec<(ArtifactRef, Version)> {
        let by_prefix: Vec<_> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                match_kind(token, entry.artifact.kind()).map(|version| (ArtifactRef(index), version))
            })
            .collect();

        if by_prefix.is_empty() && self.options.substring_fallback {
            return self
                .matching(|artifact| artifact.kind().contains(token))
                .into_iter()
                .map(|artifact| (artifact, Version::Null))
                .collect();
        }
        by_prefix
    }

    fn matching(&self, predicate: impl Fn(&dyn Artifact) -> bool) -> Vec<ArtifactRef> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| predicate(entry.artifact.as_ref()))
            .map(|(index, _)| ArtifactRef(index))
            .collect()
    }
}
