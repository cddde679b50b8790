//! Declare phase and the process-scoped context
//!
//! Everything the engine consults is collected in [`Declarations`] first:
//! artifacts, services and dependency edges. [`Declarations::finish`] runs
//! the configuration-interest declare pass over the whole registry and
//! seals the result into a [`Context`]. An [`Engine`] can only be built from
//! a `Context`, so no command runs while declarations are still open.
//!
//! [`Engine`]: crate::core::engine::Engine

use crate::core::artifact::Artifact;
use crate::core::interest::ConfigurationInterest;
use crate::core::registry::{ArtifactRef, ArtifactRegistry, FindOptions};
use crate::core::resolver::DependencyMap;
use crate::core::service::{Service, ServiceBuilder, ServiceRegistry};

/// Open declare phase
#[derive(Default)]
pub struct Declarations {
    artifacts: ArtifactRegistry,
    services: ServiceRegistry,
    dependencies: DependencyMap,
}

impl Declarations {
    /// Start a declare phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artifact
    pub fn add(&mut self, artifact: impl Artifact + 'static) -> ArtifactRef {
        self.artifacts.add(artifact)
    }

    /// Register a boxed artifact
    pub fn add_boxed(&mut self, artifact: Box<dyn Artifact>) -> ArtifactRef {
        self.artifacts.add_boxed(artifact)
    }

    /// Declare prerequisites for `command`
    pub fn depends<I, S>(&mut self, command: &str, dependencies: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.depends(command, dependencies);
    }

    /// Register a service instance
    pub fn register_service<S: Service + 'static>(&mut self, service: S) -> ServiceBuilder<'_, S> {
        self.services.register(service)
    }

    /// Artifacts declared so far
    pub fn artifacts(&self) -> &ArtifactRegistry {
        &self.artifacts
    }

    /// Close the declare phase
    pub fn finish(self) -> Context {
        let interest = ConfigurationInterest::declare_all(&self.artifacts);
        tracing::debug!(
            artifacts = self.artifacts.len(),
            services = self.services.len(),
            dependencies = self.dependencies.len(),
            "Declare phase complete"
        );
        Context {
            artifacts: self.artifacts,
            services: self.services,
            dependencies: self.dependencies,
            interest,
        }
    }
}

/// Sealed declarations the engine runs against
pub struct Context {
    artifacts: ArtifactRegistry,
    services: ServiceRegistry,
    dependencies: DependencyMap,
    interest: ConfigurationInterest,
}

impl Context {
    /// Artifact registry
    pub fn artifacts(&self) -> &ArtifactRegistry {
        &self.artifacts
    }

    /// Set the arguments passed to `artifact`'s verbs
    ///
    /// The registry itself stays sealed; arguments are the only per-artifact
    /// state that may change after the declare phase.
    pub fn set_args(&mut self, artifact: ArtifactRef, args: Vec<String>) {
        self.artifacts.set_args(artifact, args);
    }

    /// Service registry
    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Dependency declarations
    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// Configuration interests from the declare phase
    pub fn interest(&self) -> &ConfigurationInterest {
        &self.interest
    }

    /// Set the selector matching policy
    pub fn set_find_options(&mut self, options: FindOptions) {
        self.artifacts.set_options(options);
    }

    pub(crate) fn split_mut(&mut self) -> (&mut ArtifactRegistry, &ServiceRegistry) {
        (&mut self.artifacts, &self.services)
    }
}
