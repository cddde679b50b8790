//! Services and injection
//!
//! A service is a capability provider. Artifacts declare typed service
//! slots ([`Slot`]) together with a free-form requirement string; before
//! each dispatch the [`Injector`] fills every slot with the first registered
//! service that
//!
//! 1. provides the slot's capability type,
//! 2. satisfies the requirement, and
//! 3. is available.
//!
//! Capability types are trait-object types such as `dyn Compiler`. A service
//! lists the capabilities it provides when it is registered:
//!
//! ```
//! use crazy_build::core::service::{AllocationToken, Service, ServiceRegistry};
//!
//! trait Compiler: Service {
//!     fn triple(&self) -> &str;
//! }
//!
//! struct Gcc;
//!
//! impl Service for Gcc {
//!     fn name(&self) -> &str { "gcc" }
//!     fn allocate(&self) -> AllocationToken { AllocationToken(0) }
//!     fn deallocate(&self, _token: AllocationToken) {}
//!     fn is_available(&self) -> bool { true }
//!     fn satisfies(&self, _requirement: &str) -> bool { true }
//! }
//!
//! impl Compiler for Gcc {
//!     fn triple(&self) -> &str { "x86_64-linux-gnu" }
//! }
//!
//! let mut services = ServiceRegistry::new();
//! services.register(Gcc).provides::<dyn Compiler>(|gcc| gcc);
//! assert_eq!(services.len(), 1);
//! ```

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::rc::Rc;

use crate::core::artifact::Artifact;
use crate::error::{ActionError, ServiceError};

/// Token handed out by [`Service::allocate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocationToken(pub u32);

/// Contract every service exposes
///
/// The injector only reads [`Service::is_available`] and
/// [`Service::satisfies`]; allocation is managed by whoever uses the
/// service.
pub trait Service {
    /// Name used in logs and listings
    fn name(&self) -> &str;

    /// Allocate the service for a user
    fn allocate(&self) -> AllocationToken;

    /// Release an allocation
    fn deallocate(&self, token: AllocationToken);

    /// Whether the service can currently be allocated
    fn is_available(&self) -> bool;

    /// Whether the service meets `requirement`
    fn satisfies(&self, requirement: &str) -> bool;
}

/// Parsed `key=value, key=value` requirement string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    pairs: Vec<(String, String)>,
}

impl Requirement {
    /// Parse a requirement; empty items are skipped, items without `=`
    /// become keys with an empty value
    pub fn parse(requirement: &str) -> Self {
        let pairs = requirement
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| match item.split_once('=') {
                Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
                None => (item.to_string(), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// Value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether every requested key is present in `properties` with the same value
    pub fn is_met_by(&self, properties: &[(&str, &str)]) -> bool {
        self.pairs.iter().all(|(key, value)| {
            properties
                .iter()
                .any(|(k, v)| *k == key.as_str() && *v == value.as_str())
        })
    }

    /// Whether the requirement is empty
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

struct View {
    capability: TypeId,
    // always an `Rc<T>` where `TypeId::of::<T>() == capability`
    value: Box<dyn Any>,
}

struct Registration {
    service: Rc<dyn Service>,
    views: Vec<View>,
}

impl Registration {
    fn view(&self, capability: TypeId) -> Option<&dyn Any> {
        self.views
            .iter()
            .find(|view| view.capability == capability)
            .map(|view| view.value.as_ref())
    }
}

/// Registered services, in registration order
#[derive(Default)]
pub struct ServiceRegistry {
    registrations: Vec<Registration>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service instance
    ///
    /// Every service provides `dyn Service`; further capabilities are added
    /// with [`ServiceBuilder::provides`]. Duplicates are not checked.
    pub fn register<S: Service + 'static>(&mut self, service: S) -> ServiceBuilder<'_, S> {
        let service = Rc::new(service);
        let base: Rc<dyn Service> = service.clone();
        tracing::debug!(service = base.name(), "Registering service");
        self.registrations.push(Registration {
            service: Rc::clone(&base),
            views: vec![View {
                capability: TypeId::of::<dyn Service>(),
                value: Box::new(base),
            }],
        });
        let index = self.registrations.len() - 1;
        ServiceBuilder {
            registry: self,
            index,
            service,
        }
    }

    /// Number of registered services
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether no service is registered
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Service names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.registrations
            .iter()
            .map(|registration| registration.service.name())
            .collect()
    }

    /// First service eligible for `capability` and `requirement`
    fn first_eligible(
        &self,
        capability: TypeId,
        requirement: &str,
    ) -> Option<(&dyn Service, &dyn Any)> {
        self.registrations.iter().find_map(|registration| {
            let view = registration.view(capability)?;
            let service = registration.service.as_ref();
            (service.satisfies(requirement) && service.is_available()).then_some((service, view))
        })
    }
}

/// Adds capabilities to a freshly registered service
pub struct ServiceBuilder<'r, S> {
    registry: &'r mut ServiceRegistry,
    index: usize,
    service: Rc<S>,
}

impl<S: Service + 'static> ServiceBuilder<'_, S> {
    /// Declare that the service provides capability `T`
    ///
    /// `upcast` converts the concrete service into the capability object,
    /// usually just `|s| s`.
    pub fn provides<T: ?Sized + 'static>(mut self, upcast: fn(Rc<S>) -> Rc<T>) -> Self {
        let view: Rc<T> = upcast(Rc::clone(&self.service));
        self.registry.registrations[self.index].views.push(View {
            capability: TypeId::of::<T>(),
            value: Box::new(view),
        });
        self
    }
}

/// Typed service slot on an artifact
pub struct Slot<T: ?Sized> {
    value: Option<Rc<T>>,
}

impl<T: ?Sized + 'static> Slot<T> {
    /// Create an unbound slot
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Bound service, if any
    pub fn get(&self) -> Option<&T> {
        self.value.as_deref()
    }

    /// Bound service, or [`ActionError::MissingService`]
    pub fn require(&self) -> Result<&T, ActionError> {
        self.get().ok_or_else(|| ActionError::MissingService {
            capability: type_name::<T>().to_string(),
        })
    }

    /// Whether a service is bound
    pub fn is_bound(&self) -> bool {
        self.value.is_some()
    }
}

impl<T: ?Sized + 'static> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("bound", &self.value.is_some())
            .finish()
    }
}

/// Type-erased slot the injector can fill
pub trait Bindable {
    /// Capability type the slot accepts
    fn capability(&self) -> TypeId;

    /// Readable capability name
    fn capability_name(&self) -> &'static str;

    /// Bind from a registered view; false if the view has another type
    fn bind_view(&mut self, view: &dyn Any) -> bool;

    /// Whether the slot is bound
    fn is_bound(&self) -> bool;
}

impl<T: ?Sized + 'static> Bindable for Slot<T> {
    fn capability(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn capability_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn bind_view(&mut self, view: &dyn Any) -> bool {
        match view.downcast_ref::<Rc<T>>() {
            Some(service) => {
                self.value = Some(Rc::clone(service));
                true
            }
            None => false,
        }
    }

    fn is_bound(&self) -> bool {
        self.value.is_some()
    }
}

/// A slot plus the requirement a service must satisfy to fill it
pub struct InjectionPoint<'a> {
    requirement: String,
    slot: &'a mut dyn Bindable,
}

impl<'a> InjectionPoint<'a> {
    /// Declare an injection point
    pub fn new(requirement: impl Into<String>, slot: &'a mut dyn Bindable) -> Self {
        Self {
            requirement: requirement.into(),
            slot,
        }
    }

    /// Requirement string
    pub fn requirement(&self) -> &str {
        &self.requirement
    }

    /// Capability name of the slot
    pub fn capability_name(&self) -> &'static str {
        self.slot.capability_name()
    }
}

/// A successful binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub capability: &'static str,
    pub requirement: String,
    pub service: String,
}

/// An injection point no service qualified for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unbound {
    pub capability: &'static str,
    pub requirement: String,
}

/// Outcome of binding one artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    pub bound: Vec<Binding>,
    pub unbound: Vec<Unbound>,
}

/// Binds registered services into artifact slots
pub struct Injector<'r> {
    services: &'r ServiceRegistry,
    strict: bool,
}

impl<'r> Injector<'r> {
    /// Create an injector over `services`
    pub fn new(services: &'r ServiceRegistry) -> Self {
        Self {
            services,
            strict: false,
        }
    }

    /// Fail on unmatched injection points instead of leaving them unbound
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Fill every injection point of `artifact`
    ///
    /// Unmatched points stay as they were and are listed in the report; in
    /// strict mode the first unmatched point is an error.
    pub fn bind(&self, artifact: &mut dyn Artifact) -> Result<BindReport, ServiceError> {
        let artifact_id = artifact.id().to_string();
        let mut report = BindReport::default();

        for mut point in artifact.injection_points() {
            let capability = point.slot.capability_name();
            let bound_to = self
                .services
                .first_eligible(point.slot.capability(), &point.requirement)
                .and_then(|(service, view)| point.slot.bind_view(view).then_some(service));

            if let Some(service) = bound_to {
                tracing::debug!(
                    artifact = %artifact_id,
                    capability,
                    service = service.name(),
                    "Bound service"
                );
                report.bound.push(Binding {
                    capability,
                    requirement: point.requirement,
                    service: service.name().to_string(),
                });
                continue;
            }

            if self.strict {
                return Err(ServiceError::Unmatched {
                    artifact: artifact_id,
                    capability: capability.to_string(),
                    requirement: point.requirement,
                });
            }
            tracing::warn!(
                artifact = %artifact_id,
                capability,
                requirement = %point.requirement,
                "No service matches requirement, leaving it unbound"
            );
            report.unbound.push(Unbound {
                capability,
                requirement: point.requirement,
            });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::Verb;
    use std::cell::Cell;

    trait Compiler: Service {
        fn triple(&self) -> &str;
    }

    trait Emulator: Service {}

    struct Toolchain {
        name: &'static str,
        triple: &'static str,
        available: Cell<bool>,
    }

    impl Toolchain {
        fn new(name: &'static str, triple: &'static str) -> Self {
            Self {
                name,
                triple,
                available: Cell::new(true),
            }
        }
    }

    impl Service for Toolchain {
        fn name(&self) -> &str {
            self.name
        }

        fn allocate(&self) -> AllocationToken {
            self.available.set(false);
            AllocationToken(1)
        }

        fn deallocate(&self, _token: AllocationToken) {
            self.available.set(true);
        }

        fn is_available(&self) -> bool {
            self.available.get()
        }

        fn satisfies(&self, requirement: &str) -> bool {
            Requirement::parse(requirement).is_met_by(&[("target", self.triple)])
        }
    }

    impl Compiler for Toolchain {
        fn triple(&self) -> &str {
            self.triple
        }
    }

    #[derive(Default)]
    struct Consumer {
        compiler: Slot<dyn Compiler>,
        emulator: Slot<dyn Emulator>,
        requirement: String,
    }

    impl Artifact for Consumer {
        fn id(&self) -> &str {
            "consumer"
        }

        fn kind(&self) -> &str {
            "Consumer"
        }

        fn verbs(&self) -> Vec<Verb> {
            Vec::new()
        }

        fn invoke(&mut self, verb: &Verb, _args: &[String]) -> Result<(), ActionError> {
            Err(ActionError::UnsupportedVerb {
                verb: verb.to_string(),
            })
        }

        fn injection_points(&mut self) -> Vec<InjectionPoint<'_>> {
            vec![
                InjectionPoint::new(self.requirement.clone(), &mut self.compiler),
                InjectionPoint::new("", &mut self.emulator),
            ]
        }
    }

    fn consumer(requirement: &str) -> Consumer {
        Consumer {
            requirement: requirement.to_string(),
            ..Consumer::default()
        }
    }

    #[test]
    fn test_requirement_parse() {
        let req = Requirement::parse("target=x86_64-pc-linux-gnu, host=mipsel-unknown-linux,");
        assert_eq!(req.get("target"), Some("x86_64-pc-linux-gnu"));
        assert_eq!(req.get("host"), Some("mipsel-unknown-linux"));
        assert_eq!(req.get("missing"), None);
    }

    #[test]
    fn test_requirement_is_met_by() {
        let req = Requirement::parse("target=arm");
        assert!(req.is_met_by(&[("target", "arm"), ("host", "x86")]));
        assert!(!req.is_met_by(&[("target", "x86")]));
        assert!(Requirement::parse("").is_met_by(&[]));
    }

    #[test]
    fn test_binds_only_satisfying_service() {
        let mut services = ServiceRegistry::new();
        services
            .register(Toolchain::new("x86", "x86_64"))
            .provides::<dyn Compiler>(|s| s);
        services
            .register(Toolchain::new("arm", "arm"))
            .provides::<dyn Compiler>(|s| s);

        let mut artifact = consumer("target=arm");
        let report = Injector::new(&services).bind(&mut artifact).unwrap();

        assert_eq!(artifact.compiler.get().map(|c| c.triple()), Some("arm"));
        assert_eq!(report.bound.len(), 1);
        assert_eq!(report.bound[0].service, "arm");
    }

    #[test]
    fn test_first_eligible_wins() {
        let mut services = ServiceRegistry::new();
        services
            .register(Toolchain::new("first", "arm"))
            .provides::<dyn Compiler>(|s| s);
        services
            .register(Toolchain::new("second", "arm"))
            .provides::<dyn Compiler>(|s| s);

        let mut artifact = consumer("target=arm");
        let report = Injector::new(&services).bind(&mut artifact).unwrap();

        assert_eq!(report.bound[0].service, "first");
    }

    #[test]
    fn test_unavailable_service_skipped() {
        let mut services = ServiceRegistry::new();
        let busy = Toolchain::new("busy", "arm");
        busy.allocate();
        services.register(busy).provides::<dyn Compiler>(|s| s);
        services
            .register(Toolchain::new("idle", "arm"))
            .provides::<dyn Compiler>(|s| s);

        let mut artifact = consumer("target=arm");
        let report = Injector::new(&services).bind(&mut artifact).unwrap();

        assert_eq!(report.bound[0].service, "idle");
    }

    #[test]
    fn test_incompatible_capability_not_bound() {
        let mut services = ServiceRegistry::new();
        services
            .register(Toolchain::new("x86", "x86_64"))
            .provides::<dyn Compiler>(|s| s);

        let mut artifact = consumer("target=x86_64");
        let report = Injector::new(&services).bind(&mut artifact).unwrap();

        assert!(artifact.compiler.is_bound());
        assert!(!artifact.emulator.is_bound());
        assert_eq!(report.unbound.len(), 1);
        assert!(report.unbound[0].capability.contains("Emulator"));
    }

    #[test]
    fn test_no_match_leaves_slot_unbound() {
        let mut services = ServiceRegistry::new();
        services
            .register(Toolchain::new("x86", "x86_64"))
            .provides::<dyn Compiler>(|s| s);

        let mut artifact = consumer("target=riscv");
        let report = Injector::new(&services).bind(&mut artifact).unwrap();

        assert!(!artifact.compiler.is_bound());
        assert_eq!(report.unbound.len(), 2);
        assert!(artifact.compiler.require().is_err());
    }

    #[test]
    fn test_strict_mode_reports_unmatched() {
        let services = ServiceRegistry::new();
        let mut artifact = consumer("target=riscv");
        let err = Injector::new(&services)
            .strict(true)
            .bind(&mut artifact)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unmatched { artifact, .. } if artifact == "consumer"));
    }

    #[test]
    fn test_every_service_provides_base_capability() {
        let mut services = ServiceRegistry::new();
        services.register(Toolchain::new("plain", "arm"));

        let mut slot: Slot<dyn Service> = Slot::new();
        let (_, view) = services
            .first_eligible(TypeId::of::<dyn Service>(), "")
            .unwrap();
        assert!(slot.bind_view(view));
        assert_eq!(slot.get().map(|s| s.name()), Some("plain"));
        assert_eq!(services.names(), vec!["plain"]);
    }
}
