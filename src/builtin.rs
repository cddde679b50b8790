//! Artifacts and services declared by the `cbt` binary
//!
//! `Greeter` (id `default`) prints through two injected services:
//! `Greeter.print` uses [`HelloApi`], `Greeter.print2` uses [`WorldApi`] and
//! depends on `Greeter.print`. Projects embedding the library declare their
//! own artifacts instead.

use crate::core::artifact::{Artifact, Buildable, Verb, VerbTable};
use crate::core::context::Declarations;
use crate::core::interest::InterestDeclarer;
use crate::core::service::{AllocationToken, InjectionPoint, Requirement, Service, Slot};
use crate::error::ActionError;

/// Requirement both greeter slots declare
pub const GREETER_REQUIREMENT: &str = "target=x86_64-pc-linux-gnu, host=mipsel-unknown-linux,";

const TARGET: &str = "x86_64-pc-linux-gnu";
const HOST: &str = "mipsel-unknown-linux";

/// Prints the first half of the greeting
pub trait HelloApi: Service {
    fn print_hello(&self);
}

/// Prints the second half of the greeting
pub trait WorldApi: Service {
    fn print_world(&self);
}

/// Service providing [`HelloApi`]
#[derive(Debug, Clone)]
pub struct HelloService {
    target: String,
    host: String,
}

impl HelloService {
    pub fn new(target: &str, host: &str) -> Self {
        Self {
            target: target.to_string(),
            host: host.to_string(),
        }
    }
}

impl Service for HelloService {
    fn name(&self) -> &str {
        "hello"
    }

    fn allocate(&self) -> AllocationToken {
        AllocationToken(0)
    }

    fn deallocate(&self, _token: AllocationToken) {}

    fn is_available(&self) -> bool {
        true
    }

    fn satisfies(&self, requirement: &str) -> bool {
        Requirement::parse(requirement)
            .is_met_by(&[("target", self.target.as_str()), ("host", self.host.as_str())])
    }
}

impl HelloApi for HelloService {
    fn print_hello(&self) {
        println!("Hello");
    }
}

/// Service providing [`WorldApi`]
#[derive(Debug, Clone)]
pub struct WorldService {
    target: String,
    host: String,
}

impl WorldService {
    pub fn new(target: &str, host: &str) -> Self {
        Self {
            target: target.to_string(),
            host: host.to_string(),
        }
    }
}

impl Service for WorldService {
    fn name(&self) -> &str {
        "world"
    }

    fn allocate(&self) -> AllocationToken {
        AllocationToken(0)
    }

    fn deallocate(&self, _token: AllocationToken) {}

    fn is_available(&self) -> bool {
        true
    }

    fn satisfies(&self, requirement: &str) -> bool {
        Requirement::parse(requirement)
            .is_met_by(&[("target", self.target.as_str()), ("host", self.host.as_str())])
    }
}

impl WorldApi for WorldService {
    fn print_world(&self) {
        println!("World");
    }
}

/// The binary's default artifact
#[derive(Debug, Default)]
pub struct Greeter {
    hello: Slot<dyn HelloApi>,
    world: Slot<dyn WorldApi>,
}

impl Greeter {
    pub fn new() -> Self {
        Self::default()
    }

    fn table() -> VerbTable<Self> {
        VerbTable::buildable()
            .with(Verb::Custom("print".to_string()), Self::print)
            .with(Verb::Custom("print2".to_string()), Self::print2)
    }

    fn print(&mut self, _args: &[String]) -> Result<(), ActionError> {
        self.hello.require()?.print_hello();
        Ok(())
    }

    fn print2(&mut self, _args: &[String]) -> Result<(), ActionError> {
        self.world.require()?.print_world();
        Ok(())
    }
}

impl Buildable for Greeter {}

impl Artifact for Greeter {
    fn id(&self) -> &str {
        "default"
    }

    fn kind(&self) -> &str {
        "Greeter"
    }

    fn verbs(&self) -> Vec<Verb> {
        Self::table().verbs()
    }

    fn invoke(&mut self, verb: &Verb, args: &[String]) -> Result<(), ActionError> {
        Self::table().dispatch(self, verb, args)
    }

    fn injection_points(&mut self) -> Vec<InjectionPoint<'_>> {
        vec![
            InjectionPoint::new(GREETER_REQUIREMENT, &mut self.hello),
            InjectionPoint::new(GREETER_REQUIREMENT, &mut self.world),
        ]
    }

    fn check_configuration(&self, declarer: &mut InterestDeclarer<'_>) {
        declarer.i_want_to_configure("greeting");
    }

    fn usage(&self) -> String {
        "Prints a greeting through the hello and world services".to_string()
    }
}

/// Declare the built-in artifacts, services and dependencies
pub fn declare(declarations: &mut Declarations) {
    declarations.add(Greeter::new());
    declarations
        .register_service(HelloService::new(TARGET, HOST))
        .provides::<dyn HelloApi>(|s| s);
    declarations
        .register_service(WorldService::new(TARGET, HOST))
        .provides::<dyn WorldApi>(|s| s);
    declarations.depends("Greeter.print2", ["Greeter.print"]);
}
