//! Artifact model
//!
//! An artifact is a named, typed buildable unit. Each artifact kind supplies
//! an explicit verb table mapping verbs to handlers; nothing is looked up by
//! method name at runtime.

use std::fmt;

use crate::core::interest::InterestDeclarer;
use crate::core::service::InjectionPoint;
use crate::error::ActionError;

/// A verb an artifact can be asked to perform
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verb {
    Configure,
    Build,
    Clean,
    Install,
    Test,
    Debug,
    /// Kind-specific verb, matched by exact spelling
    Custom(String),
}

impl Verb {
    /// The fixed verb set every buildable artifact exposes
    pub const STANDARD: [Verb; 6] = [
        Verb::Configure,
        Verb::Build,
        Verb::Clean,
        Verb::Install,
        Verb::Test,
        Verb::Debug,
    ];

    /// Parse a verb; standard verbs are case-insensitive
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "configure" => Self::Configure,
            "build" => Self::Build,
            "clean" => Self::Clean,
            "install" => Self::Install,
            "test" => Self::Test,
            "debug" => Self::Debug,
            _ => Self::Custom(name.to_string()),
        }
    }

    /// Canonical spelling
    pub fn as_str(&self) -> &str {
        match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Clean => "clean",
            Self::Install => "install",
            Self::Test => "test",
            Self::Debug => "debug",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifact lifecycle within one process run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Registered, not yet used
    #[default]
    Loaded,
    /// First invocation has set up the artifact's internal state
    Instantiated,
}

/// A buildable unit managed by the engine
pub trait Artifact {
    /// Identity, unique within a kind
    fn id(&self) -> &str;

    /// Kind name used for selector matching, e.g. `GccV2`
    fn kind(&self) -> &str;

    /// Verbs this artifact answers to
    fn verbs(&self) -> Vec<Verb>;

    /// Whether the artifact answers to `verb`
    fn supports(&self, verb: &Verb) -> bool {
        self.verbs().contains(verb)
    }

    /// Run `verb` with the per-invocation arguments
    fn invoke(&mut self, verb: &Verb, args: &[String]) -> Result<(), ActionError>;

    /// Called once, before the first invocation
    fn instantiate(&mut self) -> Result<(), ActionError> {
        Ok(())
    }

    /// Service slots to fill before each invocation
    fn injection_points(&mut self) -> Vec<InjectionPoint<'_>> {
        Vec::new()
    }

    /// Declare configuration interests during the declare phase
    fn check_configuration(&self, _declarer: &mut InterestDeclarer<'_>) {}

    /// One-line usage text
    fn usage(&self) -> String {
        String::new()
    }
}

/// The standard verb set, with "not implemented" defaults
pub trait Buildable {
    fn configure(&mut self, _args: &[String]) -> Result<(), ActionError> {
        not_implemented(&Verb::Configure);
        Ok(())
    }

    fn build(&mut self, _args: &[String]) -> Result<(), ActionError> {
        not_implemented(&Verb::Build);
        Ok(())
    }

    fn clean(&mut self, _args: &[String]) -> Result<(), ActionError> {
        not_implemented(&Verb::Clean);
        Ok(())
    }

    fn install(&mut self, _args: &[String]) -> Result<(), ActionError> {
        not_implemented(&Verb::Install);
        Ok(())
    }

    fn test(&mut self, _args: &[String]) -> Result<(), ActionError> {
        not_implemented(&Verb::Test);
        Ok(())
    }

    fn debug(&mut self, _args: &[String]) -> Result<(), ActionError> {
        not_implemented(&Verb::Debug);
        Ok(())
    }
}

fn not_implemented(verb: &Verb) {
    tracing::warn!("{verb} not implemented");
}

/// Verb handler for artifact kind `A`
pub type Handler<A> = fn(&mut A, &[String]) -> Result<(), ActionError>;

/// Explicit verb to handler table for one artifact kind
///
/// Artifacts implement [`Artifact::verbs`] and [`Artifact::invoke`] by
/// delegating to a table:
///
/// ```
/// use crazy_build::core::artifact::{Artifact, Buildable, Verb, VerbTable};
/// use crazy_build::error::ActionError;
///
/// struct Firmware;
///
/// impl Buildable for Firmware {}
///
/// impl Firmware {
///     fn flash(&mut self, _args: &[String]) -> Result<(), ActionError> {
///         Ok(())
///     }
///
///     fn table() -> VerbTable<Self> {
///         VerbTable::buildable().with(Verb::Custom("flash".into()), Self::flash)
///     }
/// }
///
/// impl Artifact for Firmware {
///     fn id(&self) -> &str { "default" }
///     fn kind(&self) -> &str { "Firmware" }
///     fn verbs(&self) -> Vec<Verb> { Self::table().verbs() }
///     fn invoke(&mut self, verb: &Verb, args: &[String]) -> Result<(), ActionError> {
///         Self::table().dispatch(self, verb, args)
///     }
/// }
///
/// let mut firmware = Firmware;
/// assert!(firmware.supports(&Verb::parse("flash")));
/// assert!(firmware.invoke(&Verb::Build, &[]).is_ok());
/// ```
pub struct VerbTable<A> {
    entries: Vec<(Verb, Handler<A>)>,
}

impl<A> VerbTable<A> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace the handler for `verb`
    #[must_use]
    pub fn with(mut self, verb: Verb, handler: Handler<A>) -> Self {
        match self.entries.iter_mut().find(|(v, _)| *v == verb) {
            Some(entry) => entry.1 = handler,
            None => self.entries.push((verb, handler)),
        }
        self
    }

    /// Verbs in table order
    pub fn verbs(&self) -> Vec<Verb> {
        self.entries.iter().map(|(verb, _)| verb.clone()).collect()
    }

    /// Handler for `verb`, if any
    pub fn lookup(&self, verb: &Verb) -> Option<Handler<A>> {
        self.entries
            .iter()
            .find(|(v, _)| v == verb)
            .map(|(_, handler)| *handler)
    }

    /// Run the handler for `verb` on `target`
    pub fn dispatch(&self, target: &mut A, verb: &Verb, args: &[String]) -> Result<(), ActionError> {
        let handler = self
            .lookup(verb)
            .ok_or_else(|| ActionError::UnsupportedVerb {
                verb: verb.to_string(),
            })?;
        handler(target, args)
    }
}

impl<A: Buildable> VerbTable<A> {
    /// Table pre-filled with the six standard verbs
    pub fn buildable() -> Self {
        Self::new()
            .with(Verb::Configure, A::configure)
            .with(Verb::Build, A::build)
            .with(Verb::Clean, A::clean)
            .with(Verb::Install, A::install)
            .with(Verb::Test, A::test)
            .with(Verb::Debug, A::debug)
    }
}

impl<A> Default for VerbTable<A> {
    fn default() -> Self {
        Self::new()
    }
}
