//! Execution engine
//!
//! [`Engine::call`] runs one command, `<selector>.<verb>`:
//!
//! 1. Skip it if it is stamped, or already completed by this engine.
//! 2. Resolve the selector; every resolved artifact must answer the verb.
//! 3. Call each declared prerequisite, depth first, in declaration order.
//! 4. Bind services into each resolved artifact.
//! 5. Dispatch the verb on each resolved artifact, instantiating it first
//!    if this is its first invocation.
//! 6. Write the stamp.
//!
//! Any error aborts the whole chain. The failing command and everything
//! waiting on it stay unstamped, so the next run retries from there while
//! already stamped prerequisites are skipped.
//!
//! Execution is sequential. A prerequisite reachable through several paths
//! runs once: later paths find its stamp, or with stamps ignored, find it in
//! the set of commands this engine already completed.

use std::collections::HashSet;

use crate::core::artifact::{Lifecycle, Verb};
use crate::core::command::Command;
use crate::core::context::Context;
use crate::core::registry::ArtifactRef;
use crate::core::service::Injector;
use crate::core::stamps::StampStore;
use crate::error::{EngineError, SelectorError};

/// Progress notifications from [`Engine::call`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    /// Command was already done
    Skipped(String),
    /// Prerequisites finished, verb about to be dispatched
    Started(String),
    /// Verb succeeded and the stamp is written
    Finished(String),
}

type Observer = Box<dyn FnMut(&ExecutionEvent)>;

/// Runs commands against a sealed [`Context`]
pub struct Engine {
    context: Context,
    stamps: StampStore,
    strict_services: bool,
    observer: Option<Observer>,
    in_progress: Vec<String>,
    completed: HashSet<String>,
}

impl Engine {
    /// Create an engine over `context`, recording completion in `stamps`
    pub fn new(context: Context, stamps: StampStore) -> Self {
        Self {
            context,
            stamps,
            strict_services: false,
            observer: None,
            in_progress: Vec::new(),
            completed: HashSet::new(),
        }
    }

    /// Fail when an injection point has no eligible service
    #[must_use]
    pub fn strict_services(mut self, strict: bool) -> Self {
        self.strict_services = strict;
        self
    }

    /// Receive an [`ExecutionEvent`] for every skipped, started and
    /// finished command
    #[must_use]
    pub fn with_observer(mut self, observer: impl FnMut(&ExecutionEvent) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Context the engine runs against
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Mutable context, for setting artifact arguments between calls
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Stamp store
    pub fn stamps(&self) -> &StampStore {
        &self.stamps
    }

    /// Run `command` and, first, everything it depends on
    pub fn call(&mut self, command: &str) -> Result<(), EngineError> {
        if self.completed.contains(command) || self.stamps.is_done(command) {
            tracing::info!("{command} already done, skipping");
            self.emit(ExecutionEvent::Skipped(command.to_string()));
            return Ok(());
        }
        check_cycle(&self.in_progress, command)?;

        let parsed = Command::parse(command)?;
        let targets = self.resolve(&parsed)?;

        self.in_progress.push(command.to_string());
        let result = self.run(command, &parsed.verb, &targets);
        self.in_progress.pop();
        result
    }

    /// Commands [`Engine::call`] would run for `command`, in order
    ///
    /// Done commands are left out; every other command appears once.
    pub fn plan(&self, command: &str) -> Result<Vec<String>, EngineError> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut order = Vec::new();
        self.visit(command, &mut visited, &mut path, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        command: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<(), EngineError> {
        if visited.contains(command)
            || self.completed.contains(command)
            || self.stamps.is_done(command)
        {
            return Ok(());
        }
        check_cycle(path, command)?;
        self.resolve(&Command::parse(command)?)?;

        path.push(command.to_string());
        for dependency in self.context.dependencies().dependencies_of(command) {
            self.visit(dependency, visited, path, order)?;
        }
        path.pop();

        visited.insert(command.to_string());
        order.push(command.to_string());
        Ok(())
    }

    fn resolve(&self, command: &Command) -> Result<Vec<ArtifactRef>, EngineError> {
        let artifacts = self.context.artifacts();
        let targets = artifacts.find(&command.selector)?;
        if targets.is_empty() {
            return Err(SelectorError::NotFound {
                selector: command.selector.clone(),
            }
            .into());
        }

        let unsupported = targets
            .iter()
            .map(|target| artifacts.get(*target))
            .find(|artifact| !artifact.supports(&command.verb));
        if let Some(artifact) = unsupported {
            return Err(SelectorError::UnknownVerb {
                artifact: format!("{}:{}", artifact.kind(), artifact.id()),
                verb: command.verb.to_string(),
            }
            .into());
        }

        Ok(targets)
    }

    fn run(&mut self, command: &str, verb: &Verb, targets: &[ArtifactRef]) -> Result<(), EngineError> {
        let dependencies = self
            .context
            .dependencies()
            .dependencies_of(command)
            .to_vec();
        for dependency in &dependencies {
            self.call(dependency)?;
        }

        tracing::info!("Running {command}");
        self.emit(ExecutionEvent::Started(command.to_string()));
        for target in targets {
            self.dispatch(command, *target, verb)?;
        }

        self.stamps.mark_done(command)?;
        self.completed.insert(command.to_string());
        self.emit(ExecutionEvent::Finished(command.to_string()));
        Ok(())
    }

    fn dispatch(&mut self, command: &str, target: ArtifactRef, verb: &Verb) -> Result<(), EngineError> {
        let strict = self.strict_services;
        let (artifacts, services) = self.context.split_mut();
        Injector::new(services)
            .strict(strict)
            .bind(artifacts.get_mut(target))?;

        let failed = |source| EngineError::ActionFailed {
            command: command.to_string(),
            source,
        };

        if artifacts.lifecycle(target) == Lifecycle::Loaded {
            artifacts.get_mut(target).instantiate().map_err(failed)?;
            artifacts.set_lifecycle(target, Lifecycle::Instantiated);
        }

        let args = artifacts.args(target).to_vec();
        artifacts.get_mut(target).invoke(verb, &args).map_err(failed)
    }

    fn emit(&mut self, event: ExecutionEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }
}

fn check_cycle(path: &[String], command: &str) -> Result<(), EngineError> {
    match path.iter().position(|c| c == command) {
        Some(start) => {
            let mut cycle = path[start..].to_vec();
            cycle.push(command.to_string());
            Err(EngineError::DependencyCycle { cycle })
        }
        None => Ok(()),
    }
}
