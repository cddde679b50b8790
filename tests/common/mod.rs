//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a temporary
//! workspace with a helper to run the `cbt` binary in it, a recording
//! artifact and a configurable compiler service.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::rc::Rc;

use crazy_build::core::artifact::{Artifact, Buildable, Verb, VerbTable};
use crazy_build::core::service::{AllocationToken, InjectionPoint, Requirement, Service, Slot};
use crazy_build::error::ActionError;
use tempfile::TempDir;

/// Test project context
///
/// A temporary directory used as workspace, with its own global config
/// directory so the user's config never leaks into tests.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create a test project that is already a workspace
    pub fn initialized() -> Self {
        let project = Self::new();
        project.create_dir(".crazy_build");
        project.create_file(".crazy_build/config.json", r#"{"env":{}}"#);
        project
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Global config directory used by [`TestProject::cbt`]
    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("user-config")
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Whether `command` is stamped in this workspace
    pub fn is_stamped(&self, command: &str) -> bool {
        self.file_exists(&format!(".crazy_build/stamps/{command}"))
    }

    /// Run `cbt` with `args` inside the project directory
    pub fn cbt(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_cbt"))
            .current_dir(self.path())
            .env("CBT_CONFIG_DIR", self.config_dir())
            .env_remove("CBT_WORKSPACE")
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("Failed to execute cbt")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Stdout of a finished command
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr of a finished command
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Shared log written by [`Recorder`]s
pub type Trace = Rc<RefCell<Vec<String>>>;

/// Capability used by [`Recorder::needing_compiler`]
pub trait Compiler: Service {
    fn triple(&self) -> &str;
}

/// Compiler service matching `target=<triple>` requirements
pub struct Toolchain {
    name: String,
    triple: String,
    available: bool,
}

impl Toolchain {
    pub fn new(name: &str, triple: &str) -> Self {
        Self {
            name: name.to_string(),
            triple: triple.to_string(),
            available: true,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

impl Service for Toolchain {
    fn name(&self) -> &str {
        &self.name
    }

    fn allocate(&self) -> AllocationToken {
        AllocationToken(1)
    }

    fn deallocate(&self, _token: AllocationToken) {}

    fn is_available(&self) -> bool {
        self.available
    }

    fn satisfies(&self, requirement: &str) -> bool {
        Requirement::parse(requirement).is_met_by(&[("target", self.triple.as_str())])
    }
}

impl Compiler for Toolchain {
    fn triple(&self) -> &str {
        &self.triple
    }
}

/// Buildable artifact that records every verb into a [`Trace`]
///
/// Entries read `<kind>.<verb>`, with `@<triple>` appended when a compiler
/// is bound and the arguments appended after a space.
pub struct Recorder {
    kind: String,
    id: String,
    trace: Trace,
    requirement: Option<String>,
    compiler: Slot<dyn Compiler>,
}

impl Recorder {
    pub fn new(kind: &str, id: &str, trace: &Trace) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
            trace: Rc::clone(trace),
            requirement: None,
            compiler: Slot::new(),
        }
    }

    /// Declare a compiler injection point with `requirement`
    pub fn needing_compiler(mut self, requirement: &str) -> Self {
        self.requirement = Some(requirement.to_string());
        self
    }

    fn table() -> VerbTable<Self> {
        VerbTable::buildable()
            .with(Verb::Custom("package".to_string()), Self::package)
            .with(Verb::Custom("compile".to_string()), Self::compile)
    }

    fn package(&mut self, args: &[String]) -> Result<(), ActionError> {
        self.record("package", args)
    }

    fn compile(&mut self, args: &[String]) -> Result<(), ActionError> {
        self.compiler.require()?;
        self.record("compile", args)
    }

    fn record(&mut self, verb: &str, args: &[String]) -> Result<(), ActionError> {
        let mut entry = format!("{}.{verb}", self.kind);
        if let Some(compiler) = self.compiler.get() {
            entry.push('@');
            entry.push_str(compiler.triple());
        }
        if !args.is_empty() {
            entry.push(' ');
            entry.push_str(&args.join(" "));
        }
        self.trace.borrow_mut().push(entry);
        Ok(())
    }
}

impl Buildable for Recorder {
    fn configure(&mut self, args: &[String]) -> Result<(), ActionError> {
        self.record("configure", args)
    }

    fn build(&mut self, args: &[String]) -> Result<(), ActionError> {
        self.record("build", args)
    }

    fn install(&mut self, args: &[String]) -> Result<(), ActionError> {
        self.record("install", args)
    }
}

impl Artifact for Recorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn verbs(&self) -> Vec<Verb> {
        Self::table().verbs()
    }

    fn invoke(&mut self, verb: &Verb, args: &[String]) -> Result<(), ActionError> {
        Self::table().dispatch(self, verb, args)
    }

    fn injection_points(&mut self) -> Vec<InjectionPoint<'_>> {
        match &self.requirement {
            Some(requirement) => vec![InjectionPoint::new(requirement.clone(), &mut self.compiler)],
            None => Vec::new(),
        }
    }
}
