//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod call;
pub mod env;
pub mod init;
pub mod ls;
pub mod stamps;
pub mod verb;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use crate::config::defaults::DEFAULT_SELECTOR;
use crate::core::artifact::Verb;
use crate::core::context::Declarations;
use crate::core::engine::Engine;
use crate::core::registry::FindOptions;
use crate::core::stamps::StampStore;
use crate::infra::workspace::{Workspace, WorkspaceResolver};

/// Effective options after merging flags with the global config
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub workspace: Option<PathBuf>,
    pub ignore_stamps: bool,
    pub strict_services: bool,
    pub find: FindOptions,
}

impl Settings {
    /// Load the workspace named by `--workspace`, or the enclosing one
    pub fn load_workspace(&self) -> Result<Workspace> {
        let cwd = std::env::current_dir()?;
        Workspace::discover(self.workspace.as_deref(), &cwd).context("Failed to load workspace")
    }

    /// Seal `declarations` and build an engine over `workspace`'s stamps
    pub fn engine(&self, workspace: &impl WorkspaceResolver, declarations: Declarations) -> Engine {
        let mut context = declarations.finish();
        context.set_find_options(self.find);
        let stamps = StampStore::new(workspace.stamp_dir_path()).ignoring_stamps(self.ignore_stamps);
        Engine::new(context, stamps).strict_services(self.strict_services)
    }
}

/// Selector and forwarded arguments for verb commands
#[derive(Args, Debug, Clone)]
pub struct VerbArgs {
    /// Artifact selector: ID, KIND or KIND:ID
    #[arg(default_value = DEFAULT_SELECTOR)]
    pub selector: String,

    /// Arguments passed to the verb; ${VAR} is resolved from the workspace
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a workspace in the current directory
    Init,

    /// List artifacts, or the ones matching a selector
    Ls {
        /// Artifact selector
        selector: Option<String>,
    },

    /// Run the configure verb
    Configure(VerbArgs),

    /// Run the build verb
    Build(VerbArgs),

    /// Run the clean verb
    Clean(VerbArgs),

    /// Run the install verb
    Install(VerbArgs),

    /// Run the test verb
    Test(VerbArgs),

    /// Run the debug verb
    Debug(VerbArgs),

    /// Run commands of the form SELECTOR.VERB
    Call {
        /// Print what would run without running it
        #[arg(long)]
        dry_run: bool,

        /// Commands to run, in order
        #[arg(required = true)]
        commands: Vec<String>,
    },

    /// Inspect or clear completion stamps
    Stamps {
        #[command(subcommand)]
        command: Option<stamps::StampCommands>,
    },

    /// Show or set workspace variables
    Env {
        #[command(subcommand)]
        command: Option<env::EnvCommands>,
    },
}

impl Commands {
    /// Execute the command
    pub fn run(self, settings: &Settings, declarations: Declarations) -> Result<()> {
        match self {
            Self::Init => {
                let path = match &settings.workspace {
                    Some(path) => path.clone(),
                    None => std::env::current_dir()?,
                };
                init::execute(&path)
            }
            Self::Ls { selector } => ls::execute(settings, declarations, selector.as_deref()),
            Self::Configure(args) => verb::execute(settings, declarations, &Verb::Configure, &args),
            Self::Build(args) => verb::execute(settings, declarations, &Verb::Build, &args),
            Self::Clean(args) => verb::execute(settings, declarations, &Verb::Clean, &args),
            Self::Install(args) => verb::execute(settings, declarations, &Verb::Install, &args),
            Self::Test(args) => verb::execute(settings, declarations, &Verb::Test, &args),
            Self::Debug(args) => verb::execute(settings, declarations, &Verb::Debug, &args),
            Self::Call { dry_run, commands } => {
                call::execute(settings, declarations, &commands, dry_run)
            }
            Self::Stamps { command } => stamps::execute(settings, command),
            Self::Env { command } => env::execute(settings, command),
        }
    }
}
