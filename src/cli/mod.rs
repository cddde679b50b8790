//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no orchestration logic - that belongs in [`crate::core`].

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::defaults::ENV_WORKSPACE;
use crate::core::context::Declarations;
use crate::core::global_config::GlobalConfig;
use crate::core::registry::FindOptions;
use crate::infra::dirs::CbtDirs;
use commands::{Commands, Settings};

/// cbt - build orchestration with stamped commands and injected services
///
/// Runs artifact verbs through their declared dependencies, once per
/// workspace.
#[derive(Parser, Debug)]
#[command(name = "cbt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Workspace root (defaults to the nearest directory containing .crazy_build)
    #[arg(long, global = true, env = ENV_WORKSPACE)]
    pub workspace: Option<PathBuf>,

    /// Run commands even if they are stamped as done
    #[arg(long, global = true)]
    pub ignore_stamps: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command against `declarations`
    pub fn run(self, declarations: Declarations) -> Result<()> {
        let Some(command) = self.command else {
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            return Ok(());
        };

        let dirs = CbtDirs::new();
        let global = GlobalConfig::load(&dirs)
            .with_context(|| format!("Failed to load {}", dirs.global_config_path().display()))?;
        output::set_quiet(self.quiet || global.quiet());

        let settings = Settings {
            workspace: self.workspace,
            ignore_stamps: self.ignore_stamps || global.ignore_stamps(),
            strict_services: global.strict_services(),
            find: FindOptions {
                substring_fallback: global.substring_fallback(),
            },
        };
        command.run(&settings, declarations)
    }
}
