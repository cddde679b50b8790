//! CLI implementation for `cbt stamps`

use anyhow::Result;
use clap::Subcommand;

use crate::cli::commands::Settings;
use crate::cli::output::{print_info, print_success, print_warning};
use crate::core::stamps::StampStore;

/// Stamp subcommands
#[derive(Subcommand, Debug)]
pub enum StampCommands {
    /// List stamped commands
    List,

    /// Remove one stamp, or all of them
    Clear {
        /// Command whose stamp to remove
        command: Option<String>,
    },
}

/// Execute a stamps subcommand; lists when none is given
pub fn execute(settings: &Settings, command: Option<StampCommands>) -> Result<()> {
    let workspace = settings.load_workspace()?;
    let stamps = StampStore::new(workspace.stamp_dir());

    match command.unwrap_or(StampCommands::List) {
        StampCommands::List => {
            let done = stamps.list()?;
            if done.is_empty() {
                print_info("No stamps");
            }
            for command in done {
                println!("{command}");
            }
        }
        StampCommands::Clear { command: Some(command) } => {
            if stamps.clear(&command)? {
                print_success(&format!("Cleared stamp for {command}"));
            } else {
                print_warning(&format!("No stamp for {command}"));
            }
        }
        StampCommands::Clear { command: None } => {
            let cleared = stamps.clear_all()?;
            print_success(&format!("Cleared {cleared} stamp(s)"));
        }
    }
    Ok(())
}
