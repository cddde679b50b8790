//! CLI implementation for `cbt env`

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::cli::commands::Settings;
use crate::cli::output::{print_info, print_success};

/// Workspace variable subcommands
#[derive(Subcommand, Debug)]
pub enum EnvCommands {
    /// Set a workspace variable
    Set {
        /// Variable name
        key: String,

        /// Value; ${VAR} references are resolved
        value: String,

        /// Do not write the variable to config.json
        #[arg(long)]
        no_persist: bool,
    },
}

/// Dump the workspace config, or set a variable
pub fn execute(settings: &Settings, command: Option<EnvCommands>) -> Result<()> {
    let mut workspace = settings.load_workspace()?;

    match command {
        None => {
            let json = serde_json::to_string_pretty(workspace.config())
                .context("Failed to serialize workspace config")?;
            println!("{json}");
        }
        Some(EnvCommands::Set { key, value, no_persist }) => {
            workspace.set_var(&key, &value, !no_persist);
            let resolved = workspace.get(&key).unwrap_or_default().to_string();
            if no_persist {
                print_info(&format!("{key}={resolved} (not persisted)"));
            } else {
                workspace
                    .save()
                    .with_context(|| format!("Failed to write {}", workspace.config_file().display()))?;
                print_success(&format!("Set {key}={resolved}"));
            }
        }
    }
    Ok(())
}
