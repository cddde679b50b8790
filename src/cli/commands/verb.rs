//! CLI implementation for the verb commands (`cbt build` etc.)

use anyhow::{Context, Result};

use crate::cli::commands::{call, Settings, VerbArgs};
use crate::core::artifact::Verb;
use crate::core::command::Command;
use crate::core::context::Declarations;

/// Run `verb` on the selection through the engine
pub fn execute(settings: &Settings, declarations: Declarations, verb: &Verb, args: &VerbArgs) -> Result<()> {
    let workspace = settings.load_workspace()?;
    let mut engine = settings.engine(&workspace, declarations);

    if !args.args.is_empty() {
        let resolved: Vec<String> = args.args.iter().map(|arg| workspace.resolve(arg)).collect();
        let targets = engine
            .context()
            .artifacts()
            .find(&args.selector)
            .with_context(|| format!("Failed to select '{}'", args.selector))?;
        for target in targets {
            engine.context_mut().set_args(target, resolved.clone());
        }
    }

    call::run(engine, &[Command::format(&args.selector, verb)])
}
