//! CLI implementation for `cbt call`

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::cli::commands::Settings;
use crate::cli::output::{create_command_bar, print_info, print_success};
use crate::core::context::Declarations;
use crate::core::engine::{Engine, ExecutionEvent};

/// Execute the call command
pub fn execute(settings: &Settings, declarations: Declarations, commands: &[String], dry_run: bool) -> Result<()> {
    let workspace = settings.load_workspace()?;
    let engine = settings.engine(&workspace, declarations);

    if dry_run {
        for command in commands {
            let plan = engine
                .plan(command)
                .with_context(|| format!("Failed to plan {command}"))?;
            if plan.is_empty() {
                print_info(&format!("{command} is already done"));
            }
            for step in plan {
                println!("{step}");
            }
        }
        return Ok(());
    }

    run(engine, commands)
}

/// Run `commands` in order, with a progress bar over pending commands
pub fn run(engine: Engine, commands: &[String]) -> Result<()> {
    let mut pending = HashSet::new();
    for command in commands {
        let plan = engine
            .plan(command)
            .with_context(|| format!("Failed to run {command}"))?;
        pending.extend(plan);
    }

    let bar = create_command_bar(pending.len() as u64);
    let progress = bar.clone();
    let ran = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&ran);
    let mut engine = engine.with_observer(move |event| match event {
        ExecutionEvent::Started(command) => progress.set_message(command.clone()),
        ExecutionEvent::Finished(_) => {
            counter.set(counter.get() + 1);
            progress.inc(1);
        }
        ExecutionEvent::Skipped(_) => {}
    });

    for command in commands {
        if let Err(e) = engine.call(command) {
            bar.abandon();
            return Err(e).with_context(|| format!("Failed to run {command}"));
        }
    }
    bar.finish_and_clear();

    match ran.get() {
        0 => print_info("Nothing to do"),
        count => print_success(&format!("Ran {count} command(s)")),
    }
    Ok(())
}
