//! cbt - build orchestration CLI
//!
//! Entry point for the cbt command-line application.

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use crazy_build::builtin;
use crazy_build::cli::output::display_error;
use crazy_build::cli::Cli;
use crazy_build::core::context::Declarations;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut declarations = Declarations::new();
    builtin::declare(&mut declarations);

    match cli.run(declarations) {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
