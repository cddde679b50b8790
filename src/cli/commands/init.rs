//! CLI implementation for `cbt init`

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{print_detail, print_info, print_success};
use crate::infra::workspace::Workspace;

/// Execute the init command
pub fn execute(path: &Path) -> Result<()> {
    let created = Workspace::init(path)
        .with_context(|| format!("Failed to initialize workspace in {}", path.display()))?;

    if created {
        print_success(&format!("Initialized workspace in {}", path.display()));
        print_detail("Created .crazy_build/config.json");
    } else {
        print_info(&format!("Workspace already initialized in {}", path.display()));
    }
    Ok(())
}
