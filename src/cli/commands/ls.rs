//! CLI implementation for `cbt ls`

use anyhow::Result;

use crate::cli::commands::Settings;
use crate::cli::output::{print_detail, print_warning};
use crate::core::context::Declarations;
use crate::core::version::split_kind;

/// List the registry, or the artifacts matching `selector`
pub fn execute(settings: &Settings, declarations: Declarations, selector: Option<&str>) -> Result<()> {
    let mut context = declarations.finish();
    context.set_find_options(settings.find);
    let registry = context.artifacts();

    let selected = match selector {
        Some(selector) => registry.find(selector)?,
        None => registry.get_all(),
    };
    if selected.is_empty() {
        print_warning("No artifacts found");
        return Ok(());
    }

    for artifact in selected {
        let artifact = registry.get(artifact);
        let (_, version) = split_kind(artifact.kind());
        let verbs: Vec<String> = artifact.verbs().iter().map(ToString::to_string).collect();
        println!(
            "{}:{}  version {}  verbs: {}",
            artifact.kind(),
            artifact.id(),
            version,
            verbs.join(", ")
        );
        let usage = artifact.usage();
        if !usage.is_empty() {
            print_detail(&usage);
        }
    }
    Ok(())
}
