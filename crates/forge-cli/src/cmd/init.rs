use anyhow::Context;
use forge_core::workspace;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing forge in: {}", root.display());

    let outcome = workspace::init(root).context("failed to initialize workspace")?;

    if outcome.created_config {
        println!("  created: .forge/config.yaml");
    } else {
        println!("  exists:  .forge/config.yaml");
    }
    println!("  templates: .forge/templates/");
    println!("  prompts:   .forge/prompts/");
    println!("\nNext: forge template add <slug> --file <template.md>");
    Ok(())
}
