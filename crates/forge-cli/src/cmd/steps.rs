use crate::output::print_json;
use anyhow::Context;
use forge_core::generator;
use forge_core::template::Template;
use std::path::Path;

pub fn run(root: &Path, slug: &str, enhanced: bool, json: bool) -> anyhow::Result<()> {
    let template =
        Template::load(root, slug).with_context(|| format!("template '{slug}' not found"))?;

    let steps = if enhanced {
        generator::enhanced_wizard_steps(&template.content)
    } else {
        generator::wizard_steps(&template.content)
    };

    if json {
        return print_json(&steps);
    }

    if steps.is_empty() {
        println!("No sections detected in template '{slug}'.");
        return Ok(());
    }

    for step in &steps {
        println!("{}. {} (level {})", step.step_number, step.section_name, step.level);
        if !step.description.is_empty() {
            println!("   {}", step.description);
        }
        if !step.variables.is_empty() {
            println!("   variables: {}", step.variables.join(", "));
        }
        if let Some(meta) = &step.metadata {
            println!(
                "   rules: min {} words, severity {}{}",
                meta.min_words,
                meta.validation_severity,
                if meta.required { ", required" } else { "" }
            );
        }
    }
    Ok(())
}
