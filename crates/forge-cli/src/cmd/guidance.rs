use crate::output::print_json;
use anyhow::Context;
use forge_core::metadata;
use forge_core::template::Template;
use std::path::Path;

pub fn run(root: &Path, slug: &str, section: &str, json: bool) -> anyhow::Result<()> {
    let template =
        Template::load(root, slug).with_context(|| format!("template '{slug}' not found"))?;

    let resolved = metadata::resolve_section_metadata(&template.content);
    let guidance = metadata::section_guidance(section, resolved.get(section));

    if json {
        return print_json(&guidance);
    }

    println!("Section: {}", guidance.section_name);
    println!("  {}", guidance.help_text);
    println!(
        "  min words: {}, required: {}, severity: {}",
        guidance.min_words, guidance.required, guidance.validation_severity
    );
    if !guidance.keywords_required.is_empty() {
        println!("  required keywords: {}", guidance.keywords_required.join(", "));
    }
    if !guidance.keywords_recommended.is_empty() {
        println!(
            "  recommended keywords: {}",
            guidance.keywords_recommended.join(", ")
        );
    }
    for example in &guidance.examples {
        println!("  example: {example}");
    }
    Ok(())
}
