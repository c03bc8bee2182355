use crate::output::print_json;
use anyhow::Context;
use forge_core::prompt::GeneratedPrompt;
use forge_core::template::Template;
use forge_core::{compliance, generator};
use std::collections::BTreeMap;
use std::path::Path;

pub fn run(
    root: &Path,
    slug: &str,
    vars: &[String],
    sections: &[String],
    out: Option<&Path>,
    no_save: bool,
    json: bool,
) -> anyhow::Result<()> {
    let template =
        Template::load(root, slug).with_context(|| format!("template '{slug}' not found"))?;

    let variable_values = parse_pairs(vars, "--var")?;
    let section_values = parse_pairs(sections, "--section")?;

    let (content, validations) =
        generator::generate_document(&template.content, &section_values, &variable_values);
    let report = compliance::validate_with_metadata(&content, &template.content);

    if let Some(path) = out {
        std::fs::write(path, &content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let prompt_id = if no_save {
        None
    } else {
        let prompt = GeneratedPrompt::new(
            slug,
            &content,
            variable_values,
            report.is_compliant,
            report.score,
        );
        prompt.save(root).context("failed to save prompt")?;
        Some(prompt.id)
    };

    if json {
        return print_json(&serde_json::json!({
            "id": prompt_id,
            "content": content,
            "validations": validations,
            "compliance": report,
        }));
    }

    if out.is_none() {
        println!("{content}");
        println!("---");
    }
    println!(
        "Compliance: score {}/100, {}",
        report.score,
        if report.is_compliant { "compliant" } else { "NOT compliant" }
    );
    for issue in &report.issues {
        println!("  error: {issue}");
    }
    for warning in &report.warnings {
        println!("  warn:  {warning}");
    }
    if let Some(id) = prompt_id {
        println!("Saved prompt: {id}");
    }
    Ok(())
}

/// Parse repeated `NAME=VALUE` arguments into a map.
fn parse_pairs(pairs: &[String], flag: &str) -> anyhow::Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("{flag} expects NAME=VALUE, got '{pair}'"))?;
        map.insert(name.to_string(), value.to_string());
    }
    Ok(map)
}
