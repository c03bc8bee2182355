use crate::output::print_json;
use anyhow::Context;
use forge_core::template::Template;
use forge_core::compliance;
use std::path::Path;

pub fn run(
    root: &Path,
    file: &Path,
    template_slug: Option<&str>,
    role: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let report = match template_slug {
        Some(slug) => {
            let template = Template::load(root, slug)
                .with_context(|| format!("template '{slug}' not found"))?;
            compliance::validate_with_metadata(&content, &template.content)
        }
        None => compliance::validate_document(&content),
    };

    let role_check = role.map(|r| compliance::validate_for_role(&content, r));

    if json {
        return print_json(&serde_json::json!({
            "report": report,
            "role_check": role_check,
        }));
    }

    println!(
        "{}: score {}/100, {}",
        file.display(),
        report.score,
        if report.is_compliant { "compliant" } else { "NOT compliant" }
    );
    for section in &report.missing_sections {
        println!("  missing: {section}");
    }
    for variable in &report.unreplaced_variables {
        println!("  unreplaced: {variable}");
    }
    for issue in &report.issues {
        println!("  error: {issue}");
    }
    for warning in &report.warnings {
        println!("  warn:  {warning}");
    }
    if let Some(check) = role_check {
        println!("  role:  {}", check.message);
    }

    if !report.is_compliant {
        anyhow::bail!("document is not compliant");
    }
    Ok(())
}
