use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use forge_core::template::Template;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum TemplateSubcommand {
    /// Add a template from a markdown file
    Add {
        slug: String,
        /// Path to the markdown template
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Agent role tag (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,
        /// Workflow phase tag
        #[arg(long)]
        phase: Option<String>,
    },
    /// List all templates
    List,
    /// Show template details
    Show { slug: String },
    /// Validate a template's own body against its metadata rules
    Validate { slug: String },
    /// Archive a template
    Archive { slug: String },
}

pub fn run(root: &Path, subcmd: TemplateSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TemplateSubcommand::Add {
            slug,
            file,
            title,
            description,
            roles,
            phase,
        } => add(root, &slug, &file, title, description, roles, phase, json),
        TemplateSubcommand::List => list(root, json),
        TemplateSubcommand::Show { slug } => show(root, &slug, json),
        TemplateSubcommand::Validate { slug } => validate(root, &slug, json),
        TemplateSubcommand::Archive { slug } => archive(root, &slug, json),
    }
}

#[allow(clippy::too_many_arguments)]
fn add(
    root: &Path,
    slug: &str,
    file: &Path,
    title: Option<String>,
    description: Option<String>,
    roles: Vec<String>,
    phase: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let title = title.unwrap_or_else(|| slug.replace('-', " "));

    let mut template = Template::create(root, slug, &title, content)
        .with_context(|| format!("failed to create template '{slug}'"))?;
    template.description = description;
    template.workflow_phase = phase;
    if !roles.is_empty() {
        template.set_roles(roles);
    }
    template.save(root).context("failed to save template")?;

    let structure = template.structure();
    if json {
        print_json(&serde_json::json!({
            "slug": template.slug,
            "title": template.title,
            "variables": template.variables,
            "structure": structure,
        }))?;
        return Ok(());
    }

    println!("Added template: {slug} — {title}");
    println!("  variables: {}", template.variables.join(", "));
    if structure.is_valid {
        println!("  structure: ok");
    } else {
        println!(
            "  structure: missing {}",
            structure.missing_sections.join(", ")
        );
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let templates = Template::list(root).context("failed to list templates")?;

    if json {
        let summaries: Vec<_> = templates
            .iter()
            .map(|t| {
                serde_json::json!({
                    "slug": t.slug,
                    "title": t.title,
                    "roles": t.roles,
                    "workflow_phase": t.workflow_phase,
                    "active": t.active,
                    "variables": t.variables,
                })
            })
            .collect();
        return print_json(&summaries);
    }

    if templates.is_empty() {
        println!("No templates yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = templates
        .iter()
        .map(|t| {
            vec![
                t.slug.clone(),
                t.roles.join(","),
                if t.active { String::new() } else { "archived".to_string() },
                t.title.clone(),
            ]
        })
        .collect();
    print_table(&["SLUG", "ROLES", "STATUS", "TITLE"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let template =
        Template::load(root, slug).with_context(|| format!("template '{slug}' not found"))?;

    if json {
        return print_json(&serde_json::json!({
            "slug": template.slug,
            "title": template.title,
            "description": template.description,
            "roles": template.roles,
            "workflow_phase": template.workflow_phase,
            "version": template.version,
            "variables": template.variables,
            "active": template.active,
            "content": template.content,
        }));
    }

    println!("Template: {} — {}", template.slug, template.title);
    if let Some(desc) = &template.description {
        println!("  {desc}");
    }
    println!("  roles:     {}", template.roles.join(", "));
    println!("  variables: {}", template.variables.join(", "));
    println!("  active:    {}", template.active);
    println!("\n{}", template.content);
    Ok(())
}

fn validate(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let template =
        Template::load(root, slug).with_context(|| format!("template '{slug}' not found"))?;
    let report = template.compliance();

    if json {
        return print_json(&report);
    }

    println!(
        "Template '{slug}': score {}/100, {}",
        report.score,
        if report.is_compliant { "compliant" } else { "NOT compliant" }
    );
    for issue in &report.issues {
        println!("  error: {issue}");
    }
    for warning in &report.warnings {
        println!("  warn:  {warning}");
    }
    Ok(())
}

fn archive(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut template =
        Template::load(root, slug).with_context(|| format!("template '{slug}' not found"))?;
    template.archive();
    template.save(root).context("failed to save template")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "active": false }))?;
    } else {
        println!("Archived template: {slug}");
    }
    Ok(())
}
