use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use forge_core::prompt::GeneratedPrompt;
use std::path::Path;

#[derive(Subcommand)]
pub enum PromptSubcommand {
    /// List generation history, newest first
    List,
    /// Show one generated prompt
    Show { id: String },
}

pub fn run(root: &Path, subcmd: PromptSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PromptSubcommand::List => list(root, json),
        PromptSubcommand::Show { id } => show(root, &id, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let prompts = GeneratedPrompt::list(root).context("failed to list prompts")?;

    if json {
        let summaries: Vec<_> = prompts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "template_slug": p.template_slug,
                    "is_compliant": p.is_compliant,
                    "score": p.score,
                    "created_at": p.created_at.to_rfc3339(),
                })
            })
            .collect();
        return print_json(&summaries);
    }

    if prompts.is_empty() {
        println!("No prompts generated yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = prompts
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.template_slug.clone(),
                p.score.to_string(),
                p.created_at.to_rfc3339(),
            ]
        })
        .collect();
    print_table(&["ID", "TEMPLATE", "SCORE", "CREATED"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let prompt =
        GeneratedPrompt::load(root, id).with_context(|| format!("prompt '{id}' not found"))?;

    if json {
        return print_json(&prompt);
    }

    println!(
        "Prompt {} (template: {}, score: {}/100)",
        prompt.id, prompt.template_slug, prompt.score
    );
    println!("\n{}", prompt.content);
    Ok(())
}
