use axum::extract::{Path, State};
use axum::Json;
use std::collections::BTreeMap;

use crate::error::AppError;
use crate::state::AppState;
use forge_core::prompt::GeneratedPrompt;
use forge_core::template::Template;
use forge_core::{compliance, generator};

fn default_save() -> bool {
    true
}

#[derive(serde::Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub section_values: BTreeMap<String, String>,
    #[serde(default)]
    pub variable_values: BTreeMap<String, String>,
    #[serde(default = "default_save")]
    pub save: bool,
}

/// POST /api/templates/:slug/generate — generate a document, validate it,
/// and optionally persist the result.
pub async fn generate(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let t = Template::load(&root, &slug)?;
        let (content, validations) =
            generator::generate_document(&t.content, &body.section_values, &body.variable_values);
        let report = compliance::validate_with_metadata(&content, &t.content);

        let prompt_id = if body.save {
            let prompt = GeneratedPrompt::new(
                &t.slug,
                &content,
                body.variable_values.clone(),
                report.is_compliant,
                report.score,
            );
            prompt.save(&root)?;
            Some(prompt.id)
        } else {
            None
        };

        Ok::<_, forge_core::ForgeError>(serde_json::json!({
            "id": prompt_id,
            "content": content,
            "validations": validations,
            "compliance": report,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/prompts — generation history, newest first.
pub async fn list_prompts(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let prompts = GeneratedPrompt::list(&root)?;
        let list: Vec<serde_json::Value> = prompts
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
        Ok::<_, forge_core::ForgeError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/prompts/:id — one stored generation.
pub async fn get_prompt(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let p = GeneratedPrompt::load(&root, &id)?;
        Ok::<_, forge_core::ForgeError>(serde_json::json!({
            "id": p.id,
            "template_slug": p.template_slug,
            "content": p.content,
            "variable_values": p.variable_values,
            "is_compliant": p.is_compliant,
            "score": p.score,
            "created_at": p.created_at.to_rfc3339(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
