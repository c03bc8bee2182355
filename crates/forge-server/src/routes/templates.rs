use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use forge_core::template::Template;

/// GET /api/templates — list all templates.
pub async fn list_templates(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let templates = Template::list(&root)?;
        let list: Vec<serde_json::Value> = templates
            .iter()
            .map(|t| {
                serde_json::json!({
                    "slug": t.slug,
                    "title": t.title,
                    "description": t.description,
                    "roles": t.roles,
                    "workflow_phase": t.workflow_phase,
                    "version": t.version,
                    "variable_count": t.variables.len(),
                    "active": t.active,
                    "updated_at": t.updated_at.to_rfc3339(),
                })
            })
            .collect();
        Ok::<_, forge_core::ForgeError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/templates/:slug — full template detail with structure check.
pub async fn get_template(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let t = Template::load(&root, &slug)?;
        let structure = t.structure();
        Ok::<_, forge_core::ForgeError>(serde_json::json!({
            "slug": t.slug,
            "title": t.title,
            "description": t.description,
            "roles": t.roles,
            "workflow_phase": t.workflow_phase,
            "version": t.version,
            "variables": t.variables,
            "active": t.active,
            "content": t.content,
            "structure": structure,
            "created_at": t.created_at.to_rfc3339(),
            "updated_at": t.updated_at.to_rfc3339(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateTemplateBody {
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub workflow_phase: Option<String>,
}

/// POST /api/templates — store a new template.
pub async fn create_template(
    State(app): State<AppState>,
    Json(body): Json<CreateTemplateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut t = Template::create(&root, body.slug, body.title, body.content)?;
        t.description = body.description;
        t.workflow_phase = body.workflow_phase;
        if !body.roles.is_empty() {
            t.set_roles(body.roles);
        }
        t.save(&root)?;

        Ok::<_, forge_core::ForgeError>(serde_json::json!({
            "slug": t.slug,
            "title": t.title,
            "variables": t.variables,
            "structure": t.structure(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/templates/:slug/archive — deactivate a template.
pub async fn archive_template(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut t = Template::load(&root, &slug)?;
        t.archive();
        t.save(&root)?;
        Ok::<_, forge_core::ForgeError>(serde_json::json!({
            "slug": t.slug,
            "active": t.active,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
