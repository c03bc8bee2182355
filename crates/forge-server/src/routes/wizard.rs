use axum::extract::{Path, State};
use axum::Json;
use std::collections::BTreeMap;

use crate::error::AppError;
use crate::state::AppState;
use forge_core::template::Template;
use forge_core::{generator, metadata, validate};

/// GET /api/templates/:slug/steps — basic wizard steps.
pub async fn get_steps(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let t = Template::load(&root, &slug)?;
        let steps = generator::wizard_steps(&t.content);
        Ok::<_, forge_core::ForgeError>(serde_json::json!({ "steps": steps }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/templates/:slug/steps/enhanced — steps with metadata and guidance.
pub async fn get_enhanced_steps(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let t = Template::load(&root, &slug)?;
        let steps = generator::enhanced_wizard_steps(&t.content);
        Ok::<_, forge_core::ForgeError>(serde_json::json!({ "steps": steps }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct ValidateSectionBody {
    pub section_name: String,
    #[serde(default)]
    pub content: String,
}

/// POST /api/templates/:slug/sections/validate — real-time section check.
pub async fn validate_section(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<ValidateSectionBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let t = Template::load(&root, &slug)?;
        let validation =
            generator::validate_section_in_template(&body.section_name, &body.content, &t.content);
        let resolved = metadata::resolve_section_metadata(&t.content);
        let guidance =
            metadata::section_guidance(&body.section_name, resolved.get(&body.section_name));
        Ok::<_, forge_core::ForgeError>(serde_json::json!({
            "validation": validation,
            "guidance": guidance,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct ValidateVariableBody {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// POST /api/templates/:slug/variables/validate — single variable check.
pub async fn validate_variable(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<ValidateVariableBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let t = Template::load(&root, &slug)?;
        let variable_metadata = metadata::parse_variable_metadata(&t.content);
        let meta = variable_metadata.get(&body.name);
        let (is_valid, errors) = validate::validate_variable_value(&body.name, &body.value, meta);
        Ok::<_, forge_core::ForgeError>(serde_json::json!({
            "variable": body.name,
            "is_valid": is_valid,
            "errors": errors,
            "metadata": meta,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/templates/:slug/guidance/:section — contextual help for a section.
/// Unknown section names return a generic guidance record.
pub async fn get_guidance(
    State(app): State<AppState>,
    Path((slug, section)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let t = Template::load(&root, &slug)?;
        let resolved = metadata::resolve_section_metadata(&t.content);
        let guidance = metadata::section_guidance(&section, resolved.get(&section));
        Ok::<_, forge_core::ForgeError>(serde_json::json!(guidance))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct StatusBody {
    #[serde(default)]
    pub section_values: BTreeMap<String, String>,
    #[serde(default)]
    pub variable_values: BTreeMap<String, String>,
}

/// POST /api/templates/:slug/status — aggregate completion across all steps.
pub async fn get_status(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let t = Template::load(&root, &slug)?;
        let steps = generator::wizard_steps(&t.content);
        let status = generator::completion_status(
            &steps,
            &body.section_values,
            &body.variable_values,
            &t.content,
        );
        Ok::<_, forge_core::ForgeError>(serde_json::json!(status))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
