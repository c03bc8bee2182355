use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use forge_core::compliance;
use forge_core::template::Template;

#[derive(serde::Deserialize)]
pub struct ValidateBody {
    pub content: String,
    /// When set, validation resolves rules from the stored template instead
    /// of using the fixed quick-tier checks.
    #[serde(default)]
    pub template_slug: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// POST /api/validate — compliance-check a finished document.
pub async fn validate_document(
    State(app): State<AppState>,
    Json(body): Json<ValidateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let report = match &body.template_slug {
            Some(slug) => {
                let t = Template::load(&root, slug)?;
                compliance::validate_with_metadata(&body.content, &t.content)
            }
            None => compliance::validate_document(&body.content),
        };

        let role_check = body
            .role
            .as_deref()
            .map(|role| compliance::validate_for_role(&body.content, role));

        Ok::<_, forge_core::ForgeError>(serde_json::json!({
            "report": report,
            "role_check": role_check,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
