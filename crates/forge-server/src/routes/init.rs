use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use forge_core::workspace;

/// POST /api/init — create the `.forge/` layout and default config.
pub async fn init_project(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let outcome = workspace::init(&root)?;
        Ok::<_, forge_core::ForgeError>(serde_json::json!({
            "project": outcome.config.project.name,
            "created_config": outcome.created_config,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
