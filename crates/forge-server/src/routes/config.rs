use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use forge_core::config::ForgeConfig;

/// GET /api/config — read-only view of `.forge/config.yaml`.
///
/// No PUT endpoint — config is a committed YAML file; changes go through the
/// normal edit-commit workflow.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = ForgeConfig::load(&root)?;
        let json = serde_json::to_value(&config)?;
        Ok::<_, forge_core::ForgeError>(json)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
