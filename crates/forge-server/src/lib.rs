pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Templates
        .route("/api/templates", get(routes::templates::list_templates))
        .route("/api/templates", post(routes::templates::create_template))
        .route("/api/templates/{slug}", get(routes::templates::get_template))
        .route(
            "/api/templates/{slug}/archive",
            post(routes::templates::archive_template),
        )
        // Wizard
        .route("/api/templates/{slug}/steps", get(routes::wizard::get_steps))
        .route(
            "/api/templates/{slug}/steps/enhanced",
            get(routes::wizard::get_enhanced_steps),
        )
        .route(
            "/api/templates/{slug}/sections/validate",
            post(routes::wizard::validate_section),
        )
        .route(
            "/api/templates/{slug}/variables/validate",
            post(routes::wizard::validate_variable),
        )
        .route(
            "/api/templates/{slug}/guidance/{section}",
            get(routes::wizard::get_guidance),
        )
        .route(
            "/api/templates/{slug}/status",
            post(routes::wizard::get_status),
        )
        // Generation
        .route(
            "/api/templates/{slug}/generate",
            post(routes::prompts::generate),
        )
        .route("/api/prompts", get(routes::prompts::list_prompts))
        .route("/api/prompts/{id}", get(routes::prompts::get_prompt))
        // Document validation
        .route("/api/validate", post(routes::validate::validate_document))
        // Config
        .route("/api/config", get(routes::config::get_config))
        // Init
        .route("/api/init", post(routes::init::init_project))
        .layer(cors)
        .with_state(app_state)
}

/// Start the forge web API server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0`
/// and the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("forge API server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
