//! Router assembly for the Snipbox API.

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    auth::{login, logout, require_session},
    execute::execute,
    projects::{create_project, delete_project, get_project, list_projects, update_project},
    state::AppState,
};

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router.
///
/// Everything except `/health` and login sits behind the Auth Gate, which
/// runs before any handler touches a store or the runner.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/execute", post(execute))
        .route("/api/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health`: liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}
