pub mod call_task;
pub mod dispatch;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the main WebSocket handler to make it easily accessible
// to the binary that will build the web server router.
pub use ws_handler::ws_handler;
pub use rest::{get_catalog, get_history, get_specialty_doctors};

use axum::{routing::get, Router};
use state::AppState;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application router: REST endpoints, the session WebSocket
/// and the Swagger UI.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/catalog", get(get_catalog))
        .route("/catalog/specialties/{id}/doctors", get(get_specialty_doctors))
        .route("/history", get(get_history))
        .route("/ws", get(ws_handler))
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", rest::ApiDoc::openapi()))
}
