use axum::{response::IntoResponse, Router};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::errors::AppError;

/// Build the main application router
pub fn app_router() -> Router<AppState> {
    // Deployment and system routes live under /api/v1
    let api_v1 = Router::new()
        .merge(crate::api::routes::deployment_routes::deployment_routes())
        .merge(crate::api::routes::system_routes::system_routes());

    Router::new()
        .nest("/api/v1", api_v1)
        // Fallback handler for 404
        .fallback(handler_404)
        .layer(TraceLayer::new_for_http())
}

// Handler for 404 Not Found
async fn handler_404() -> impl IntoResponse {
    AppError::NotFound("The requested resource was not found".to_string())
}
