//! System routes (e.g., /api/v1/healthz)

use axum::{routing::get, Router};

use crate::api::controller::system::SystemController;
use crate::app_state::AppState;

pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(SystemController::healthz))
        .route("/pingz", get(SystemController::pingz))
}
