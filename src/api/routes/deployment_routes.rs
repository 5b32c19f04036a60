//! Deployment routes (e.g., /api/v1/deployments/*)

use axum::{routing::get, Router};

use crate::api::controller::deployment::DeploymentController;
use crate::app_state::AppState;

pub fn deployment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/deployments",
            get(DeploymentController::list_deployments)
                .fallback(DeploymentController::list_method_not_allowed),
        )
        .route(
            "/deployments/{namespace}/{name}/replicas",
            get(DeploymentController::get_replicas)
                .put(DeploymentController::put_replicas)
                .fallback(DeploymentController::method_not_allowed),
        )
}
