//! System controller: readiness and liveness

use axum::extract::State;
use axum::Json;
use http::StatusCode;

use crate::api::dto::system_dto::{HealthzStatus, PingzStatus};
use crate::app_state::AppState;
use crate::domain::system::service::health_service::Readiness;

pub struct SystemController;

impl SystemController {
    pub async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<HealthzStatus>) {
        match state.health_reporter.readiness().await {
            Readiness::Healthy => (StatusCode::OK, Json(HealthzStatus::healthy())),
            Readiness::Unhealthy(reason) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthzStatus::unhealthy(reason)),
            ),
        }
    }

    pub async fn pingz(State(state): State<AppState>) -> Json<PingzStatus> {
        Json(PingzStatus {
            status: state.health_reporter.liveness().to_string(),
        })
    }
}
