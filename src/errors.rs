use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::domain::workload::workload_error::WorkloadError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InternalServerError(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

/// Fatal conditions that keep the service from ever serving requests.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("timed out after {0:?} waiting for the deployment cache to sync")]
    CacheSyncTimeout(Duration),
}

impl From<WorkloadError> for AppError {
    fn from(err: WorkloadError) -> Self {
        let message = err.to_string();
        match err {
            WorkloadError::NotFound { .. } => AppError::NotFound(message),
            WorkloadError::Validation(_) => AppError::BadRequest(message),
            WorkloadError::Conflict(_) => AppError::Conflict(message),
            WorkloadError::Unauthorized(_) => AppError::Forbidden(message),
            WorkloadError::Unavailable(_) => AppError::ServiceUnavailable(message),
            WorkloadError::Internal(_) => AppError::InternalServerError(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Choose status codes per variant
        let status = match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
