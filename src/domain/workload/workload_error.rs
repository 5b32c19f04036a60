use thiserror::Error;

use crate::domain::workload::write_gateway::GatewayError;

/// Outcome taxonomy of a deployment request, independent of the wire format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkloadError {
    #[error("Deployment {name} in namespace {namespace} does not exist")]
    NotFound { namespace: String, name: String },

    #[error("{0}")]
    Validation(String),

    #[error("Conflict while updating deployment: {0}")]
    Conflict(String),

    #[error("Not authorized to update deployment: {0}")]
    Unauthorized(String),

    #[error("Cluster unavailable: {0}")]
    Unavailable(String),

    #[error("Error while updating deployment: {0}")]
    Internal(String),
}

impl From<GatewayError> for WorkloadError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound { namespace, name } => Self::NotFound { namespace, name },
            GatewayError::Conflict(msg) => Self::Conflict(msg),
            GatewayError::Unauthorized(msg) => Self::Unauthorized(msg),
            GatewayError::Unavailable(msg) => Self::Unavailable(msg),
            timeout @ GatewayError::Timeout(_) => Self::Unavailable(timeout.to_string()),
            GatewayError::Internal(msg) => Self::Internal(msg),
        }
    }
}
