use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::state::runtime::workload::workload_snapshot::WorkloadRef;

/// Errors of a direct call to the API server, already classified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("deployment {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("request to the API server timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Internal(String),
}

/// Applies a replica count straight to the API server.
///
/// Implementations never touch the local cache; it catches up when the
/// change comes back through the watch. No retries happen here.
#[async_trait]
pub trait WriteGateway: Send + Sync {
    /// Returns the submitted replica count on success.
    async fn apply(&self, workload_ref: &WorkloadRef, replicas: i32) -> Result<i32, GatewayError>;
}
