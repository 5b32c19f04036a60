use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::workload::workload_error::WorkloadError;

/// Body of a replica update: `{"replicaCount": <int>}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DesiredReplicaRequest {
    #[validate(
        required(message = "missing replicaCount"),
        range(
            min = 0,
            max = 2147483647,
            message = "replicaCount must be a non-negative 32-bit integer"
        )
    )]
    pub replica_count: Option<i64>,
}

impl DesiredReplicaRequest {
    pub fn new(replica_count: i64) -> Self {
        Self {
            replica_count: Some(replica_count),
        }
    }

    /// Decodes an already size-limited request body.
    pub fn from_body(body: &[u8]) -> Result<Self, WorkloadError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(WorkloadError::Validation("Empty request body".to_string()));
        }
        serde_json::from_slice(body).map_err(|e| {
            WorkloadError::Validation(format!("Unable to decode request body: {e}"))
        })
    }

    /// Validates the request and yields the replica count to submit.
    pub fn desired_replicas(&self) -> Result<i32, WorkloadError> {
        self.validate().map_err(|e| {
            WorkloadError::Validation(format!("missing or invalid replicaCount: {e}"))
        })?;
        self.replica_count
            .and_then(|count| i32::try_from(count).ok())
            .ok_or_else(|| WorkloadError::Validation("missing or invalid replicaCount".to_string()))
    }
}
