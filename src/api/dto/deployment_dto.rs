//! Deployment API DTOs
use serde::{Deserialize, Serialize};

use crate::core::state::runtime::workload::workload_snapshot::WorkloadSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReplicas {
    pub namespace: String,
    pub name: String,
    pub replica_count: i32,
}

impl From<&WorkloadSnapshot> for DeploymentReplicas {
    fn from(snapshot: &WorkloadSnapshot) -> Self {
        Self {
            namespace: snapshot.workload_ref.namespace.clone(),
            name: snapshot.workload_ref.name.clone(),
            replica_count: snapshot.observed_replicas,
        }
    }
}
