use std::sync::Arc;

use tracing::{info, warn};

use crate::api::dto::deployment_dto::DeploymentReplicas;
use crate::core::state::runtime::workload::workload_cache::WorkloadCache;
use crate::core::state::runtime::workload::workload_snapshot::{WorkloadRef, WorkloadSnapshot};
use crate::domain::workload::dto::desired_replica_request::DesiredReplicaRequest;
use crate::domain::workload::workload_error::WorkloadError;
use crate::domain::workload::write_gateway::WriteGateway;

/// Reads are served from the cache, writes go to the API server directly.
pub struct WorkloadService {
    cache: WorkloadCache,
    gateway: Arc<dyn WriteGateway>,
}

impl WorkloadService {
    pub fn new(cache: WorkloadCache, gateway: Arc<dyn WriteGateway>) -> Self {
        Self { cache, gateway }
    }

    pub fn lookup(
        &self,
        workload_ref: &WorkloadRef,
    ) -> Result<Arc<WorkloadSnapshot>, WorkloadError> {
        self.cache
            .get(workload_ref)
            .ok_or_else(|| WorkloadError::NotFound {
                namespace: workload_ref.namespace.clone(),
                name: workload_ref.name.clone(),
            })
    }

    pub fn get_replicas(
        &self,
        workload_ref: &WorkloadRef,
    ) -> Result<DeploymentReplicas, WorkloadError> {
        let snapshot = self.lookup(workload_ref)?;
        Ok(DeploymentReplicas::from(&*snapshot))
    }

    /// All cached deployments, sorted by namespace then name.
    pub fn list_replicas(&self) -> Vec<DeploymentReplicas> {
        let mut snapshots = self.cache.list_all();
        snapshots.sort_by(|a, b| a.workload_ref.cmp(&b.workload_ref));
        snapshots
            .iter()
            .map(|s| DeploymentReplicas::from(&**s))
            .collect()
    }

    /// Validates the request, checks the ref against the cache and submits
    /// the new count. The response echoes the cached identity and the
    /// submitted count; the cache itself is left untouched.
    pub async fn set_replicas(
        &self,
        workload_ref: &WorkloadRef,
        request: DesiredReplicaRequest,
    ) -> Result<DeploymentReplicas, WorkloadError> {
        let desired = request.desired_replicas()?;
        let snapshot = self.lookup(workload_ref)?;

        let applied = self
            .gateway
            .apply(&snapshot.workload_ref, desired)
            .await
            .map_err(|e| {
                warn!("Replica update for {} failed: {}", snapshot.workload_ref, e);
                WorkloadError::from(e)
            })?;

        info!(
            "Replica count for {} set to {} (cached status: {})",
            snapshot.workload_ref, applied, snapshot.observed_replicas
        );

        Ok(DeploymentReplicas {
            namespace: snapshot.workload_ref.namespace.clone(),
            name: snapshot.workload_ref.name.clone(),
            replica_count: applied,
        })
    }
}
