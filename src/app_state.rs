use std::sync::Arc;

use crate::core::state::runtime::workload::workload_cache::WorkloadCache;
use crate::domain::system::service::health_service::{HealthReporter, StoreProbe};
use crate::domain::workload::service::workload_service::WorkloadService;
use crate::domain::workload::write_gateway::WriteGateway;

#[derive(Clone)]
pub struct AppState {
    pub workload_service: Arc<WorkloadService>,
    pub health_reporter: Arc<HealthReporter>,
    pub max_body_bytes: usize,
}

/// Request-path limits shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct AppLimits {
    pub max_body_bytes: usize,
    pub probe_timeout: std::time::Duration,
}

pub fn build_app_state(
    cache: WorkloadCache,
    gateway: Arc<dyn WriteGateway>,
    probe: Arc<dyn StoreProbe>,
    limits: AppLimits,
) -> AppState {
    let sync = cache.sync_state().clone();
    AppState {
        workload_service: Arc::new(WorkloadService::new(cache, gateway)),
        health_reporter: Arc::new(HealthReporter::new(sync, probe, limits.probe_timeout)),
        max_body_bytes: limits.max_body_bytes,
    }
}
