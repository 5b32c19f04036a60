use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::core::state::runtime::workload::sync_state::SyncState;
use crate::domain::workload::write_gateway::GatewayError;

/// Cheap reachability check against the API server.
#[async_trait]
pub trait StoreProbe: Send + Sync {
    async fn probe(&self) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Healthy,
    Unhealthy(String),
}

pub struct HealthReporter {
    sync: SyncState,
    probe: Arc<dyn StoreProbe>,
    probe_timeout: Duration,
}

impl HealthReporter {
    pub fn new(sync: SyncState, probe: Arc<dyn StoreProbe>, probe_timeout: Duration) -> Self {
        Self {
            sync,
            probe,
            probe_timeout,
        }
    }

    /// Unhealthy until the cache has synced once, then as healthy as the
    /// API server is reachable.
    pub async fn readiness(&self) -> Readiness {
        if !self.sync.has_synced_once() {
            return Readiness::Unhealthy("cache not yet synchronized".to_string());
        }

        let outcome = match tokio::time::timeout(self.probe_timeout, self.probe.probe()).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(self.probe_timeout)),
        };

        match outcome {
            Ok(()) => Readiness::Healthy,
            Err(e) => {
                warn!("Readiness probe failed: {}", e);
                Readiness::Unhealthy(format!("store unreachable: {e}"))
            }
        }
    }

    /// Always alive once the process is up.
    pub fn liveness(&self) -> &'static str {
        "alive"
    }
}
