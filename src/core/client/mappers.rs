/// Maps kube-rs / k8s-openapi types → cache snapshots and watch events
use kube::runtime::watcher;
use tracing::warn;

use crate::core::client::kube_resources::Deployment;
use crate::core::state::runtime::workload::workload_cache::WorkloadEvent;
use crate::core::state::runtime::workload::workload_snapshot::{
    ResourceVersion, WorkloadRef, WorkloadSnapshot,
};

pub fn map_deployment_ref(deployment: &Deployment) -> Option<WorkloadRef> {
    let metadata = &deployment.metadata;
    match (&metadata.namespace, &metadata.name) {
        (Some(namespace), Some(name)) => Some(WorkloadRef::new(namespace, name)),
        _ => None,
    }
}

/// Converts a Deployment into the cached snapshot.
///
/// The replica count comes from `status.replicas`, not the spec.
pub fn map_deployment_to_snapshot(deployment: &Deployment) -> Option<WorkloadSnapshot> {
    let workload_ref = map_deployment_ref(deployment)?;

    let observed_replicas = deployment
        .status
        .as_ref()
        .and_then(|status| status.replicas)
        .unwrap_or(0);

    let resource_version = deployment
        .metadata
        .resource_version
        .as_ref()
        .map(ResourceVersion::new);

    Some(WorkloadSnapshot::new(
        workload_ref,
        observed_replicas,
        resource_version,
    ))
}

/// Translates a watcher event; objects without namespace/name are dropped.
pub fn map_watch_event(event: watcher::Event<Deployment>) -> Option<WorkloadEvent> {
    match event {
        watcher::Event::Init => Some(WorkloadEvent::Init),
        watcher::Event::InitDone => Some(WorkloadEvent::InitDone),
        watcher::Event::InitApply(deployment) => {
            snapshot_or_warn(&deployment).map(WorkloadEvent::InitApply)
        }
        watcher::Event::Apply(deployment) => {
            snapshot_or_warn(&deployment).map(WorkloadEvent::Apply)
        }
        watcher::Event::Delete(deployment) => match map_deployment_ref(&deployment) {
            Some(workload_ref) => Some(WorkloadEvent::Delete(workload_ref)),
            None => {
                warn!("Ignoring delete event for deployment without namespace/name");
                None
            }
        },
    }
}

fn snapshot_or_warn(deployment: &Deployment) -> Option<WorkloadSnapshot> {
    let snapshot = map_deployment_to_snapshot(deployment);
    if snapshot.is_none() {
        warn!("Ignoring deployment without namespace/name");
    }
    snapshot
}
