use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use kube::api::{ListParams, Patch, PatchParams, PostParams};
use kube::{Api, Client};
use serde_json::json;
use tracing::{debug, info};

use crate::config::WriteStrategy;
use crate::core::client::kube_resources::Deployment;
use crate::core::state::runtime::workload::workload_snapshot::WorkloadRef;
use crate::domain::system::service::health_service::StoreProbe;
use crate::domain::workload::write_gateway::{GatewayError, WriteGateway};

/// Deployment API for the watched scope: one namespace, or all of them.
pub fn deployments_api(client: &Client, namespace: Option<&str>) -> Api<Deployment> {
    match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

/// Writes replica counts to the API server.
pub struct KubeDeploymentGateway {
    client: Client,
    strategy: WriteStrategy,
    timeout: Duration,
}

impl KubeDeploymentGateway {
    pub fn new(client: Client, strategy: WriteStrategy, timeout: Duration) -> Self {
        Self {
            client,
            strategy,
            timeout,
        }
    }

    async fn patch_replicas(
        &self,
        api: &Api<Deployment>,
        workload_ref: &WorkloadRef,
        replicas: i32,
    ) -> Result<(), GatewayError> {
        let patch = json!({ "spec": { "replicas": replicas } });
        api.patch(&workload_ref.name, &PatchParams::default(), &Patch::Strategic(&patch))
            .await
            .map_err(|e| classify_kube_error(e, workload_ref))?;
        Ok(())
    }

    // The fetched resourceVersion travels with the replace, so the API
    // server rejects it with 409 if anything changed in between.
    async fn replace_replicas(
        &self,
        api: &Api<Deployment>,
        workload_ref: &WorkloadRef,
        replicas: i32,
    ) -> Result<(), GatewayError> {
        let name = workload_ref.name.as_str();
        let mut live = api
            .get(name)
            .await
            .map_err(|e| classify_kube_error(e, workload_ref))?;

        let Some(resource_version) = live.metadata.resource_version.as_deref() else {
            return Err(GatewayError::Internal(format!(
                "deployment {name} has no resourceVersion"
            )));
        };
        debug!("Replacing deployment {} at resourceVersion {}", workload_ref, resource_version);

        live.spec.get_or_insert_with(Default::default).replicas = Some(replicas);

        api.replace(name, &PostParams::default(), &live)
            .await
            .map_err(|e| classify_kube_error(e, workload_ref))?;
        Ok(())
    }
}

#[async_trait]
impl WriteGateway for KubeDeploymentGateway {
    async fn apply(&self, workload_ref: &WorkloadRef, replicas: i32) -> Result<i32, GatewayError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), &workload_ref.namespace);

        match self.strategy {
            WriteStrategy::Patch => {
                with_timeout(self.timeout, self.patch_replicas(&api, workload_ref, replicas))
                    .await??
            }
            WriteStrategy::Replace => {
                with_timeout(self.timeout, self.replace_replicas(&api, workload_ref, replicas))
                    .await??
            }
        }

        info!(
            "Deployment {} replicas set to {} (strategy={})",
            workload_ref, replicas, self.strategy
        );
        Ok(replicas)
    }
}

/// Lists at most one deployment to prove the API server answers.
pub struct KubeStoreProbe {
    api: Api<Deployment>,
}

impl KubeStoreProbe {
    pub fn new(api: Api<Deployment>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StoreProbe for KubeStoreProbe {
    async fn probe(&self) -> Result<(), GatewayError> {
        self.api
            .list(&ListParams::default().limit(1))
            .await
            .map(|_| ())
            .map_err(|e| match e {
                kube::Error::Api(response) => GatewayError::Unavailable(format!(
                    "{} ({})",
                    response.message, response.code
                )),
                other => GatewayError::Unavailable(other.to_string()),
            })
    }
}

async fn with_timeout<F, T>(limit: Duration, fut: F) -> Result<T, GatewayError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| GatewayError::Timeout(limit))
}

fn classify_kube_error(err: kube::Error, target: &WorkloadRef) -> GatewayError {
    match err {
        kube::Error::Api(response) => {
            classify_status(response.code, response.message.clone(), target)
        }
        other => GatewayError::Unavailable(other.to_string()),
    }
}

/// Maps an API server status code onto the gateway error kinds.
pub fn classify_status(code: u16, message: String, target: &WorkloadRef) -> GatewayError {
    match code {
        404 => GatewayError::NotFound {
            namespace: target.namespace.clone(),
            name: target.name.clone(),
        },
        409 => GatewayError::Conflict(message),
        401 | 403 => GatewayError::Unauthorized(message),
        408 | 429 | 500..=599 => GatewayError::Unavailable(message),
        _ => GatewayError::Internal(message),
    }
}
