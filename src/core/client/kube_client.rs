use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::debug;

use crate::config::AppConfig;

/// Creates a Kubernetes client configured for in-cluster or local development
pub async fn build_kube_client(config: &AppConfig) -> Result<Client> {
    let kube_config = if config.in_cluster {
        debug!("Using in-cluster configuration");
        Config::incluster().context("failed to load in-cluster configuration")?
    } else if let Some(path) = &config.kubeconfig {
        debug!("Using kubeconfig from {}", path.display());
        let kubeconfig = Kubeconfig::read_from(path)
            .with_context(|| format!("failed to read kubeconfig {}", path.display()))?;
        Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context("failed to load kubeconfig")?
    } else {
        debug!("Inferring configuration from KUBECONFIG / ~/.kube/config / in-cluster env");
        Config::infer().await.context("failed to infer kube configuration")?
    };

    let client = Client::try_from(kube_config).context("failed to build kube client")?;

    debug!("Kubernetes client initialized successfully");
    Ok(client)
}
