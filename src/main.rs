use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};

use replica_gateway::app_state::{build_app_state, AppLimits};
use replica_gateway::config::AppConfig;
use replica_gateway::core::client::deployments::{
    deployments_api, KubeDeploymentGateway, KubeStoreProbe,
};
use replica_gateway::core::client::kube_client::build_kube_client;
use replica_gateway::core::client::watchers::WatchIngestor;
use replica_gateway::core::state::runtime::workload::workload_cache;
use replica_gateway::errors::StartupError;
use replica_gateway::logging::init_tracing;
use replica_gateway::routes::app_router;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let _log_guard = init_tracing(config.log_dir.as_deref());

    if let Err(e) = run(config).await {
        error!("replica-gateway stopped: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(config: AppConfig) -> Result<()> {
    info!(
        "Starting replica-gateway (scope={}, strategy={})",
        config.watch_namespace.as_deref().unwrap_or("all namespaces"),
        config.write_strategy
    );

    let client = build_kube_client(&config).await?;
    let api = deployments_api(&client, config.watch_namespace.as_deref());

    let (cache, writer) = workload_cache::store();
    let ingestor = WatchIngestor::spawn(api.clone(), writer, config.event_queue_capacity);

    // Never serve from a cache that has not seen the full listing.
    if tokio::time::timeout(config.sync_timeout, cache.sync_state().wait_until_synced())
        .await
        .is_err()
    {
        ingestor.abort();
        return Err(StartupError::CacheSyncTimeout(config.sync_timeout).into());
    }
    info!("Deployment cache ready with {} deployment(s)", cache.len());

    let gateway = Arc::new(KubeDeploymentGateway::new(
        client,
        config.write_strategy,
        config.store_timeout,
    ));
    let probe = Arc::new(KubeStoreProbe::new(api));
    let state = build_app_state(
        cache,
        gateway,
        probe,
        AppLimits {
            max_body_bytes: config.max_body_bytes,
            probe_timeout: config.store_timeout,
        },
    );

    let app = app_router().with_state(state);

    let listener = TcpListener::bind((config.bind_addr.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.bind_addr, config.port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutting down server...");
    ingestor.abort();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
