use futures::{Stream, StreamExt};
use kube::runtime::{watcher, WatchStreamExt};
use kube::Api;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::client::kube_resources::Deployment;
use crate::core::client::mappers::map_watch_event;
use crate::core::state::runtime::workload::workload_cache::{WorkloadCacheWriter, WorkloadEvent};

/// Keeps the deployment cache in sync with the API server.
///
/// The watch stream is drained by one task into a bounded queue, and a
/// second task owns the cache writer and applies events in arrival order.
pub struct WatchIngestor {
    producer: JoinHandle<()>,
    consumer: JoinHandle<()>,
}

impl WatchIngestor {
    pub fn spawn(api: Api<Deployment>, writer: WorkloadCacheWriter, queue_capacity: usize) -> Self {
        let stream = watcher(api, watcher::Config::default()).default_backoff();
        Self::spawn_from_stream(stream, writer, queue_capacity)
    }

    pub fn spawn_from_stream<S>(
        stream: S,
        writer: WorkloadCacheWriter,
        queue_capacity: usize,
    ) -> Self
    where
        S: Stream<Item = Result<watcher::Event<Deployment>, watcher::Error>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(queue_capacity);

        info!("Starting Deployment watcher...");
        let producer = tokio::spawn(forward_watch_events(stream, tx));
        let consumer = tokio::spawn(apply_workload_events(writer, rx));

        Self { producer, consumer }
    }

    pub fn abort(&self) {
        self.producer.abort();
        self.consumer.abort();
    }
}

impl Drop for WatchIngestor {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Pushes mapped watch events into the queue until the stream ends or the
/// consumer goes away. Watch errors are logged; the watcher re-lists itself.
pub async fn forward_watch_events<S>(stream: S, tx: mpsc::Sender<WorkloadEvent>)
where
    S: Stream<Item = Result<watcher::Event<Deployment>, watcher::Error>>,
{
    let mut stream = std::pin::pin!(stream);

    while let Some(result) = stream.next().await {
        match result {
            Ok(event) => {
                let Some(event) = map_watch_event(event) else {
                    continue;
                };
                if tx.send(event).await.is_err() {
                    warn!("Deployment event queue closed, stopping watcher");
                    return;
                }
            }
            Err(e) => {
                warn!("Deployment watcher error: {}", e);
            }
        }
    }

    debug!("Deployment watch stream ended");
}

/// Applies queued events to the cache, one at a time.
pub async fn apply_workload_events(
    mut writer: WorkloadCacheWriter,
    mut rx: mpsc::Receiver<WorkloadEvent>,
) {
    while let Some(event) = rx.recv().await {
        writer.apply(event);
    }
    debug!("Deployment event queue drained");
}
