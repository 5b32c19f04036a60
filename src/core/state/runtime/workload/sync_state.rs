use std::sync::Arc;

use tokio::sync::watch;

/// Process-wide "initial listing completed" flag.
///
/// Flips from `false` to `true` exactly once and never reverts, including
/// across watch reconnects and relists. A relist gap after the first sync
/// is therefore not reflected here.
#[derive(Debug, Clone)]
pub struct SyncState {
    synced: Arc<watch::Sender<bool>>,
}

impl SyncState {
    pub fn new() -> Self {
        let (synced, _) = watch::channel(false);
        Self {
            synced: Arc::new(synced),
        }
    }

    pub fn has_synced_once(&self) -> bool {
        *self.synced.borrow()
    }

    /// Marks the initial listing as complete.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn mark_synced(&self) -> bool {
        self.synced.send_if_modified(|synced| {
            if *synced {
                false
            } else {
                *synced = true;
                true
            }
        })
    }

    /// Resolves once the initial listing has completed.
    pub async fn wait_until_synced(&self) {
        let mut rx = self.synced.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|synced| *synced).await;
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}
