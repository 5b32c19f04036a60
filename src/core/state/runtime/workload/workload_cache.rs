use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::core::state::runtime::workload::sync_state::SyncState;
use crate::core::state::runtime::workload::workload_snapshot::{WorkloadRef, WorkloadSnapshot};

type Entries = Arc<DashMap<WorkloadRef, Arc<WorkloadSnapshot>>>;

/// A single change delivered by the deployment watch.
///
/// `Init`/`InitApply`/`InitDone` bracket a full listing (initial or relist),
/// `Apply`/`Delete` are incremental changes after it.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkloadEvent {
    Init,
    InitApply(WorkloadSnapshot),
    InitDone,
    Apply(WorkloadSnapshot),
    Delete(WorkloadRef),
}

/// Creates an empty cache and its only writer handle.
pub fn store() -> (WorkloadCache, WorkloadCacheWriter) {
    let writer = WorkloadCacheWriter::default();
    (writer.as_reader(), writer)
}

/// Read handle to the in-memory deployment cache.
///
/// Cloning shares the same backing map. Entries are sharded so lookups of
/// unrelated refs never contend, and every returned snapshot is immutable.
#[derive(Debug, Clone, Default)]
pub struct WorkloadCache {
    entries: Entries,
    sync: SyncState,
}

impl WorkloadCache {
    /// Look up a single deployment. `None` means the cache holds no such ref.
    pub fn get(&self, workload_ref: &WorkloadRef) -> Option<Arc<WorkloadSnapshot>> {
        self.entries
            .get(workload_ref)
            // clone the Arc to release the shard lock immediately
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Point-in-time listing of every cached deployment, in no particular order.
    pub fn list_all(&self) -> Vec<Arc<WorkloadSnapshot>> {
        self.entries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_synced_once(&self) -> bool {
        self.sync.has_synced_once()
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }
}

/// Exclusive write handle, owned by the watch ingestor.
///
/// Not `Clone`: there is exactly one writer per cache.
#[derive(Debug, Default)]
pub struct WorkloadCacheWriter {
    entries: Entries,
    sync: SyncState,
    listing: Option<HashMap<WorkloadRef, Arc<WorkloadSnapshot>>>,
}

impl WorkloadCacheWriter {
    pub fn as_reader(&self) -> WorkloadCache {
        WorkloadCache {
            entries: Arc::clone(&self.entries),
            sync: self.sync.clone(),
        }
    }

    pub fn apply(&mut self, event: WorkloadEvent) {
        match event {
            WorkloadEvent::Init => {
                debug!("Deployment listing started");
                self.listing = Some(HashMap::new());
            }
            WorkloadEvent::InitApply(snapshot) => {
                self.listing
                    .get_or_insert_with(HashMap::new)
                    .insert(snapshot.workload_ref.clone(), Arc::new(snapshot));
            }
            WorkloadEvent::InitDone => self.finish_listing(),
            WorkloadEvent::Apply(snapshot) => {
                let previous = self
                    .entries
                    .get(&snapshot.workload_ref)
                    .map(|e| Arc::clone(e.value()));
                match previous {
                    Some(old) => self.on_update(&old, snapshot),
                    None => self.on_add(snapshot),
                }
            }
            WorkloadEvent::Delete(workload_ref) => self.on_delete(&workload_ref),
        }
    }

    /// Inserts or overwrites the snapshot for its ref.
    pub fn on_add(&mut self, snapshot: WorkloadSnapshot) {
        debug!(
            "Deployment cached: {} (replicas={})",
            snapshot.workload_ref, snapshot.observed_replicas
        );
        self.entries
            .insert(snapshot.workload_ref.clone(), Arc::new(snapshot));
    }

    /// Overwrites the snapshot for the ref; the old value is informational.
    pub fn on_update(&mut self, old: &WorkloadSnapshot, new: WorkloadSnapshot) {
        if old.observed_replicas != new.observed_replicas {
            debug!(
                "Deployment {} replicas {} -> {}",
                new.workload_ref, old.observed_replicas, new.observed_replicas
            );
        }
        self.entries.insert(new.workload_ref.clone(), Arc::new(new));
    }

    pub fn on_delete(&mut self, workload_ref: &WorkloadRef) {
        if self.entries.remove(workload_ref).is_some() {
            debug!("Deployment removed from cache: {}", workload_ref);
        }
    }

    // Swap in a completed listing. Not atomic across keys, but refs present
    // in both the old and new listing are never transiently absent.
    fn finish_listing(&mut self) {
        let listed = self.listing.take().unwrap_or_default();
        self.entries.retain(|key, _| listed.contains_key(key));
        for (key, snapshot) in listed {
            self.entries.insert(key, snapshot);
        }

        if self.sync.mark_synced() {
            info!("Deployment cache synced ({} deployment(s))", self.entries.len());
        } else {
            debug!("Deployment relist applied ({} deployment(s))", self.entries.len());
        }
    }
}
