pub mod sync_state;
pub mod workload_cache;
pub mod workload_snapshot;
