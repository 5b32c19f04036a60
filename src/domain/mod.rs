pub mod system;
pub mod workload;
