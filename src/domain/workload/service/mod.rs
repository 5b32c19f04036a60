pub mod workload_service;
