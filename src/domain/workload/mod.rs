pub mod dto;
pub mod service;
pub mod workload_error;
pub mod write_gateway;
