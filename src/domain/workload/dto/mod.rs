pub mod desired_replica_request;
