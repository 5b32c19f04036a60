//! REST adapter for reading and scaling Kubernetes deployments.
//!
//! Reads are served from a watch-fed in-memory cache; replica updates go
//! straight to the API server and reach the cache through the watch.

pub mod api;
pub mod app_state;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod routes;
