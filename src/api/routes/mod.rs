//! API route declarations (e.g., /api/v1/*)

pub mod deployment_routes;
pub mod system_routes;
