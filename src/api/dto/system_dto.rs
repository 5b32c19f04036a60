//! System API DTOs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthzStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

impl HealthzStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            error: None,
            store: Some("connected".to_string()),
        }
    }

    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            error: Some(reason.into()),
            store: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingzStatus {
    pub status: String,
}
