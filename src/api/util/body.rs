use axum::body::{Body, Bytes};
use http_body_util::LengthLimitError;

use crate::domain::workload::workload_error::WorkloadError;

/// Reads a request body, refusing anything beyond `limit` bytes.
///
/// Oversized or unreadable bodies are client errors.
pub async fn read_limited_body(body: Body, limit: usize) -> Result<Bytes, WorkloadError> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        let inner = err.into_inner();
        if inner.is::<LengthLimitError>() {
            WorkloadError::Validation("Request body too large".to_string())
        } else {
            WorkloadError::Validation(format!("Unable to read request body: {inner}"))
        }
    })
}
