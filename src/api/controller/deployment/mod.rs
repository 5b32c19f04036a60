//! Deployment controller: replica reads from the cache, writes to the cluster

use axum::body::Body;
use axum::extract::{Path, State};
use axum::Json;

use crate::api::dto::deployment_dto::DeploymentReplicas;
use crate::api::util::body::read_limited_body;
use crate::app_state::AppState;
use crate::core::state::runtime::workload::workload_snapshot::WorkloadRef;
use crate::domain::workload::dto::desired_replica_request::DesiredReplicaRequest;
use crate::domain::workload::workload_error::WorkloadError;
use crate::errors::AppError;

pub struct DeploymentController;

impl DeploymentController {
    pub async fn list_deployments(State(state): State<AppState>) -> Json<Vec<DeploymentReplicas>> {
        Json(state.workload_service.list_replicas())
    }

    pub async fn get_replicas(
        State(state): State<AppState>,
        Path((namespace, name)): Path<(String, String)>,
    ) -> Result<Json<DeploymentReplicas>, AppError> {
        let workload_ref = parse_ref(namespace, name)?;
        Ok(Json(state.workload_service.get_replicas(&workload_ref)?))
    }

    pub async fn put_replicas(
        State(state): State<AppState>,
        Path((namespace, name)): Path<(String, String)>,
        body: Body,
    ) -> Result<Json<DeploymentReplicas>, AppError> {
        let workload_ref = parse_ref(namespace, name)?;
        let decoded = match read_limited_body(body, state.max_body_bytes).await {
            Ok(bytes) => DesiredReplicaRequest::from_body(&bytes),
            Err(err) => Err(err),
        };

        // An out-of-range count is rejected for any ref; an unreadable body
        // only once the ref is known to exist.
        if let Ok(request) = &decoded {
            request.desired_replicas()?;
        }
        state.workload_service.lookup(&workload_ref)?;
        let request = decoded?;

        let applied = state
            .workload_service
            .set_replicas(&workload_ref, request)
            .await?;
        Ok(Json(applied))
    }

    pub async fn list_method_not_allowed() -> AppError {
        AppError::MethodNotAllowed
    }

    /// Any other verb: unknown refs still answer 404 before the 405.
    pub async fn method_not_allowed(
        State(state): State<AppState>,
        Path((namespace, name)): Path<(String, String)>,
    ) -> AppError {
        let lookup = parse_ref(namespace, name)
            .and_then(|workload_ref| state.workload_service.lookup(&workload_ref));
        match lookup {
            Ok(_) => AppError::MethodNotAllowed,
            Err(err) => AppError::from(err),
        }
    }
}

fn parse_ref(namespace: String, name: String) -> Result<WorkloadRef, WorkloadError> {
    if namespace.trim().is_empty() || name.trim().is_empty() {
        return Err(WorkloadError::Validation(
            "namespace and name must not be empty".to_string(),
        ));
    }
    Ok(WorkloadRef::new(namespace, name))
}
