use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use replica_gateway::app_state::{build_app_state, AppLimits};
use replica_gateway::core::state::runtime::workload::workload_cache::{
    store, WorkloadCacheWriter, WorkloadEvent,
};
use replica_gateway::core::state::runtime::workload::workload_snapshot::{
    ResourceVersion, WorkloadRef, WorkloadSnapshot,
};
use replica_gateway::domain::system::service::health_service::StoreProbe;
use replica_gateway::domain::workload::write_gateway::{GatewayError, WriteGateway};
use replica_gateway::routes::app_router;

#[derive(Default)]
struct MockWriteGateway {
    calls: Mutex<Vec<(WorkloadRef, i32)>>,
    failure: Option<GatewayError>,
}

#[async_trait]
impl WriteGateway for MockWriteGateway {
    async fn apply(&self, workload_ref: &WorkloadRef, replicas: i32) -> Result<i32, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((workload_ref.clone(), replicas));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(replicas),
        }
    }
}

#[derive(Default)]
struct MockStoreProbe {
    failure: Option<GatewayError>,
}

#[async_trait]
impl StoreProbe for MockStoreProbe {
    async fn probe(&self) -> Result<(), GatewayError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

struct TestApp {
    router: Router,
    gateway: Arc<MockWriteGateway>,
    writer: WorkloadCacheWriter,
}

fn snapshot(ns: &str, name: &str, replicas: i32) -> WorkloadSnapshot {
    WorkloadSnapshot::new(
        WorkloadRef::new(ns, name),
        replicas,
        Some(ResourceVersion::new("1")),
    )
}

fn app_with(
    synced: Option<Vec<WorkloadSnapshot>>,
    gateway: MockWriteGateway,
    probe: MockStoreProbe,
) -> TestApp {
    let (cache, mut writer) = store();
    if let Some(snapshots) = synced {
        writer.apply(WorkloadEvent::Init);
        for s in snapshots {
            writer.apply(WorkloadEvent::InitApply(s));
        }
        writer.apply(WorkloadEvent::InitDone);
    }

    let gateway = Arc::new(gateway);
    let state = build_app_state(
        cache,
        gateway.clone(),
        Arc::new(probe),
        AppLimits {
            max_body_bytes: 150,
            probe_timeout: Duration::from_secs(1),
        },
    );

    TestApp {
        router: app_router().with_state(state),
        gateway,
        writer,
    }
}

fn default_app() -> TestApp {
    app_with(
        Some(vec![snapshot("default", "web", 3), snapshot("apps", "api", 1)]),
        MockWriteGateway::default(),
        MockStoreProbe::default(),
    )
}

async fn send(router: &Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

const WEB: &str = "/api/v1/deployments/default/web/replicas";
const GHOST: &str = "/api/v1/deployments/default/ghost/replicas";
const HEALTHZ: &str = "/api/v1/healthz";

#[tokio::test]
async fn get_returns_cached_replica_count() {
    let app = default_app();
    let (status, body) = send(&app.router, Method::GET, WEB, Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"namespace": "default", "name": "web", "replicaCount": 3}));
}

#[tokio::test]
async fn put_applies_through_gateway_while_reads_stay_cached() {
    let app = default_app();

    let (status, body) = send(
        &app.router,
        Method::PUT,
        WEB,
        Body::from(r#"{"replicaCount":5}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"namespace": "default", "name": "web", "replicaCount": 5}));
    assert_eq!(
        app.gateway.calls.lock().unwrap().as_slice(),
        &[(WorkloadRef::new("default", "web"), 5)]
    );

    // the watch has not re-emitted the change yet
    let (_, body) = send(&app.router, Method::GET, WEB, Body::empty()).await;
    assert_eq!(body["replicaCount"], 3);
}

#[tokio::test]
async fn cache_converges_once_watch_reemits() {
    let mut app = default_app();
    send(&app.router, Method::PUT, WEB, Body::from(r#"{"replicaCount":5}"#)).await;

    app.writer.apply(WorkloadEvent::Apply(snapshot("default", "web", 5)));

    let (_, body) = send(&app.router, Method::GET, WEB, Body::empty()).await;
    assert_eq!(body["replicaCount"], 5);
}

#[tokio::test]
async fn put_with_missing_field_is_rejected_before_gateway() {
    let app = default_app();
    let (status, body) = send(&app.router, Method::PUT, WEB, Body::from("{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("replicaCount"));
    assert!(app.gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn put_with_negative_count_is_rejected_even_for_unknown_ref() {
    let app = default_app();
    for uri in [WEB, "/api/v1/deployments/default/ghost/replicas"] {
        let body = Body::from(r#"{"replicaCount":-1}"#);
        let (status, _) = send(&app.router, Method::PUT, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
    assert!(app.gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn put_to_unknown_ref_is_not_found() {
    let app = default_app();
    let (status, body) = send(
        &app.router,
        Method::PUT,
        "/api/v1/deployments/default/ghost/replicas",
        Body::from(r#"{"replicaCount":2}"#),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": "Deployment ghost in namespace default does not exist"})
    );
    assert!(app.gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_empty_and_oversized_bodies_are_bad_requests() {
    let app = default_app();
    let oversized = format!(r#"{{"replicaCount":1,"pad":"{}"}}"#, "x".repeat(200));

    for body in [
        Body::from("not json"),
        Body::from(r#"{"replicaCount":"five"}"#),
        Body::empty(),
        Body::from(oversized),
    ] {
        let (status, value) = send(&app.router, Method::PUT, WEB, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["error"].is_string());
    }
    assert!(app.gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreadable_body_to_unknown_ref_is_not_found() {
    let app = default_app();
    let oversized = "x".repeat(200);

    for body in [Body::from("not json"), Body::empty(), Body::from(oversized)] {
        let (status, value) = send(&app.router, Method::PUT, GHOST, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            value,
            json!({"error": "Deployment ghost in namespace default does not exist"})
        );
    }
    assert!(app.gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn gateway_failures_map_to_status_codes() {
    let cases = [
        (GatewayError::Conflict("the object has been modified".into()), StatusCode::CONFLICT),
        (GatewayError::Unauthorized("forbidden".into()), StatusCode::FORBIDDEN),
        (GatewayError::Unavailable("connection refused".into()), StatusCode::SERVICE_UNAVAILABLE),
        (GatewayError::Timeout(Duration::from_secs(10)), StatusCode::SERVICE_UNAVAILABLE),
        (GatewayError::Internal("invalid".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (failure, expected) in cases {
        let app = app_with(
            Some(vec![snapshot("default", "web", 3)]),
            MockWriteGateway {
                failure: Some(failure),
                ..Default::default()
            },
            MockStoreProbe::default(),
        );
        let request = Body::from(r#"{"replicaCount":4}"#);
        let (status, body) = send(&app.router, Method::PUT, WEB, request).await;
        assert_eq!(status, expected);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn other_verbs_are_not_allowed_after_lookup() {
    let app = default_app();

    let (status, body) = send(&app.router, Method::DELETE, WEB, Body::empty()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "Method not allowed"}));

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/v1/deployments/default/ghost/replicas",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_every_cached_deployment() {
    let app = default_app();
    let (status, body) = send(&app.router, Method::GET, "/api/v1/deployments", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"namespace": "apps", "name": "api", "replicaCount": 1},
            {"namespace": "default", "name": "web", "replicaCount": 3}
        ])
    );
}

#[tokio::test]
async fn deleted_deployment_disappears_from_reads() {
    let mut app = default_app();
    app.writer
        .apply(WorkloadEvent::Delete(WorkloadRef::new("default", "web")));

    let (status, _) = send(&app.router, Method::GET, WEB, Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app.router, Method::GET, "/api/v1/deployments", Body::empty()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn healthz_reflects_sync_and_store_state() {
    let unsynced = app_with(None, MockWriteGateway::default(), MockStoreProbe::default());
    let (status, body) = send(&unsynced.router, Method::GET, HEALTHZ, Body::empty()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({"status": "unhealthy", "error": "cache not yet synchronized"})
    );

    let unreachable = app_with(
        Some(Vec::new()),
        MockWriteGateway::default(),
        MockStoreProbe {
            failure: Some(GatewayError::Unavailable("connection refused".into())),
        },
    );
    let (status, body) = send(&unreachable.router, Method::GET, HEALTHZ, Body::empty()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["error"], "store unreachable: connection refused");

    let healthy = default_app();
    let (status, body) = send(&healthy.router, Method::GET, HEALTHZ, Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "store": "connected"}));
}

#[tokio::test]
async fn pingz_is_alive_even_before_sync() {
    let app = app_with(None, MockWriteGateway::default(), MockStoreProbe::default());
    let (status, body) = send(&app.router, Method::GET, "/api/v1/pingz", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "alive"}));
}

#[tokio::test]
async fn unknown_routes_are_json_404s() {
    let app = default_app();
    let uri = "/api/v1/statefulsets";
    let (status, body) = send(&app.router, Method::GET, uri, Body::empty()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}
