//! HTTP-level tests for the gateway report API
//!
//! Each test drives the router in-process against its own temporary SQLite
//! file, so requests exercise the same per-request connection path as the
//! server binary.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use futures::future::join_all;
use plclink_core::Database;
use plclink_server::{create_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    database: Database,
    _dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::open(dir.path().join("api.db")).unwrap();
        let router = create_router(AppState::new(database.clone()), true);
        Self {
            router,
            database,
            _dir: dir,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn create(&self, gateway_id: &str, state: Value) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/gateway",
                Some(json!({"gatewayID": gateway_id, "state": state})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }
}

#[tokio::test]
async fn post_gateway_creates_record() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/gateway",
            Some(json!({"gatewayID": "PLC-001", "state": "online"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["gateway_id"], "PLC-001");
    assert_eq!(body["data"], "online");
    assert!(body["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn post_gateway_with_empty_body_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::POST, "/gateway", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "gatewayID e state são obrigatórios"}));

    let (_, listed) = app.send(Method::GET, "/gateway", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn post_gateway_with_malformed_json_is_bad_request() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/gateway")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"gatewayID\":"))
        .unwrap();
    let (status, body) = app.dispatch(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn get_by_id_returns_created_record() {
    let app = TestApp::new();
    let created = app.create("PLC-001", json!({"temperature": 25.5})).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app.send(Method::GET, &format!("/gateway/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/gateway/999999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Registro não encontrado"}));
}

#[tokio::test]
async fn non_numeric_id_on_get_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/gateway/abc", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Registro não encontrado"}));
}

#[tokio::test]
async fn non_numeric_id_on_write_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::DELETE, "/gateway/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, body) = app
        .send(
            Method::PUT,
            "/gateway/abc",
            Some(json!({"gatewayID": "PLC-001", "state": "online"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn array_bodies_are_rejected_as_missing_fields() {
    let app = TestApp::new();
    let created = app.create("PLC-001", json!("online")).await;
    let uri = format!("/gateway/{}", created["id"]);

    let (status, body) = app
        .send(Method::POST, "/gateway", Some(json!(["PLC-9", "online"])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "gatewayID e state são obrigatórios"}));

    let (status, body) = app
        .send(Method::PUT, &uri, Some(json!(["PLC-9", "offline"])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "gatewayID e state são obrigatórios"}));

    let (status, body) = app
        .send(Method::POST, "/nodered", Some(json!(["PLC-9", "online", {}])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "gatewayId and status are mandatory"}));

    let (_, listed) = app.send(Method::GET, "/gateway", None).await;
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn list_returns_all_created_records() {
    let app = TestApp::new();
    let first = app.create("PLC-001", json!("online")).await;
    let second = app.create("PLC-002", json!("offline")).await;

    let (status, body) = app.send(Method::GET, "/gateway", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([first, second]));
}

#[tokio::test]
async fn put_replaces_fields_and_keeps_identity() {
    let app = TestApp::new();
    let created = app.create("PLC-001", json!("online")).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/gateway/{id}"),
            Some(json!({"gatewayID": "PLC-002", "state": "offline"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["createdAt"], created["createdAt"]);
    assert_eq!(body["gateway_id"], "PLC-002");
    assert_eq!(body["data"], "offline");
}

#[tokio::test]
async fn put_unknown_id_is_not_found() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            Method::PUT,
            "/gateway/42",
            Some(json!({"gatewayID": "PLC-001", "state": "online"})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_with_missing_state_is_bad_request() {
    let app = TestApp::new();
    let created = app.create("PLC-001", json!("online")).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/gateway/{id}"),
            Some(json!({"gatewayID": "PLC-001"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_returns_no_content_then_not_found() {
    let app = TestApp::new();
    let created = app.create("PLC-001", json!("online")).await;
    let uri = format!("/gateway/{}", created["id"]);

    let (status, body) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storage_fault_maps_per_operation() {
    let app = TestApp::new();
    let conn = app.database.connect().unwrap();
    conn.execute_batch("DROP TABLE plc_data;").unwrap();
    drop(conn);

    let (status, _) = app.send(Method::GET, "/gateway", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = app.send(Method::GET, "/gateway/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = app
        .send(
            Method::POST,
            "/gateway",
            Some(json!({"gatewayID": "PLC-001", "state": "online"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send(Method::DELETE, "/gateway/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nodered_echoes_status_with_default_data() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/nodered",
            Some(json!({"gatewayId": "PLC-001", "status": "online"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Receive data",
            "receivedData": {"gatewayId": "PLC-001", "status": "online", "data": {}}
        })
    );

    let (_, listed) = app.send(Method::GET, "/gateway", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn nodered_without_status_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/nodered",
            Some(json!({"gatewayId": "PLC-001", "data": {"temperature": 25.5}})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "gatewayId and status are mandatory"}));
}

#[tokio::test]
async fn health_reports_version() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], plclink_core::core_version());
}

#[tokio::test]
async fn concurrent_creates_all_persist() {
    let app = TestApp::new();

    let requests = (0..8).map(|n| {
        app.send(
            Method::POST,
            "/gateway",
            Some(json!({"gatewayID": format!("PLC-{n:03}"), "state": "online"})),
        )
    });
    let results = join_all(requests).await;
    assert!(results
        .iter()
        .all(|(status, _)| *status == StatusCode::CREATED));

    let (_, listed) = app.send(Method::GET, "/gateway", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 8);
}
