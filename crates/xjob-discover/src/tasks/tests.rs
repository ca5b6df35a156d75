use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use xjob_core::Reporter;
use xjob_model::{ACCESS_TOKEN_HEADER, CallbackParam, RegistryParam};

use super::{CallbackReporter, Heartbeat};
use crate::{AdminClient, AdminConfig, DiscoverError};

#[derive(Clone, Debug)]
struct Seen {
    path: &'static str,
    token: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Mock {
    seen: Arc<Mutex<Vec<Seen>>>,
    code: i32,
}

impl Mock {
    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn count(&self, path: &str) -> usize {
        self.seen().iter().filter(|s| s.path == path).count()
    }

    fn record(&self, path: &'static str, headers: &HeaderMap, body: Value) -> Json<Value> {
        let token = headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.seen.lock().unwrap().push(Seen { path, token, body });
        Json(json!({ "code": self.code, "msg": null }))
    }
}

async fn registry(State(mock): State<Mock>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    mock.record("/api/registry", &headers, body)
}

async fn registry_remove(
    State(mock): State<Mock>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    mock.record("/api/registryRemove", &headers, body)
}

async fn callback(State(mock): State<Mock>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    mock.record("/api/callback", &headers, body)
}

async fn spawn_scheduler(code: i32) -> (Mock, SocketAddr) {
    let mock = Mock {
        seen: Arc::new(Mutex::new(Vec::new())),
        code,
    };
    let app = Router::new()
        .route("/admin/api/registry", post(registry))
        .route("/admin/api/registryRemove", post(registry_remove))
        .route("/admin/api/callback", post(callback))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (mock, addr)
}

fn config(addr: SocketAddr) -> AdminConfig {
    AdminConfig {
        admin_address: format!("http://{addr}/admin/"),
        access_token: "secret".into(),
        app_name: "demo-app".into(),
        executor_address: "http://10.0.0.5:9999".into(),
        timeout_ms: 1_000,
        heartbeat_interval_ms: 50,
    }
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn registry_sends_token_and_payload() {
    let (mock, addr) = spawn_scheduler(200).await;
    let client = AdminClient::new(&config(addr)).unwrap();

    let ret = client
        .registry(&RegistryParam::executor("demo-app", "http://10.0.0.5:9999"))
        .await
        .unwrap();
    assert!(ret.is_success());

    let seen = mock.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].token.as_deref(), Some("secret"));
    assert_eq!(
        seen[0].body,
        json!({
            "registryGroup": "EXECUTOR",
            "registryKey": "demo-app",
            "registryValue": "http://10.0.0.5:9999"
        })
    );
}

#[tokio::test]
async fn non_success_code_is_rejected() {
    let (_mock, addr) = spawn_scheduler(500).await;
    let client = AdminClient::new(&config(addr)).unwrap();

    let err = client
        .registry(&RegistryParam::executor("a", "b"))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoverError::Rejected(_)));
}

#[tokio::test]
async fn unreachable_scheduler_is_an_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AdminClient::new(&config(addr)).unwrap();
    let err = client
        .registry(&RegistryParam::executor("a", "b"))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoverError::HttpRequest(_)));
}

#[tokio::test]
async fn heartbeat_repeats_and_deregisters_on_shutdown() {
    let (mock, addr) = spawn_scheduler(200).await;
    let cfg = config(addr);
    let heartbeat = Heartbeat::new(AdminClient::new(&cfg).unwrap(), &cfg);
    assert_eq!(heartbeat.param().registry_key, "demo-app");

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(heartbeat.run(shutdown.clone()));

    wait_until(|| mock.count("/api/registry") >= 3).await;
    shutdown.cancel();
    handle.await.unwrap();

    assert_eq!(mock.count("/api/registryRemove"), 1);
    let last = mock.seen().pop().unwrap();
    assert_eq!(last.path, "/api/registryRemove");
    assert_eq!(last.body["registryGroup"], "EXECUTOR");
}

#[tokio::test]
async fn heartbeat_survives_rejections() {
    let (mock, addr) = spawn_scheduler(500).await;
    let cfg = config(addr);
    let heartbeat = Heartbeat::new(AdminClient::new(&cfg).unwrap(), &cfg);

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(heartbeat.run(shutdown.clone()));

    wait_until(|| mock.count("/api/registry") >= 2).await;
    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn callback_reporter_posts_result() {
    let (mock, addr) = spawn_scheduler(200).await;
    let reporter = CallbackReporter::new(AdminClient::new(&config(addr)).unwrap());

    reporter
        .report(CallbackParam {
            job_id: 12,
            code: 500,
            msg: "boom".into(),
            log_id: None,
        })
        .await;

    let seen = mock.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/api/callback");
    assert_eq!(seen[0].body, json!({ "jobID": 12, "code": 500, "msg": "boom" }));
}

#[tokio::test]
async fn callback_failure_is_swallowed() {
    let (mock, addr) = spawn_scheduler(500).await;
    let reporter = CallbackReporter::new(AdminClient::new(&config(addr)).unwrap());

    reporter
        .report(CallbackParam {
            job_id: 1,
            code: 200,
            msg: String::new(),
            log_id: Some(3),
        })
        .await;

    assert_eq!(mock.count("/api/callback"), 1);
}
