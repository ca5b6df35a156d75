use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use xjob_core::{Executor, TaskContext, TaskFn, TaskOutcome, TaskRegistry};
use xjob_model::CancelReason;

use super::*;
use crate::ExecutorAdapter;

fn executor() -> Executor {
    let tasks = TaskRegistry::new();
    tasks.register(
        "demo",
        TaskFn::arc(|ctx: TaskContext| async move {
            ctx.cancelled().await;
            TaskOutcome::fail("cancelled")
        }),
    );
    Executor::new(tasks)
}

fn app(executor: &Executor) -> Router {
    HttpApi::new(Arc::new(ExecutorAdapter::new(executor.clone()))).router()
}

async fn call(app: &Router, path: &str, body: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = token {
        req = req.header(ACCESS_TOKEN_HEADER, token);
    }
    let response = app
        .clone()
        .oneshot(req.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn run_admits_registered_task() {
    let executor = executor();
    let app = app(&executor);

    let (status, body) = call(
        &app,
        "/run",
        r#"{"executorHandler":"demo","jobID":1,"executorTimeout":0}"#,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert!(executor.is_running(1));
}

#[tokio::test]
async fn run_unregistered_task() {
    let executor = executor();
    let app = app(&executor);

    let (_, body) = call(&app, "/run", r#"{"executorHandler":"ghost","jobID":1}"#, None).await;

    assert_eq!(body, json!({ "code": 500, "msg": "Task not registered" }));
    assert!(executor.runs().is_empty());
}

#[tokio::test]
async fn second_run_is_discarded() {
    let executor = executor();
    let app = app(&executor);
    let run = r#"{"executorHandler":"demo","jobID":1}"#;

    call(&app, "/run", run, None).await;
    let original = executor.runs().lookup(1).unwrap();

    let (_, body) = call(&app, "/run", run, None).await;

    assert_eq!(body, json!({ "code": 500, "msg": "There are tasks running" }));
    assert_eq!(executor.runs().lookup(1).unwrap().run_id, original.run_id);
    assert!(!original.cancel_handle().is_cancelled());
}

#[tokio::test]
async fn cover_early_replaces() {
    let executor = executor();
    let app = app(&executor);

    call(&app, "/run", r#"{"executorHandler":"demo","jobID":1}"#, None).await;
    let original = executor.runs().lookup(1).unwrap();

    let (_, body) = call(
        &app,
        "/run",
        r#"{"executorHandler":"demo","jobID":1,"executorBlockStrategy":"COVER_EARLY"}"#,
        None,
    )
    .await;

    assert_eq!(body["code"], 200);
    assert_eq!(
        original.cancel_handle().reason(),
        Some(CancelReason::Replaced)
    );
    assert_ne!(executor.runs().lookup(1).unwrap().run_id, original.run_id);
}

#[tokio::test]
async fn kill_not_running() {
    let executor = executor();
    let app = app(&executor);

    let (status, body) = call(&app, "/kill", r#"{"jobID":2}"#, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 500);
    assert_eq!(body["msg"], "not running");
}

#[tokio::test]
async fn kill_running_job() {
    let executor = executor();
    let app = app(&executor);
    call(&app, "/run", r#"{"executorHandler":"demo","jobID":3}"#, None).await;
    let handle = executor.runs().lookup(3).unwrap().cancel_handle().clone();

    let (_, body) = call(&app, "/kill", r#"{"jobID":3}"#, None).await;

    assert_eq!(body["code"], 200);
    assert!(!executor.is_running(3));
    assert_eq!(handle.reason(), Some(CancelReason::Killed));
}

#[tokio::test]
async fn malformed_body_is_a_params_error() {
    let executor = executor();
    let app = app(&executor);

    let (status, body) = call(&app, "/run", "{not json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "code": 500, "msg": "params err" }));

    let (_, body) = call(&app, "/kill", r#"{"jobID":"abc"}"#, None).await;
    assert_eq!(body["msg"], "params err");
    assert!(executor.runs().is_empty());
}

#[tokio::test]
async fn log_returns_envelope() {
    let executor = executor();
    let app = app(&executor);

    let (_, body) = call(
        &app,
        "/log",
        r#"{"logDateTim":0,"logId":5,"fromLineNum":1}"#,
        None,
    )
    .await;

    assert_eq!(body["code"], 200);
    assert_eq!(body["content"]["fromLineNum"], 1);
    assert_eq!(body["content"]["isEnd"], true);
}

#[tokio::test]
async fn beat_and_idle_beat() {
    let executor = executor();
    let app = app(&executor);

    let (_, body) = call(&app, "/beat", "", None).await;
    assert_eq!(body["code"], 200);

    let (_, body) = call(&app, "/idleBeat", r#"{"jobID":4}"#, None).await;
    assert_eq!(body["code"], 200);

    call(&app, "/run", r#"{"executorHandler":"demo","jobID":4}"#, None).await;
    let (_, body) = call(&app, "/idleBeat", r#"{"jobID":4}"#, None).await;
    assert_eq!(body["code"], 500);
    assert_eq!(body["msg"], "job thread is running or has trigger queue.");
}

#[tokio::test]
async fn access_token_is_enforced() {
    let executor = executor();
    let app = HttpApi::new(Arc::new(ExecutorAdapter::new(executor.clone())))
        .with_access_token("secret")
        .router();
    let run = r#"{"executorHandler":"demo","jobID":1}"#;

    let (_, body) = call(&app, "/run", run, None).await;
    assert_eq!(body["msg"], "The access token is wrong.");

    let (_, body) = call(&app, "/run", run, Some("wrong")).await;
    assert_eq!(body["code"], 500);
    assert!(executor.runs().is_empty());

    let (_, body) = call(&app, "/run", run, Some("secret")).await;
    assert_eq!(body["code"], 200);
    assert!(executor.is_running(1));
}

#[tokio::test]
async fn empty_access_token_disables_check() {
    let executor = executor();
    let app = HttpApi::new(Arc::new(ExecutorAdapter::new(executor.clone())))
        .with_access_token("")
        .router();

    let (_, body) = call(&app, "/beat", "", Some("anything")).await;
    assert_eq!(body["code"], 200);
}
