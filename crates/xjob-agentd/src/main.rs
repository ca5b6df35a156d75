mod config;
mod handlers;
mod shutdown;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use xjob_api::{
    ExecutorAdapter, HttpApi,
    axum::{self, http::header, response::IntoResponse, routing::get},
};
use xjob_core::{Executor, Subscribe, TaskRegistry};
use xjob_discover::{AdminClient, CallbackReporter, Heartbeat};
use xjob_observe::{Journal, init_logger};
use xjob_prometheus::PrometheusMetrics;

use crate::config::AgentConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Configuration + logger
    let cfg = AgentConfig::from_env()?;
    init_logger(&cfg.logger)?;
    cfg.admin.validate()?;
    cfg.http.validate()?;
    info!(
        admin = %cfg.admin.admin_address,
        app = %cfg.admin.app_name,
        address = %cfg.admin.executor_address,
        "configuration loaded"
    );

    // 2) Task definitions
    let tasks = TaskRegistry::new();
    handlers::register_builtin(&tasks);
    info!(handlers = ?tasks.names(), "task handlers registered");

    // 3) Executor with callback reporting and event subscribers
    let metrics = PrometheusMetrics::new().context("create metrics registry")?;
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Journal), Arc::new(metrics.clone())];
    let client = AdminClient::new(&cfg.admin)?;
    let executor = Executor::new(tasks)
        .with_reporter(Arc::new(CallbackReporter::new(client.clone())))
        .with_subscribers(subscribers);

    // 4) Dispatch API
    let adapter = Arc::new(ExecutorAdapter::new(executor.clone()));
    let router = HttpApi::new(adapter)
        .with_access_token(cfg.admin.access_token.clone())
        .router()
        .route("/metrics", get(move || render_metrics(metrics.clone())));
    let addr = cfg.http.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "dispatch api listening");

    // 5) Registration heartbeat
    let shutdown = shutdown::install_shutdown_handler();
    let heartbeat = tokio::spawn(Heartbeat::new(client, &cfg.admin).run(shutdown.clone()));

    // 6) Serve until a signal arrives
    let signal = shutdown.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { signal.cancelled().await })
        .await
        .context("serve dispatch api")?;

    // 7) Drain running instances, then let the heartbeat deregister
    shutdown.cancel();
    if !executor.shutdown(cfg.http.shutdown_grace).await {
        warn!(running = ?executor.running(), "instances still running after grace period");
    }
    if let Err(e) = heartbeat.await {
        warn!(error = %e, "heartbeat task ended abnormally");
    }
    info!("executor stopped");
    Ok(())
}

async fn render_metrics(metrics: PrometheusMetrics) -> axum::response::Response {
    match metrics.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, metrics.content_type())], body).into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("encode metrics: {e}"),
        )
            .into_response(),
    }
}
