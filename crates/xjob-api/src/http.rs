use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use xjob_model::{
    ACCESS_TOKEN_HEADER, IdleBeatRequest, KillRequest, LogRequest, LogResponse, ReturnT, RunRequest,
};

use crate::{error::ApiError, handler::ExecutorApi};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
    access_token: Option<String>,
}

struct ApiState<H> {
    handler: Arc<H>,
    access_token: Option<String>,
}

impl<H> ApiState<H> {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = self.access_token.as_deref() else {
            return Ok(());
        };
        let given = headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if given != Some(expected) {
            warn!("request rejected: access token mismatch");
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }
}

impl<H> HttpApi<H>
where
    H: ExecutorApi,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            access_token: None,
        }
    }

    /// Require `XXL-JOB-ACCESS-TOKEN` on every request; an empty token disables the check.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.access_token = (!token.is_empty()).then_some(token);
        self
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /run - Admit and launch a run
    /// - POST /kill - Cancel a running job
    /// - POST /log - Read run log
    /// - POST /beat - Liveness probe
    /// - POST /idleBeat - Check whether a job is idle
    pub fn router(self) -> Router {
        let state = Arc::new(ApiState {
            handler: self.handler,
            access_token: self.access_token,
        });
        Router::new()
            .route("/run", post(run::<H>))
            .route("/kill", post(kill::<H>))
            .route("/log", post(log::<H>))
            .route("/beat", post(beat::<H>))
            .route("/idleBeat", post(idle_beat::<H>))
            .with_state(state)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /run
async fn run<H>(
    State(state): State<Arc<ApiState<H>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ReturnT>, ApiError>
where
    H: ExecutorApi,
{
    state.authorize(&headers)?;
    let req: RunRequest = parse(&body)?;
    debug!(job_id = req.job_id, handler = %req.executor_handler, strategy = %req.executor_block_strategy, "run requested");

    state.handler.run(req).await?;
    Ok(Json(ReturnT::success()))
}

/// POST /kill
async fn kill<H>(
    State(state): State<Arc<ApiState<H>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ReturnT>, ApiError>
where
    H: ExecutorApi,
{
    state.authorize(&headers)?;
    let req: KillRequest = parse(&body)?;
    debug!(job_id = req.job_id, "kill requested");

    state.handler.kill(req).await?;
    Ok(Json(ReturnT::success()))
}

/// POST /log
async fn log<H>(
    State(state): State<Arc<ApiState<H>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LogResponse>, ApiError>
where
    H: ExecutorApi,
{
    state.authorize(&headers)?;
    let req: LogRequest = parse(&body)?;
    debug!(log_id = req.log_id, from = req.from_line_num, "log requested");

    let content = state.handler.log(req).await?;
    Ok(Json(LogResponse::ok(content)))
}

/// POST /beat
async fn beat<H>(
    State(state): State<Arc<ApiState<H>>>,
    headers: HeaderMap,
) -> Result<Json<ReturnT>, ApiError>
where
    H: ExecutorApi,
{
    state.authorize(&headers)?;
    state.handler.beat().await?;
    Ok(Json(ReturnT::success()))
}

/// POST /idleBeat
async fn idle_beat<H>(
    State(state): State<Arc<ApiState<H>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ReturnT>, ApiError>
where
    H: ExecutorApi,
{
    state.authorize(&headers)?;
    let req: IdleBeatRequest = parse(&body)?;

    state.handler.idle_beat(req).await?;
    Ok(Json(ReturnT::success()))
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "malformed request body");
        ApiError::InvalidRequest(e.to_string())
    })
}

#[cfg(test)]
mod tests;
