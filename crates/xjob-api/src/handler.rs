use async_trait::async_trait;
use xjob_model::{IdleBeatRequest, KillRequest, LogRequest, LogResult, RunRequest};

use crate::error::ApiError;

/// Executor-side protocol handler.
///
/// Abstracts the backend so transports only deal with envelopes:
/// - Use the provided `ExecutorAdapter`
/// - Implement custom handlers with additional logic (auditing, rate limiting, etc.)
#[async_trait]
pub trait ExecutorApi: Send + Sync + 'static {
    /// Admit and launch a run; returns as soon as the run is admitted.
    async fn run(&self, req: RunRequest) -> Result<(), ApiError>;

    /// Cancel a running job.
    async fn kill(&self, req: KillRequest) -> Result<(), ApiError>;

    /// Read a page of a run's log.
    async fn log(&self, req: LogRequest) -> Result<LogResult, ApiError>;

    /// Liveness probe.
    async fn beat(&self) -> Result<(), ApiError>;

    /// Fails with [`ApiError::Busy`] while the job is running.
    async fn idle_beat(&self, req: IdleBeatRequest) -> Result<(), ApiError>;
}
