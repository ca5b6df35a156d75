use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use xjob_core::Executor;
use xjob_model::{IdleBeatRequest, KillRequest, LogRequest, LogResult, RunRequest};

use crate::{
    error::ApiError,
    handler::ExecutorApi,
    log::{LogHandler, NoopLogHandler},
};

/// Adapter that bridges [`Executor`] to [`ExecutorApi`].
pub struct ExecutorAdapter {
    executor: Executor,
    logs: Arc<dyn LogHandler>,
}

impl ExecutorAdapter {
    pub fn new(executor: Executor) -> Self {
        Self {
            executor,
            logs: Arc::new(NoopLogHandler),
        }
    }

    pub fn with_log_handler(mut self, logs: Arc<dyn LogHandler>) -> Self {
        self.logs = logs;
        self
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}

#[async_trait]
impl ExecutorApi for ExecutorAdapter {
    async fn run(&self, req: RunRequest) -> Result<(), ApiError> {
        let run_id = self.executor.run(req)?;
        debug!(run_id, "run admitted");
        Ok(())
    }

    async fn kill(&self, req: KillRequest) -> Result<(), ApiError> {
        self.executor.kill(req.job_id).map_err(ApiError::from)
    }

    async fn log(&self, req: LogRequest) -> Result<LogResult, ApiError> {
        self.logs.read(&req).await
    }

    async fn beat(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn idle_beat(&self, req: IdleBeatRequest) -> Result<(), ApiError> {
        if self.executor.is_running(req.job_id) {
            return Err(ApiError::Busy(req.job_id));
        }
        Ok(())
    }
}
