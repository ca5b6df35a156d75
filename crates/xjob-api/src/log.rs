use async_trait::async_trait;
use xjob_model::{LogRequest, LogResult};

use crate::error::ApiError;

/// Source of run log content served on `/log`.
#[async_trait]
pub trait LogHandler: Send + Sync + 'static {
    async fn read(&self, req: &LogRequest) -> Result<LogResult, ApiError>;
}

/// Serves an empty, finished page for every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogHandler;

#[async_trait]
impl LogHandler for NoopLogHandler {
    async fn read(&self, req: &LogRequest) -> Result<LogResult, ApiError> {
        Ok(LogResult::empty(req.from_line_num))
    }
}
