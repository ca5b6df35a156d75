use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::serde_ext::null_as_default;
use super::{BlockStrategy, JobId, LogId};

/// Body of `POST /run`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Name of the registered task definition to execute.
    #[serde(rename = "executorHandler")]
    pub executor_handler: String,
    #[serde(rename = "jobID")]
    pub job_id: JobId,
    /// Opaque parameters handed to the task as-is.
    #[serde(rename = "executorParams", default, deserialize_with = "null_as_default")]
    pub executor_params: String,
    /// Timeout in seconds; `0` or negative means no timeout.
    #[serde(rename = "executorTimeout", default, deserialize_with = "null_as_default")]
    pub executor_timeout: i64,
    #[serde(rename = "executorBlockStrategy", default)]
    pub executor_block_strategy: BlockStrategy,

    #[serde(rename = "logId", default, skip_serializing_if = "Option::is_none")]
    pub log_id: Option<LogId>,
    #[serde(rename = "logDateTime", default, skip_serializing_if = "Option::is_none")]
    pub log_date_time: Option<i64>,
    #[serde(rename = "broadcastIndex", default, deserialize_with = "null_as_default")]
    pub broadcast_index: i32,
    #[serde(rename = "broadcastTotal", default, deserialize_with = "null_as_default")]
    pub broadcast_total: i32,
}

impl RunRequest {
    pub fn new(handler: impl Into<String>, job_id: JobId) -> Self {
        Self {
            executor_handler: handler.into(),
            job_id,
            ..Default::default()
        }
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.executor_params = params.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: i64) -> Self {
        self.executor_timeout = secs;
        self
    }

    pub fn with_strategy(mut self, strategy: BlockStrategy) -> Self {
        self.executor_block_strategy = strategy;
        self
    }

    /// Positive timeout as a duration, `None` when the run is unbounded.
    pub fn timeout(&self) -> Option<Duration> {
        u64::try_from(self.executor_timeout)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Body of `POST /kill`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillRequest {
    #[serde(rename = "jobID")]
    pub job_id: JobId,
}

/// Body of `POST /idleBeat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleBeatRequest {
    #[serde(rename = "jobID")]
    pub job_id: JobId,
}
