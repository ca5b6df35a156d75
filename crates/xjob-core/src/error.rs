use thiserror::Error;
use xjob_model::JobId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("task not registered: {0}")]
    TaskNotRegistered(String),

    #[error("job {0} is already running")]
    TaskAlreadyRunning(JobId),

    #[error("job {0} is not running")]
    NotRunning(JobId),
}
