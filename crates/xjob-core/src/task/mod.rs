//! Task definitions: the handler contract every registered job implements.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use xjob_model::{FAIL_CODE, JobId, LogId, SUCCESS_CODE};

use crate::runs::RunId;

/// Shared handle to a task definition.
pub type TaskRef = Arc<dyn Task>;

/// Executable handler of a task definition.
///
/// Cancellation is cooperative: implementations must watch [`TaskContext::cancelled`]
/// (or poll [`TaskContext::is_cancelled`]) and return promptly once it fires.
#[async_trait]
pub trait Task: Send + Sync + 'static {
    async fn run(&self, ctx: TaskContext) -> TaskOutcome;
}

/// Everything a handler gets to know about the run it is executing.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub job_id: JobId,
    pub run_id: RunId,
    /// Opaque `executorParams` of the triggering request.
    pub params: String,
    pub log_id: Option<LogId>,
    pub broadcast_index: i32,
    pub broadcast_total: i32,
    token: CancellationToken,
}

impl TaskContext {
    pub fn new(job_id: JobId, run_id: RunId, token: CancellationToken) -> Self {
        Self {
            job_id,
            run_id,
            params: String::new(),
            log_id: None,
            broadcast_index: 0,
            broadcast_total: 0,
            token,
        }
    }

    /// Level-triggered: stays `true` once the run was cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves when the run is cancelled by timeout, kill, replacement or shutdown.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Result code and message reported back to the scheduler.
///
/// The engine passes the code through untouched; only `200` means success to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub code: i32,
    pub msg: String,
}

impl TaskOutcome {
    pub fn new(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    pub fn success() -> Self {
        Self::new(SUCCESS_CODE, "")
    }

    pub fn success_with(msg: impl Into<String>) -> Self {
        Self::new(SUCCESS_CODE, msg)
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self::new(FAIL_CODE, msg)
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Closure-backed [`Task`].
pub struct TaskFn<F> {
    f: F,
}

impl<F, Fut> TaskFn<F>
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskOutcome> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }

    pub fn arc(f: F) -> TaskRef {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskOutcome> + Send + 'static,
{
    async fn run(&self, ctx: TaskContext) -> TaskOutcome {
        (self.f)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn task_fn_passes_context_through() {
        let task = TaskFn::arc(|ctx: TaskContext| async move {
            TaskOutcome::success_with(format!("{}:{}", ctx.job_id, ctx.params))
        });

        let mut ctx = TaskContext::new(7, 1, CancellationToken::new());
        ctx.params = "x=1".into();

        let out = task.run(ctx).await;
        assert!(out.is_success());
        assert_eq!(out.msg, "7:x=1");
    }

    #[tokio::test]
    async fn context_observes_cancellation() {
        let token = CancellationToken::new();
        let ctx = TaskContext::new(1, 1, token.clone());
        assert!(!ctx.is_cancelled());

        token.cancel();
        ctx.cancelled().await;
        assert!(ctx.is_cancelled());
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn outcome_codes() {
        assert_eq!(TaskOutcome::success().code, 200);
        assert_eq!(TaskOutcome::fail("x").code, 500);
        assert!(!TaskOutcome::new(201, "").is_success());
    }
}
