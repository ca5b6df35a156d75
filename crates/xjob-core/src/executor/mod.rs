//! Task execution engine.
//!
//! [`Executor`] ties the two registries together: it admits run requests through the
//! [`RunRegistry`], launches admitted tasks on their own tokio task, enforces timeouts,
//! reports completion through a [`Reporter`] and removes finished runs.

mod report;
pub use report::{NoopReporter, Reporter};

use std::{
    any::Any,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tracing::{debug, info, instrument, trace, warn};
use xjob_model::{CallbackParam, CancelReason, JobId, LogId, RunRequest};

use crate::{
    cancel::CancelHandle,
    error::CoreError,
    events::{RejectReason, RunEvent, Subscribe},
    registry::TaskRegistry,
    runs::{RunId, RunRegistry, RunningTask},
    task::{TaskContext, TaskOutcome, TaskRef},
};

const DRAIN_POLL: Duration = Duration::from_millis(20);

#[derive(Clone)]
pub struct Executor {
    tasks: TaskRegistry,
    runs: RunRegistry,
    reporter: Arc<dyn Reporter>,
    subscribers: Arc<Vec<Arc<dyn Subscribe>>>,
    next_run: Arc<AtomicU64>,
}

impl Executor {
    pub fn new(tasks: TaskRegistry) -> Self {
        Self {
            tasks,
            runs: RunRegistry::new(),
            reporter: Arc::new(NoopReporter),
            subscribers: Arc::new(Vec::new()),
            next_run: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = Arc::new(subscribers);
        self
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn runs(&self) -> &RunRegistry {
        &self.runs
    }

    /// Admit a run request and launch its task without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(level = "debug", skip(self, req), fields(job_id = req.job_id, handler = %req.executor_handler))]
    pub fn run(&self, req: RunRequest) -> Result<RunId, CoreError> {
        let task = match self.tasks.lookup(&req.executor_handler) {
            Ok(task) => task,
            Err(e) => {
                debug!("task not registered");
                self.reject(&req, RejectReason::NotRegistered);
                return Err(e);
            }
        };

        let run_id = self.next_run.fetch_add(1, Ordering::Relaxed) + 1;
        let timeout = req.timeout();
        let running = RunningTask::new(req.job_id, run_id, req.executor_handler.clone())
            .with_params(req.executor_params.clone())
            .with_timeout(timeout);
        let cancel = running.cancel_handle().clone();

        match self.runs.try_admit(running, req.executor_block_strategy) {
            Ok(Some(replaced)) => {
                debug!(replaced_run = replaced.run_id, "running instance replaced");
                self.emit(&RunEvent::Cancelled {
                    job_id: replaced.job_id,
                    run_id: replaced.run_id,
                    reason: CancelReason::Replaced,
                });
            }
            Ok(None) => {}
            Err(e) => {
                debug!(strategy = %req.executor_block_strategy, "job already running; request discarded");
                self.reject(&req, RejectReason::AlreadyRunning);
                return Err(e);
            }
        }

        debug!(run_id, ?timeout, "launching task");
        self.emit(&RunEvent::Admitted {
            job_id: req.job_id,
            run_id,
            handler: req.executor_handler.clone(),
        });

        let mut ctx = TaskContext::new(req.job_id, run_id, cancel.token());
        ctx.params = req.executor_params;
        ctx.log_id = req.log_id;
        ctx.broadcast_index = req.broadcast_index;
        ctx.broadcast_total = req.broadcast_total;

        self.launch(task, ctx, cancel, timeout);
        Ok(run_id)
    }

    /// Cancel and remove the running instance of `job_id`.
    #[instrument(level = "debug", skip(self))]
    pub fn kill(&self, job_id: JobId) -> Result<(), CoreError> {
        let (killed, triggered) = self.runs.kill(job_id, CancelReason::Killed).inspect_err(|_| {
            debug!("kill requested for a job that is not running");
        })?;

        debug!(run_id = killed.run_id, triggered, "running instance removed");
        // a timed-out instance is already cancelled; it only leaves the registry here
        if triggered {
            self.emit(&RunEvent::Cancelled {
                job_id,
                run_id: killed.run_id,
                reason: CancelReason::Killed,
            });
        }
        Ok(())
    }

    /// Returns `true` if an instance of `job_id` is currently running.
    pub fn is_running(&self, job_id: JobId) -> bool {
        self.runs.exists(job_id)
    }

    /// Sorted ids of all running jobs.
    pub fn running(&self) -> Vec<JobId> {
        self.runs.job_ids()
    }

    /// Cancel every running instance and wait up to `grace` for them to finish.
    ///
    /// Returns `true` if the registry drained within the grace period.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        for task in self.runs.list() {
            if task.cancel(CancelReason::Shutdown) {
                self.emit(&RunEvent::Cancelled {
                    job_id: task.job_id,
                    run_id: task.run_id,
                    reason: CancelReason::Shutdown,
                });
            }
        }

        let drained = tokio::time::timeout(grace, async {
            while !self.runs.is_empty() {
                tokio::time::sleep(DRAIN_POLL).await;
            }
        })
        .await
        .is_ok();

        if drained {
            info!("all tasks stopped within grace period");
        } else {
            warn!(remaining = ?self.runs.job_ids(), "grace exceeded; some tasks did not stop in time");
        }
        drained
    }

    fn launch(&self, task: TaskRef, ctx: TaskContext, cancel: CancelHandle, timeout: Option<Duration>) {
        let this = self.clone();
        let job_id = ctx.job_id;
        let run_id = ctx.run_id;
        let log_id = ctx.log_id;

        tokio::spawn(async move {
            let _cleanup = Cleanup {
                runs: this.runs.clone(),
                job_id,
                run_id,
            };

            let mut join = tokio::spawn(async move { task.run(ctx).await });
            let joined = match timeout {
                Some(limit) => match tokio::time::timeout(limit, &mut join).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        if cancel.cancel(CancelReason::Timeout) {
                            trace!(job_id, run_id, ?limit, "timeout elapsed; waiting for task to observe cancellation");
                            this.emit(&RunEvent::Cancelled {
                                job_id,
                                run_id,
                                reason: CancelReason::Timeout,
                            });
                        }
                        join.await
                    }
                },
                None => join.await,
            };

            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => {
                    let message = panic_message(e.into_panic());
                    this.emit(&RunEvent::Panicked {
                        job_id,
                        run_id,
                        message: message.clone(),
                    });
                    TaskOutcome::fail(format!("task panicked: {message}"))
                }
                Err(e) => TaskOutcome::fail(format!("task aborted: {e}")),
            };

            debug!(job_id, run_id, code = outcome.code, msg = %outcome.msg, "task finished");
            this.emit(&RunEvent::Completed {
                job_id,
                run_id,
                code: outcome.code,
                msg: outcome.msg.clone(),
            });
            this.complete(job_id, log_id, outcome).await;
        });
    }

    async fn complete(&self, job_id: JobId, log_id: Option<LogId>, outcome: TaskOutcome) {
        self.reporter
            .report(CallbackParam {
                job_id,
                code: outcome.code,
                msg: outcome.msg,
                log_id,
            })
            .await;
    }

    fn reject(&self, req: &RunRequest, reason: RejectReason) {
        self.emit(&RunEvent::Rejected {
            job_id: req.job_id,
            handler: req.executor_handler.clone(),
            reason,
        });
    }

    fn emit(&self, event: &RunEvent) {
        for sub in self.subscribers.iter() {
            trace!(subscriber = sub.name(), ?event, "dispatching run event");
            sub.on_event(event);
        }
    }
}

/// Removes the finished run from the registry on every exit path of the supervising task.
struct Cleanup {
    runs: RunRegistry,
    job_id: JobId,
    run_id: RunId,
}

impl Drop for Cleanup {
    fn drop(&mut self) {
        if self.runs.remove_run(self.job_id, self.run_id).is_some() {
            trace!(job_id = self.job_id, run_id = self.run_id, "run removed from registry");
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
