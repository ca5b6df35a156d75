use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, SystemTime},
};

use xjob_model::{BlockStrategy, CancelReason, JobId};

use crate::{
    admission::{Resolution, resolve},
    cancel::CancelHandle,
    error::CoreError,
    sync::lock,
};

/// Process-unique identifier of one admitted run.
///
/// Distinguishes two successive instances of the same job.
pub type RunId = u64;

/// A live, cancellable execution of a task definition.
#[derive(Debug, Clone)]
pub struct RunningTask {
    pub job_id: JobId,
    pub run_id: RunId,
    pub handler: String,
    pub params: String,
    pub timeout: Option<Duration>,
    pub started_at: SystemTime,
    cancel: CancelHandle,
}

impl RunningTask {
    pub fn new(job_id: JobId, run_id: RunId, handler: impl Into<String>) -> Self {
        Self {
            job_id,
            run_id,
            handler: handler.into(),
            params: String::new(),
            timeout: None,
            started_at: SystemTime::now(),
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = params.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cancel_handle(&self) -> &CancelHandle {
        &self.cancel
    }

    /// Returns `true` if this call triggered the cancellation.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        self.cancel.cancel(reason)
    }
}

/// In-flight runs indexed by job id.
///
/// A single mutex guards the map so that the conflict check and the admission of a new run
/// happen atomically. Entries never expire; they leave only through an explicit removal.
#[derive(Clone, Default)]
pub struct RunRegistry {
    inner: Arc<Mutex<HashMap<JobId, RunningTask>>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check for a conflict and admit `task` in one critical section.
    ///
    /// On conflict the strategy decides: reject with [`CoreError::TaskAlreadyRunning`],
    /// or cancel and evict the running instance, which is then returned.
    pub fn try_admit(
        &self,
        task: RunningTask,
        strategy: BlockStrategy,
    ) -> Result<Option<RunningTask>, CoreError> {
        let mut runs = lock(&self.inner);
        let job_id = task.job_id;

        let replaced = if runs.contains_key(&job_id) {
            match resolve(strategy) {
                Resolution::Reject => return Err(CoreError::TaskAlreadyRunning(job_id)),
                Resolution::Replace => runs.remove(&job_id).inspect(|old| {
                    old.cancel(CancelReason::Replaced);
                }),
            }
        } else {
            None
        };

        runs.insert(job_id, task);
        Ok(replaced)
    }

    pub fn exists(&self, job_id: JobId) -> bool {
        lock(&self.inner).contains_key(&job_id)
    }

    pub fn lookup(&self, job_id: JobId) -> Option<RunningTask> {
        lock(&self.inner).get(&job_id).cloned()
    }

    pub fn remove(&self, job_id: JobId) -> Option<RunningTask> {
        lock(&self.inner).remove(&job_id)
    }

    /// Remove the entry only if it still belongs to `run_id`.
    ///
    /// A finished run must not evict the instance that replaced it.
    pub fn remove_run(&self, job_id: JobId, run_id: RunId) -> Option<RunningTask> {
        let mut runs = lock(&self.inner);
        match runs.get(&job_id) {
            Some(current) if current.run_id == run_id => runs.remove(&job_id),
            _ => None,
        }
    }

    /// Remove and cancel the running instance of `job_id`.
    ///
    /// The flag is `false` when the instance was already cancelled, e.g. by its timeout.
    pub fn kill(
        &self,
        job_id: JobId,
        reason: CancelReason,
    ) -> Result<(RunningTask, bool), CoreError> {
        let task = self.remove(job_id).ok_or(CoreError::NotRunning(job_id))?;
        let triggered = task.cancel(reason);
        Ok((task, triggered))
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all running instances.
    pub fn list(&self) -> Vec<RunningTask> {
        lock(&self.inner).values().cloned().collect()
    }

    /// Sorted job ids of all running instances.
    pub fn job_ids(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = lock(&self.inner).keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
