//! Run lifecycle events and the subscriber seam used by logging and metrics.

use std::fmt;

use xjob_model::{CancelReason, JobId};

use crate::runs::RunId;

/// Why a run request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    NotRegistered,
    AlreadyRunning,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotRegistered => "not_registered",
            RejectReason::AlreadyRunning => "already_running",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// A run was admitted and its task launched.
    Admitted {
        job_id: JobId,
        run_id: RunId,
        handler: String,
    },
    /// A run request was refused without touching the registries.
    Rejected {
        job_id: JobId,
        handler: String,
        reason: RejectReason,
    },
    /// A running instance was cancelled; emitted once per instance.
    Cancelled {
        job_id: JobId,
        run_id: RunId,
        reason: CancelReason,
    },
    /// The task panicked; a failure outcome is reported in its place.
    Panicked {
        job_id: JobId,
        run_id: RunId,
        message: String,
    },
    /// The task returned (or was replaced by a failure outcome after a panic).
    Completed {
        job_id: JobId,
        run_id: RunId,
        code: i32,
        msg: String,
    },
}

impl RunEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            RunEvent::Admitted { job_id, .. }
            | RunEvent::Rejected { job_id, .. }
            | RunEvent::Cancelled { job_id, .. }
            | RunEvent::Panicked { job_id, .. }
            | RunEvent::Completed { job_id, .. } => *job_id,
        }
    }
}

/// Receives run events.
///
/// Called inline on the emitting task, never while a registry lock is held.
/// Implementations must be cheap and must not block.
pub trait Subscribe: Send + Sync + 'static {
    fn on_event(&self, event: &RunEvent);

    fn name(&self) -> &'static str;
}
