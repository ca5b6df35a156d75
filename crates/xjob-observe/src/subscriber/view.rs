use tracing::{debug, error, info, warn};
use xjob_core::{RejectReason, RunEvent};
use xjob_model::CancelReason;

#[inline]
pub fn message_for(event: &RunEvent) -> &'static str {
    match event {
        RunEvent::Admitted { .. } => "run admitted and task launched",
        RunEvent::Rejected { reason, .. } => match reason {
            RejectReason::NotRegistered => "run rejected: no task registered under handler",
            RejectReason::AlreadyRunning => "run rejected: job already has a running instance",
        },
        RunEvent::Cancelled { reason, .. } => match reason {
            CancelReason::Timeout => "run exceeded its timeout",
            CancelReason::Killed => "run killed on scheduler request",
            CancelReason::Replaced => "run replaced by a newer trigger",
            CancelReason::Shutdown => "run cancelled by executor shutdown",
        },
        RunEvent::Panicked { .. } => "task panicked; reporting failure",
        RunEvent::Completed { .. } => "run finished",
    }
}

#[inline]
pub fn log_event(event: &RunEvent) {
    let msg = message_for(event);

    match event {
        RunEvent::Admitted {
            job_id,
            run_id,
            handler,
        } => info!(job_id, run_id, handler = handler.as_str(), "{msg}"),
        RunEvent::Rejected {
            job_id,
            handler,
            reason,
        } => debug!(
            job_id,
            handler = handler.as_str(),
            reason = reason.as_str(),
            "{msg}"
        ),
        RunEvent::Cancelled {
            job_id,
            run_id,
            reason,
        } => match reason {
            CancelReason::Timeout => warn!(job_id, run_id, "{msg}"),
            _ => info!(job_id, run_id, reason = reason.as_str(), "{msg}"),
        },
        RunEvent::Panicked {
            job_id,
            run_id,
            message,
        } => error!(job_id, run_id, panic = message.as_str(), "{msg}"),
        RunEvent::Completed {
            job_id,
            run_id,
            code,
            msg: result,
        } => {
            if *code == xjob_model::SUCCESS_CODE {
                info!(job_id, run_id, code, "{msg}");
            } else {
                warn!(job_id, run_id, code, result = result.as_str(), "{msg}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_messages_follow_reason() {
        let ev = |reason| RunEvent::Cancelled {
            job_id: 1,
            run_id: 1,
            reason,
        };
        assert_eq!(
            message_for(&ev(CancelReason::Timeout)),
            "run exceeded its timeout"
        );
        assert_eq!(
            message_for(&ev(CancelReason::Replaced)),
            "run replaced by a newer trigger"
        );
    }

    #[test]
    fn log_event_without_subscriber_is_harmless() {
        log_event(&RunEvent::Completed {
            job_id: 7,
            run_id: 3,
            code: 500,
            msg: "boom".into(),
        });
    }
}
