use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;
use xjob_model::CancelReason;

/// Cancellation handle of one running instance.
///
/// The first [`CancelHandle::cancel`] wins: it records the reason and trips the token.
/// Every later call is a no-op, whichever of timeout, kill, replacement or shutdown comes second.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
    reason: Arc<OnceLock<CancelReason>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this call triggered the cancellation.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        if self.reason.set(reason).is_err() {
            return false;
        }
        self.token.cancel();
        true
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.reason.get().is_some()
    }

    /// Reason recorded by the winning trigger.
    pub fn reason(&self) -> Option<CancelReason> {
        self.reason.get().copied()
    }

    /// Token observed by the task.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}
