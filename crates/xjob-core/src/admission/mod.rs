use xjob_model::BlockStrategy;

/// What to do with a run request whose job is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Leave the running instance alone and refuse the request.
    Reject,
    /// Cancel the running instance and admit the request.
    Replace,
}

/// Decide a conflict between a running instance and a new request for the same job.
///
/// Only consulted on conflict; a job that is not running is always admitted.
#[inline]
pub fn resolve(strategy: BlockStrategy) -> Resolution {
    match strategy {
        BlockStrategy::CoverEarly => Resolution::Replace,
        BlockStrategy::SerialExecution | BlockStrategy::DiscardLater => Resolution::Reject,
    }
}
