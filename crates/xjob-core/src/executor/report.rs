use async_trait::async_trait;
use xjob_model::CallbackParam;

/// Sink for completion results.
///
/// Called exactly once per finished run. Delivery is best effort:
/// implementations log failures and never retry or re-admit the run.
#[async_trait]
pub trait Reporter: Send + Sync + 'static {
    async fn report(&self, result: CallbackParam);
}

/// Reporter that drops every result.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

#[async_trait]
impl Reporter for NoopReporter {
    async fn report(&self, _result: CallbackParam) {}
}
