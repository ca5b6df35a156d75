use async_trait::async_trait;
use tracing::{debug, warn};
use xjob_core::Reporter;
use xjob_model::CallbackParam;

use crate::client::AdminClient;

/// Delivers run results to the scheduler's callback endpoint, at most once.
pub struct CallbackReporter {
    client: AdminClient,
}

impl CallbackReporter {
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Reporter for CallbackReporter {
    async fn report(&self, result: CallbackParam) {
        match self.client.callback(&result).await {
            Ok(_) => debug!(job_id = result.job_id, code = result.code, "callback delivered"),
            Err(e) => warn!(job_id = result.job_id, error = %e, "callback delivery failed"),
        }
    }
}
