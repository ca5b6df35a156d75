use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use xjob_model::RegistryParam;

use crate::{client::AdminClient, config::AdminConfig, errors::DiscoverError};

/// Periodic executor registration.
///
/// Registers immediately, then once per interval until the shutdown token fires,
/// then sends a single best-effort deregistration. Failed attempts are logged and
/// left to the next tick.
pub struct Heartbeat {
    client: AdminClient,
    param: RegistryParam,
    interval: Duration,
}

impl Heartbeat {
    pub fn new(client: AdminClient, cfg: &AdminConfig) -> Self {
        Self {
            client,
            param: RegistryParam::executor(&cfg.app_name, &cfg.executor_address),
            interval: cfg.heartbeat_interval(),
        }
    }

    pub fn param(&self) -> &RegistryParam {
        &self.param
    }

    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut registered = false;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.beat().await {
                Ok(()) if !registered => {
                    info!(key = %self.param.registry_key, address = %self.param.registry_value, "executor registered");
                    registered = true;
                }
                Ok(()) => debug!("executor registration renewed"),
                Err(e) => {
                    warn!(error = %e, "executor registration failed");
                    registered = false;
                }
            }
        }

        self.deregister().await;
    }

    pub async fn beat(&self) -> Result<(), DiscoverError> {
        self.client.registry(&self.param).await.map(|_| ())
    }

    /// Withdraw the executor once; failures are only logged.
    pub async fn deregister(&self) {
        match self.client.registry_remove(&self.param).await {
            Ok(_) => info!(key = %self.param.registry_key, "executor deregistered"),
            Err(e) => warn!(error = %e, "executor deregistration failed"),
        }
    }
}
