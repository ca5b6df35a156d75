use std::time::Duration;

use crate::errors::DiscoverError;

/// Connection to the central scheduler and the identity announced to it.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the scheduler, e.g. `http://127.0.0.1:8080/xxl-job-admin`.
    pub admin_address: String,
    /// Shared token sent as `XXL-JOB-ACCESS-TOKEN`; empty disables it.
    pub access_token: String,
    /// Registry key the executor announces itself under.
    pub app_name: String,
    /// Address the scheduler calls back, e.g. `http://10.0.0.5:9999`.
    pub executor_address: String,
    /// Timeout of every outbound call (default: 3 seconds).
    pub timeout_ms: u64,
    /// Registration interval (default: 20 seconds).
    pub heartbeat_interval_ms: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        Self {
            admin_address: "http://127.0.0.1:8080/xxl-job-admin".to_string(),
            access_token: String::new(),
            app_name: "xjob-executor".to_string(),
            executor_address: format!("http://{host}:9999"),
            timeout_ms: 3_000,
            heartbeat_interval_ms: 20_000,
        }
    }
}

impl AdminConfig {
    pub fn validate(&self) -> Result<(), DiscoverError> {
        if !self.admin_address.starts_with("http://") && !self.admin_address.starts_with("https://") {
            return Err(DiscoverError::InvalidConfig(format!(
                "admin address must be an http(s) url: {}",
                self.admin_address
            )));
        }
        if self.app_name.trim().is_empty() {
            return Err(DiscoverError::InvalidConfig("app name cannot be empty".into()));
        }
        if self.executor_address.trim().is_empty() {
            return Err(DiscoverError::InvalidConfig(
                "executor address cannot be empty".into(),
            ));
        }
        if self.timeout_ms == 0 || self.heartbeat_interval_ms == 0 {
            return Err(DiscoverError::InvalidConfig(
                "timeout and heartbeat interval must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = AdminConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.heartbeat_interval(), Duration::from_secs(20));
        assert!(cfg.executor_address.ends_with(":9999"));
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = AdminConfig {
            admin_address: "localhost:8080".into(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(DiscoverError::InvalidConfig(_))));

        let cfg = AdminConfig {
            app_name: " ".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = AdminConfig {
            heartbeat_interval_ms: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
