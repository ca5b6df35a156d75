use std::{net::SocketAddr, time::Duration};

use thiserror::Error;
use xjob_discover::AdminConfig;
use xjob_observe::{LoggerConfig, LoggerFormat};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    Logger(#[from] xjob_observe::LoggerError),
}

/// Local listener of the dispatch API.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind_ip: String,
    pub port: u16,
    /// Time given to running instances to observe cancellation on shutdown.
    pub shutdown_grace: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_ip: "0.0.0.0".to_string(),
            port: 9999,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl HttpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "XJOB_EXECUTOR_PORT",
                value: "0".to_string(),
            });
        }
        self.bind_addr().map(|_| ())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_ip, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "bind address",
                value: self.bind_ip.clone(),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    pub admin: AdminConfig,
    pub http: HttpConfig,
    pub logger: LoggerConfig,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `XJOB_*` variables; unset or empty keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = AgentConfig::default();

        if let Some(v) = get("XJOB_ADMIN_ADDR") {
            cfg.admin.admin_address = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("XJOB_ACCESS_TOKEN") {
            cfg.admin.access_token = v;
        }
        if let Some(v) = get("XJOB_APP_NAME") {
            cfg.admin.app_name = v;
        }
        if let Some(v) = get("XJOB_TIMEOUT_MS") {
            cfg.admin.timeout_ms = parse_num("XJOB_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get("XJOB_HEARTBEAT_SECS") {
            let secs: u64 = parse_num("XJOB_HEARTBEAT_SECS", &v)?;
            cfg.admin.heartbeat_interval_ms = secs.saturating_mul(1_000);
        }
        if let Some(v) = get("XJOB_EXECUTOR_PORT") {
            cfg.http.port = parse_num("XJOB_EXECUTOR_PORT", &v)?;
        }

        // The announced address follows the listener unless an ip is pinned.
        let host = match get("XJOB_EXECUTOR_IP") {
            Some(ip) => ip,
            None => announced_host(&cfg.admin.executor_address),
        };
        cfg.admin.executor_address = format!("http://{host}:{}", cfg.http.port);

        if let Some(v) = get("XJOB_LOG_LEVEL") {
            cfg.logger.level = v;
        }
        if let Some(v) = get("XJOB_LOG_FORMAT") {
            cfg.logger.format = v.parse::<LoggerFormat>()?;
        }
        Ok(cfg)
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn announced_host(default_address: &str) -> String {
    default_address
        .trim_start_matches("http://")
        .rsplit_once(':')
        .map(|(host, _)| host.to_string())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}
