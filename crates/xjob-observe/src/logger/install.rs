use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::Layered,
    layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

type Filtered = Layered<EnvFilter, Registry>;
type Output = Box<dyn Layer<Filtered> + Send + Sync>;

/// Install the process-wide subscriber. Fails if one is already installed.
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    if tracing::dispatcher::has_been_set() {
        return Err(LoggerError::AlreadyInstalled);
    }
    let filter = cfg.filter()?;
    let output = output(cfg)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))
}

fn output(cfg: &LoggerConfig) -> Result<Output, LoggerError> {
    let layer: Output = match cfg.format {
        LoggerFormat::Text => fmt::layer()
            .with_ansi(cfg.ansi)
            .with_timer(local_rfc3339())
            .boxed(),
        LoggerFormat::Json => fmt::layer()
            .with_timer(local_rfc3339())
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
        LoggerFormat::Journald => journald()?,
    };
    Ok(layer)
}

fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald() -> Result<Output, LoggerError> {
    tracing_journald::layer()
        .map(|layer| layer.with_syslog_identifier("xjob-agentd".to_string()).boxed())
        .map_err(|e| LoggerError::Install(format!("journald: {e}")))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald() -> Result<Output, LoggerError> {
    Err(LoggerError::JournaldUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_refused() {
        let cfg = LoggerConfig {
            ansi: false,
            ..Default::default()
        };
        // another test in this binary may have installed first
        let first = init_logger(&cfg);
        assert!(first.is_ok() || matches!(first, Err(LoggerError::AlreadyInstalled)));
        assert!(matches!(init_logger(&cfg), Err(LoggerError::AlreadyInstalled)));
    }

    #[test]
    fn invalid_filter_fails_before_install() {
        let cfg = LoggerConfig {
            level: "info,xjob_core=verbose".to_string(),
            ..Default::default()
        };
        assert!(output(&cfg).is_ok());
        assert!(matches!(
            cfg.filter(),
            Err(LoggerError::InvalidFilter { .. })
        ));
    }
}
