use std::io::IsTerminal;

use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, ParseError},
};

use crate::logger::{error::LoggerError, format::LoggerFormat};

/// Chatty dependencies of the agent; held at `warn` unless `level` names them.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "h2", "reqwest", "rustls"];

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directives, e.g. `info` or `info,xjob_core=debug`.
    pub level: String,
    /// Colored text output; ignored by the json and journald formats.
    pub ansi: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            ansi: std::io::stdout().is_terminal(),
        }
    }
}

impl LoggerConfig {
    pub(crate) fn filter(&self) -> Result<EnvFilter, LoggerError> {
        let invalid = |directive: &str| {
            let directive = directive.to_string();
            move |source: ParseError| LoggerError::InvalidFilter { directive, source }
        };

        let mut filter = EnvFilter::builder()
            .parse(&self.level)
            .map_err(invalid(&self.level))?;

        for target in QUIET_TARGETS {
            if self.names_target(target) {
                continue;
            }
            let directive = format!("{target}=warn");
            let parsed: Directive = directive.parse().map_err(invalid(&directive))?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }

    fn names_target(&self, target: &str) -> bool {
        self.level.split(',').any(|d| {
            d.trim()
                .split(['=', '['])
                .next()
                .is_some_and(|t| t == target)
        })
    }
}
