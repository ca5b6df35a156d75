use thiserror::Error;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format {0:?}; use text, json or journald")]
    UnknownFormat(String),

    #[error("journald logging needs a linux build with the `journald` feature")]
    JournaldUnavailable,

    #[error("bad log filter {directive:?}: {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,

    #[error("cannot install logger: {0}")]
    Install(String),
}
