use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown block strategy: {0} (expected: SERIAL_EXECUTION|DISCARD_LATER|COVER_EARLY)")]
    UnknownStrategy(String),
}
