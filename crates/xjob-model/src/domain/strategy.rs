use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ModelError;

/// Policy applied when a run request targets a job that is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockStrategy {
    /// Reject the new request; the running instance is left untouched.
    #[default]
    SerialExecution,
    /// Same observable behaviour as [`BlockStrategy::SerialExecution`].
    DiscardLater,
    /// Cancel the running instance and admit the new request in its place.
    CoverEarly,
}

impl BlockStrategy {
    /// Wire name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockStrategy::SerialExecution => "SERIAL_EXECUTION",
            BlockStrategy::DiscardLater => "DISCARD_LATER",
            BlockStrategy::CoverEarly => "COVER_EARLY",
        }
    }

    /// Parse a wire value, falling back to [`BlockStrategy::SerialExecution`]
    /// for anything unrecognised.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Returns `true` if a conflicting run replaces the running one.
    #[inline]
    pub fn overrides(&self) -> bool {
        matches!(self, BlockStrategy::CoverEarly)
    }
}

impl FromStr for BlockStrategy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SERIAL_EXECUTION" => Ok(BlockStrategy::SerialExecution),
            "DISCARD_LATER" => Ok(BlockStrategy::DiscardLater),
            "COVER_EARLY" => Ok(BlockStrategy::CoverEarly),
            _ => Err(ModelError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for BlockStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BlockStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockStrategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(BlockStrategy::parse_lenient)
            .unwrap_or_default())
    }
}
