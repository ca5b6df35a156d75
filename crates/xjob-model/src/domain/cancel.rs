use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a running instance was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CancelReason {
    /// The per-run timeout elapsed.
    Timeout,
    /// An explicit kill request.
    Killed,
    /// A newer run of the same job took its place.
    Replaced,
    /// The executor is shutting down.
    Shutdown,
}

impl CancelReason {
    /// Short label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            CancelReason::Timeout => "timeout",
            CancelReason::Killed => "killed",
            CancelReason::Replaced => "replaced",
            CancelReason::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
