use serde::{Deserialize, Serialize};

use super::serde_ext::null_as_default;

/// The only code callers treat as success.
pub const SUCCESS_CODE: i32 = 200;
/// Generic failure code used by every error response.
pub const FAIL_CODE: i32 = 500;

/// Response envelope returned by every endpoint, in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnT {
    pub code: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
}

impl ReturnT {
    pub fn success() -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: String::new(),
        }
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self {
            code: FAIL_CODE,
            msg: msg.into(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

impl Default for ReturnT {
    fn default() -> Self {
        Self::success()
    }
}
