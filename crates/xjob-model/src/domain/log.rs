use serde::{Deserialize, Serialize};

use super::serde_ext::null_as_default;
use super::{LogId, SUCCESS_CODE};

/// Body of `POST /log`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRequest {
    #[serde(rename = "logDateTim", default, deserialize_with = "null_as_default")]
    pub log_date_tim: i64,
    #[serde(rename = "logId", default, deserialize_with = "null_as_default")]
    pub log_id: LogId,
    #[serde(rename = "fromLineNum", default, deserialize_with = "null_as_default")]
    pub from_line_num: i32,
}

/// One page of log content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResult {
    #[serde(rename = "fromLineNum")]
    pub from_line_num: i32,
    #[serde(rename = "toLineNum")]
    pub to_line_num: i32,
    #[serde(rename = "logContent", default, deserialize_with = "null_as_default")]
    pub log_content: String,
    #[serde(rename = "isEnd")]
    pub is_end: bool,
}

impl LogResult {
    /// Finished page with no content, starting where the caller asked.
    pub fn empty(from_line_num: i32) -> Self {
        Self {
            from_line_num,
            to_line_num: from_line_num,
            log_content: String::new(),
            is_end: true,
        }
    }
}

/// Response of `POST /log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResponse {
    pub code: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
    #[serde(default)]
    pub content: Option<LogResult>,
}

impl LogResponse {
    pub fn ok(content: LogResult) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: String::new(),
            content: Some(content),
        }
    }
}
