use serde::{Deserialize, Serialize};

use super::{JobId, LogId};

/// Registry group every executor announces itself under.
pub const EXECUTOR_GROUP: &str = "EXECUTOR";

/// Body of `/api/registry` and `/api/registryRemove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryParam {
    #[serde(rename = "registryGroup")]
    pub registry_group: String,
    #[serde(rename = "registryKey")]
    pub registry_key: String,
    #[serde(rename = "registryValue")]
    pub registry_value: String,
}

impl RegistryParam {
    /// Announcement of an executor reachable at `address` under `key`.
    pub fn executor(key: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            registry_group: EXECUTOR_GROUP.to_string(),
            registry_key: key.into(),
            registry_value: address.into(),
        }
    }
}

/// Body of `/api/callback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackParam {
    #[serde(rename = "jobID")]
    pub job_id: JobId,
    pub code: i32,
    pub msg: String,
    #[serde(rename = "logId", default, skip_serializing_if = "Option::is_none")]
    pub log_id: Option<LogId>,
}
