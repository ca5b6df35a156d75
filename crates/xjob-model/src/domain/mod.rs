mod error;
pub use error::ModelError;

mod return_t;
pub use return_t::{FAIL_CODE, ReturnT, SUCCESS_CODE};

mod run;
pub use run::{IdleBeatRequest, KillRequest, RunRequest};

mod strategy;
pub use strategy::BlockStrategy;

mod log;
pub use log::{LogRequest, LogResponse, LogResult};

mod registry;
pub use registry::{CallbackParam, EXECUTOR_GROUP, RegistryParam};

mod cancel;
pub use cancel::CancelReason;

pub(crate) mod serde_ext;

/// Header carrying the shared access token, in both directions.
pub const ACCESS_TOKEN_HEADER: &str = "XXL-JOB-ACCESS-TOKEN";

/// Scheduler-assigned identifier of one logical job.
///
/// Stable across run attempts; at most one instance per job runs at a time.
pub type JobId = i64;

/// Identifier of a scheduler log record attached to a single trigger.
pub type LogId = i64;
