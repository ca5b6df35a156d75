use thiserror::Error;
use xjob_core::CoreError;
use xjob_model::{JobId, ReturnT};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("access token mismatch")]
    Unauthorized,

    #[error("job {0} is busy")]
    Busy(JobId),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Message the scheduler expects in the response envelope.
    pub fn wire_message(&self) -> String {
        match self {
            ApiError::InvalidRequest(_) => "params err".to_string(),
            ApiError::Unauthorized => "The access token is wrong.".to_string(),
            ApiError::Busy(_) => "job thread is running or has trigger queue.".to_string(),
            ApiError::Core(CoreError::TaskNotRegistered(_)) => "Task not registered".to_string(),
            ApiError::Core(CoreError::TaskAlreadyRunning(_)) => "There are tasks running".to_string(),
            ApiError::Core(CoreError::NotRunning(_)) => "not running".to_string(),
        }
    }
}

impl From<ApiError> for ReturnT {
    fn from(err: ApiError) -> Self {
        ReturnT::fail(err.wire_message())
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        axum::Json(ReturnT::from(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_wire_messages() {
        let r = ReturnT::from(ApiError::from(CoreError::TaskNotRegistered("ghost".into())));
        assert_eq!(r, ReturnT::fail("Task not registered"));

        let r = ReturnT::from(ApiError::from(CoreError::TaskAlreadyRunning(1)));
        assert_eq!(r, ReturnT::fail("There are tasks running"));

        let r = ReturnT::from(ApiError::from(CoreError::NotRunning(2)));
        assert_eq!(r.code, 500);
        assert_eq!(r.msg, "not running");
    }

    #[test]
    fn parse_errors_are_generic() {
        let r = ReturnT::from(ApiError::InvalidRequest("expected value at line 1".into()));
        assert_eq!(r, ReturnT::fail("params err"));
    }
}
