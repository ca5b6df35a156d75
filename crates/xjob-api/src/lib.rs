mod error;
pub use error::ApiError;

mod handler;
pub use handler::ExecutorApi;

mod log;
pub use log::{LogHandler, NoopLogHandler};

mod adapter;
pub use adapter::ExecutorAdapter;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;

#[cfg(feature = "http")]
pub use axum;
