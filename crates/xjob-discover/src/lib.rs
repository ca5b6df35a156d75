//! Executor side of the scheduler registry protocol.
//!
//! - [`Heartbeat`] announces the executor every interval and withdraws it on shutdown.
//! - [`CallbackReporter`] delivers run results to the scheduler's callback endpoint.
//! - [`AdminClient`] is the shared HTTP client for both.

mod client;
pub use client::AdminClient;

mod tasks;
pub use tasks::{CallbackReporter, Heartbeat};

mod config;
pub use config::AdminConfig;

mod errors;
pub use errors::DiscoverError;
