//! Prometheus metrics for the xjob executor.
//!
//! [`PrometheusMetrics`] is a [`xjob_core::Subscribe`] implementation: hand it to
//! [`xjob_core::Executor::with_subscribers`] and it counts run lifecycle events.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use xjob_core::{Executor, Subscribe, TaskRegistry};
//! use xjob_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(metrics.clone())];
//! let executor = Executor::new(TaskRegistry::new()).with_subscribers(subscribers);
//! # let _ = executor;
//! let text = metrics.encode()?;
//! assert!(text.is_empty() || text.contains("xjob_"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `xjob_runs_admitted_total` - Counter
//! - `xjob_runs_rejected_total{reason}` - Counter
//! - `xjob_runs_completed_total{outcome}` - Counter
//! - `xjob_runs_cancelled_total{reason}` - Counter
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`. Mount [`PrometheusMetrics::encode`]
//! on the application's own router.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
