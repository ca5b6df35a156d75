use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use xjob_core::{RunEvent, Subscribe};

/// Run counters kept in a private [`Registry`].
///
/// Cloning shares the underlying counters.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    admitted: IntCounter,
    rejected: IntCounterVec,
    completed: IntCounterVec,
    cancelled: IntCounterVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Registers the counters in an existing registry.
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let admitted = IntCounter::new("xjob_runs_admitted_total", "Runs admitted and launched")?;
        let rejected = IntCounterVec::new(
            Opts::new("xjob_runs_rejected_total", "Run requests refused"),
            &["reason"],
        )?;
        let completed = IntCounterVec::new(
            Opts::new("xjob_runs_completed_total", "Runs that produced an outcome"),
            &["outcome"],
        )?;
        let cancelled = IntCounterVec::new(
            Opts::new("xjob_runs_cancelled_total", "Running instances cancelled"),
            &["reason"],
        )?;

        registry.register(Box::new(admitted.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(completed.clone()))?;
        registry.register(Box::new(cancelled.clone()))?;

        Ok(Self {
            registry,
            admitted,
            rejected,
            completed,
            cancelled,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Renders all counters in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

impl Subscribe for PrometheusMetrics {
    fn on_event(&self, event: &RunEvent) {
        match event {
            RunEvent::Admitted { .. } => self.admitted.inc(),
            RunEvent::Rejected { reason, .. } => {
                self.rejected.with_label_values(&[reason.as_str()]).inc()
            }
            RunEvent::Cancelled { reason, .. } => {
                self.cancelled.with_label_values(&[reason.as_str()]).inc()
            }
            RunEvent::Completed { code, .. } => {
                let outcome = if *code == xjob_model::SUCCESS_CODE {
                    "success"
                } else {
                    "failure"
                };
                self.completed.with_label_values(&[outcome]).inc()
            }
            RunEvent::Panicked { .. } => {}
        }
    }

    fn name(&self) -> &'static str {
        "prometheus"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xjob_core::RejectReason;
    use xjob_model::CancelReason;

    #[test]
    fn counts_lifecycle_events() {
        let m = PrometheusMetrics::new().unwrap();

        m.on_event(&RunEvent::Admitted {
            job_id: 1,
            run_id: 1,
            handler: "demo".into(),
        });
        m.on_event(&RunEvent::Rejected {
            job_id: 1,
            handler: "demo".into(),
            reason: RejectReason::AlreadyRunning,
        });
        m.on_event(&RunEvent::Cancelled {
            job_id: 1,
            run_id: 1,
            reason: CancelReason::Timeout,
        });
        m.on_event(&RunEvent::Completed {
            job_id: 1,
            run_id: 1,
            code: 500,
            msg: "timeout".into(),
        });

        assert_eq!(m.admitted.get(), 1);
        assert_eq!(
            m.rejected.with_label_values(&["already_running"]).get(),
            1
        );
        assert_eq!(m.cancelled.with_label_values(&["timeout"]).get(), 1);
        assert_eq!(m.completed.with_label_values(&["failure"]).get(), 1);
        assert_eq!(m.completed.with_label_values(&["success"]).get(), 0);
    }

    #[test]
    fn encode_renders_text_format() {
        let m = PrometheusMetrics::new().unwrap();
        m.on_event(&RunEvent::Completed {
            job_id: 2,
            run_id: 9,
            code: 200,
            msg: String::new(),
        });

        let text = m.encode().unwrap();
        assert!(text.contains("xjob_runs_completed_total{outcome=\"success\"} 1"));
        assert!(text.contains("xjob_runs_admitted_total 0"));
    }

    #[test]
    fn double_registration_fails() {
        let registry = Registry::new();
        PrometheusMetrics::with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::with_registry(registry).is_err());
    }
}
