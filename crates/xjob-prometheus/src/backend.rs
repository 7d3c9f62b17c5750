use std::time::Duration;

use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};
use xjob_core::{JobOutcome, MetricsBackend};

const DURATION_BUCKETS: &[f64] = &[
    0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0, 900.0, 3600.0,
];

/// Executor counters on a private [`Registry`].
///
/// Clones share the same collectors.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    admitted: IntCounterVec,
    rejected: IntCounterVec,
    completed: IntCounterVec,
    duration: HistogramVec,
}

impl PrometheusMetrics {
    pub fn new() -> prometheus::Result<Self> {
        Self::with_registry(Registry::new())
    }

    /// Register the collectors on an existing registry.
    pub fn with_registry(registry: Registry) -> prometheus::Result<Self> {
        let admitted = IntCounterVec::new(
            Opts::new("xjob_jobs_admitted_total", "Runs admitted by the executor"),
            &["handler"],
        )?;
        let rejected = IntCounterVec::new(
            Opts::new("xjob_jobs_rejected_total", "Run or kill commands refused"),
            &["reason"],
        )?;
        let completed = IntCounterVec::new(
            Opts::new("xjob_jobs_completed_total", "Runs finished, by outcome"),
            &["outcome"],
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new("xjob_job_duration_seconds", "Wall time of finished runs")
                .buckets(DURATION_BUCKETS.to_vec()),
            &["outcome"],
        )?;

        registry.register(Box::new(admitted.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(completed.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry,
            admitted,
            rejected,
            completed,
            duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format, ready to serve on `/metrics`.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut out = String::new();
        TextEncoder::new().encode_utf8(&self.gather(), &mut out)?;
        Ok(out)
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn job_admitted(&self, handler: &str) {
        self.admitted.with_label_values(&[handler]).inc();
    }

    fn job_rejected(&self, reason: &'static str) {
        self.rejected.with_label_values(&[reason]).inc();
    }

    fn job_completed(&self, outcome: JobOutcome, elapsed: Duration) {
        let label = outcome.as_label();
        self.completed.with_label_values(&[label]).inc();
        self.duration
            .with_label_values(&[label])
            .observe(elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_admissions_and_rejections() {
        let m = PrometheusMetrics::new().unwrap();
        m.job_admitted("demo.echo");
        m.job_admitted("demo.echo");
        m.job_rejected("already_running");

        assert_eq!(m.admitted.with_label_values(&["demo.echo"]).get(), 2);
        assert_eq!(m.rejected.with_label_values(&["already_running"]).get(), 1);
    }

    #[test]
    fn completion_feeds_counter_and_histogram() {
        let m = PrometheusMetrics::new().unwrap();
        m.job_completed(JobOutcome::Timeout, Duration::from_millis(1500));

        assert_eq!(m.completed.with_label_values(&["timeout"]).get(), 1);
        let h = m.duration.with_label_values(&["timeout"]);
        assert_eq!(h.get_sample_count(), 1);
        assert!((h.get_sample_sum() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn render_exposes_metric_names() {
        let m = PrometheusMetrics::new().unwrap();
        m.job_admitted("demo.sleep");
        m.job_completed(JobOutcome::Succeeded, Duration::from_millis(10));

        let text = m.render().unwrap();
        assert!(text.contains("xjob_jobs_admitted_total{handler=\"demo.sleep\"} 1"));
        assert!(text.contains("xjob_jobs_completed_total{outcome=\"succeeded\"} 1"));
        assert!(text.contains("xjob_job_duration_seconds_count{outcome=\"succeeded\"} 1"));
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Registry::new();
        PrometheusMetrics::with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::with_registry(registry).is_err());
    }
}
