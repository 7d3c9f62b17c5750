//! Prometheus metrics backend for the executor agent.
//!
//! [`PrometheusMetrics`] implements [`xjob_core::MetricsBackend`]; hand an
//! `Arc` of it to [`xjob_core::ExecutorBuilder::with_metrics`] and serve
//! [`PrometheusMetrics::render`] from your HTTP server.
//!
//! ## Metrics
//! - `xjob_jobs_admitted_total{handler}` - Counter
//! - `xjob_jobs_rejected_total{reason}` - Counter
//! - `xjob_jobs_completed_total{outcome}` - Counter
//! - `xjob_job_duration_seconds{outcome}` - Histogram

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
