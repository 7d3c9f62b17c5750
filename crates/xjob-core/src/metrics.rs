use std::{sync::Arc, time::Duration};

/// Terminal state of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed,
    Panicked,
    Canceled,
    Timeout,
}

impl JobOutcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            JobOutcome::Succeeded => "succeeded",
            JobOutcome::Failed => "failed",
            JobOutcome::Panicked => "panicked",
            JobOutcome::Canceled => "canceled",
            JobOutcome::Timeout => "timeout",
        }
    }
}

/// Counters the executor reports into.
pub trait MetricsBackend: Send + Sync + 'static {
    fn job_admitted(&self, handler: &str);
    fn job_rejected(&self, reason: &'static str);
    fn job_completed(&self, outcome: JobOutcome, elapsed: Duration);
}

pub type MetricsHandle = Arc<dyn MetricsBackend>;

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsBackend for NoopMetrics {
    fn job_admitted(&self, _handler: &str) {}
    fn job_rejected(&self, _reason: &'static str) {}
    fn job_completed(&self, _outcome: JobOutcome, _elapsed: Duration) {}
}
