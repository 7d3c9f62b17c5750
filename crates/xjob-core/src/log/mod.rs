//! Job log plumbing.
//!
//! Handlers write through a [`JobLog`] bound to one execution; lines land in a
//! [`LogSink`] and are mirrored to `tracing`. The `/log` command reads them
//! back through a [`LogHandler`]. Where logs are stored is up to the sink;
//! [`MemoryLogStore`] is the built-in one.

mod memory;
pub use memory::MemoryLogStore;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use xjob_model::{JobId, LogRequest, LogResult};

/// Destination of job log lines.
///
/// `run` is the execution serial; a sink may ignore writes from a run that
/// has been superseded under the same job id.
pub trait LogSink: Send + Sync + 'static {
    fn open(&self, job_id: JobId, run: u64);
    fn append(&self, job_id: JobId, run: u64, line: &str);
    fn close(&self, job_id: JobId, run: u64);
}

/// Answers `/log` queries.
#[async_trait]
pub trait LogHandler: Send + Sync + 'static {
    async fn query(&self, req: &LogRequest) -> LogResult;
}

/// Sink that keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn open(&self, _job_id: JobId, _run: u64) {}
    fn append(&self, _job_id: JobId, _run: u64, _line: &str) {}
    fn close(&self, _job_id: JobId, _run: u64) {}
}

/// Query handler used when no log storage is configured: every page is empty and final.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLogHandler;

#[async_trait]
impl LogHandler for DefaultLogHandler {
    async fn query(&self, req: &LogRequest) -> LogResult {
        LogResult::empty(req.from_line_num, true)
    }
}

/// Log handle of a single execution.
#[derive(Clone)]
pub struct JobLog {
    job_id: JobId,
    run: u64,
    sink: Arc<dyn LogSink>,
}

impl JobLog {
    pub(crate) fn open(job_id: JobId, run: u64, sink: Arc<dyn LogSink>) -> Self {
        sink.open(job_id, run);
        Self { job_id, run, sink }
    }

    /// Handle that writes only to `tracing`.
    pub fn detached(job_id: JobId, run: u64) -> Self {
        Self {
            job_id,
            run,
            sink: Arc::new(NoopLogSink),
        }
    }

    pub fn line(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        info!(target: "xjob.job", job_id = self.job_id, run = self.run, "{line}");
        self.sink.append(self.job_id, self.run, line);
    }

    pub(crate) fn close(&self) {
        self.sink.close(self.job_id, self.run);
    }
}
