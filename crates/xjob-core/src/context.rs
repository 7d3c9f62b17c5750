use tokio::time::Instant;
use xjob_model::JobId;

use crate::{cancel::CancelHandle, log::JobLog, state::RunningJob};

/// What a handler sees of its own invocation.
#[derive(Clone)]
pub struct JobContext {
    job_id: JobId,
    handler: String,
    params: String,
    deadline: Option<Instant>,
    cancel: CancelHandle,
    log: JobLog,
}

impl JobContext {
    pub(crate) fn for_job(job: &RunningJob) -> Self {
        Self {
            job_id: job.job_id,
            handler: job.handler.clone(),
            params: job.params.clone(),
            deadline: job.deadline,
            cancel: job.cancel_handle().clone(),
            log: job.log().clone(),
        }
    }

    #[inline]
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    #[inline]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Raw parameter string from the trigger.
    #[inline]
    pub fn params(&self) -> &str {
        &self.params
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when the job is killed, replaced, or times out.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Log of this run, readable through the `/log` command.
    #[inline]
    pub fn log(&self) -> &JobLog {
        &self.log
    }
}
