use async_trait::async_trait;
use xjob_model::{JobId, LogRequest, LogResult, RunRequest};

use crate::error::ApiError;

/// Command surface the scheduler drives.
///
/// Use the provided [`ExecutorAdapter`](crate::ExecutorAdapter), or wrap it
/// to add checks of your own (auth, rate limiting, ...).
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Admit a run. The outcome is reported later through the completion callback.
    async fn run(&self, req: RunRequest) -> Result<(), ApiError>;

    /// Cancel a live run.
    async fn kill(&self, job_id: JobId) -> Result<(), ApiError>;

    async fn log(&self, req: LogRequest) -> Result<LogResult, ApiError>;
}
