use std::sync::Arc;

use async_trait::async_trait;
use xjob_core::{DefaultLogHandler, Executor, LogHandler};
use xjob_model::{JobId, LogRequest, LogResult, RunRequest};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that bridges [`Executor`] to [`ApiHandler`].
pub struct ExecutorAdapter {
    executor: Arc<Executor>,
    logs: Arc<dyn LogHandler>,
}

impl ExecutorAdapter {
    /// Wrap `executor`; log queries answer with an empty, finished page.
    pub fn new(executor: Arc<Executor>) -> Self {
        Self {
            executor,
            logs: Arc::new(DefaultLogHandler),
        }
    }

    pub fn with_log_handler(mut self, logs: Arc<dyn LogHandler>) -> Self {
        self.logs = logs;
        self
    }
}

#[async_trait]
impl ApiHandler for ExecutorAdapter {
    async fn run(&self, req: RunRequest) -> Result<(), ApiError> {
        self.executor.run(req).map_err(ApiError::from)
    }

    async fn kill(&self, job_id: JobId) -> Result<(), ApiError> {
        self.executor.kill(job_id).map_err(ApiError::from)
    }

    async fn log(&self, req: LogRequest) -> Result<LogResult, ApiError> {
        Ok(self.logs.query(&req).await)
    }
}
