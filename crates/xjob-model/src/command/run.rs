use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{BlockStrategy, JobId};

/// Trigger pushed by the scheduler to `POST /run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// Name of the locally registered handler to invoke.
    pub executor_handler: String,
    #[serde(rename = "jobID")]
    pub job_id: JobId,
    /// Opaque parameter string handed to the handler as-is.
    #[serde(default)]
    pub executor_params: String,
    #[serde(default)]
    pub executor_block_strategy: BlockStrategy,
    /// Execution time limit in seconds; `<= 0` means unbounded.
    #[serde(default)]
    pub executor_timeout: i64,
}

impl RunRequest {
    pub fn new(handler: impl Into<String>, job_id: JobId) -> Self {
        Self {
            executor_handler: handler.into(),
            job_id,
            executor_params: String::new(),
            executor_block_strategy: BlockStrategy::default(),
            executor_timeout: 0,
        }
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.executor_params = params.into();
        self
    }

    pub fn with_strategy(mut self, strategy: BlockStrategy) -> Self {
        self.executor_block_strategy = strategy;
        self
    }

    pub fn with_timeout_secs(mut self, secs: i64) -> Self {
        self.executor_timeout = secs;
        self
    }

    /// Configured time limit, if any.
    pub fn timeout(&self) -> Option<Duration> {
        u64::try_from(self.executor_timeout)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
