use thiserror::Error;
use xjob_model::JobId;

/// Admission and kill failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("handler not registered: {0}")]
    HandlerNotFound(String),
    #[error("job {0} is already running")]
    AlreadyRunning(JobId),
    #[error("job {0} is not running")]
    NotRunning(JobId),
}

impl CoreError {
    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            CoreError::HandlerNotFound(_) => "handler_not_found",
            CoreError::AlreadyRunning(_) => "already_running",
            CoreError::NotRunning(_) => "not_running",
        }
    }
}

/// Outcome reported by a job handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// Handler gave up; `reason` becomes the callback message.
    #[error("{reason}")]
    Fail { reason: String },
    /// Handler observed cancellation and stopped early.
    #[error("canceled")]
    Canceled,
}

impl JobError {
    pub fn fail(reason: impl Into<String>) -> Self {
        JobError::Fail {
            reason: reason.into(),
        }
    }
}

pub type JobResult = Result<(), JobError>;
