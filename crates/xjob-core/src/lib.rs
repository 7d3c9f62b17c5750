//! Job execution core of the executor agent.
//!
//! - [`HandlerRegistry`]: named job handlers registered at startup.
//! - [`RunTable`]: live executions keyed by job id.
//! - [`Executor`]: admission (block strategy), kill, and the execution unit
//!   that runs a handler on its own task and reports completion.
//!
//! Outbound effects go through seams: [`CompletionSink`] for the completion
//! callback, [`LogSink`] for job log lines, [`MetricsBackend`] for counters.

pub mod error;
pub use error::{CoreError, JobError, JobResult};

mod cancel;
pub use cancel::{CancelHandle, CancelReason};

mod context;
pub use context::JobContext;

pub mod registry;
pub use registry::{HandlerFn, HandlerRef, HandlerRegistry, JobHandler};

pub mod state;
pub use state::{RunTable, RunTableGuard, RunningJob};

mod callback;
pub use callback::{CompletionSink, DiscardCompletion};

pub mod log;
pub use log::{DefaultLogHandler, JobLog, LogHandler, LogSink, MemoryLogStore, NoopLogSink};

mod metrics;
pub use metrics::{JobOutcome, MetricsBackend, MetricsHandle, NoopMetrics};

mod executor;
pub use executor::{Executor, ExecutorBuilder};
