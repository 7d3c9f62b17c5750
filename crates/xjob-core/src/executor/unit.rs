use std::{any::Any, sync::Arc};

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};
use xjob_model::HandleCallback;

use crate::{
    callback::CompletionSink,
    cancel::CancelReason,
    context::JobContext,
    error::{JobError, JobResult},
    metrics::{JobOutcome, MetricsHandle},
    registry::HandlerRef,
    state::{RunTable, RunningJob},
};

const SUCCESS_MSG: &str = "success";

/// One admitted invocation: runs the handler on its own task, settles the
/// outcome, reports it once, then drops the run record.
pub(crate) struct ExecutionUnit {
    pub(crate) job: RunningJob,
    pub(crate) handler: HandlerRef,
    pub(crate) runs: RunTable,
    pub(crate) completion: Arc<dyn CompletionSink>,
    pub(crate) metrics: MetricsHandle,
}

impl ExecutionUnit {
    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let ctx = JobContext::for_job(&self.job);
        let handler = Arc::clone(&self.handler);

        // Nested task: a panic in the handler surfaces as a JoinError here.
        let joined = tokio::spawn(async move { handler.handle(ctx).await }).await;
        self.job.cancel_handle().disarm();

        let (outcome, callback) = self.settle(joined);
        let elapsed = self.job.started_at.elapsed();

        let (job_id, handler) = (self.job.job_id, &self.job.handler);
        let elapsed_ms = elapsed.as_millis() as u64;
        match outcome {
            JobOutcome::Succeeded => info!(job_id, %handler, elapsed_ms, "job succeeded"),
            JobOutcome::Panicked => {
                error!(job_id, %handler, msg = %callback.handle_msg, "job panicked")
            }
            _ => warn!(
                job_id,
                %handler,
                elapsed_ms,
                outcome = outcome.as_label(),
                msg = %callback.handle_msg,
                "job did not succeed"
            ),
        }

        self.job.log().close();
        self.metrics.job_completed(outcome, elapsed);
        self.completion.report(callback).await;

        if self.runs.remove_run(self.job.job_id, self.job.run) {
            debug!(job_id = self.job.job_id, run = self.job.run, "run record removed");
        }
    }

    fn settle(&self, joined: Result<JobResult, JoinError>) -> (JobOutcome, HandleCallback) {
        let id = self.job.job_id;
        let cancel = self.job.cancel_handle();

        match joined {
            Ok(Ok(())) => (JobOutcome::Succeeded, HandleCallback::success(id, SUCCESS_MSG)),
            Ok(Err(err)) => match cancel.reason() {
                Some(reason) => {
                    let outcome = match reason {
                        CancelReason::Timeout => JobOutcome::Timeout,
                        _ => JobOutcome::Canceled,
                    };
                    (outcome, HandleCallback::fail(id, reason.message()))
                }
                None => match err {
                    JobError::Fail { reason } => {
                        (JobOutcome::Failed, HandleCallback::fail(id, reason))
                    }
                    JobError::Canceled => {
                        (JobOutcome::Canceled, HandleCallback::fail(id, "job canceled"))
                    }
                },
            },
            Err(err) if err.is_panic() => {
                let msg = format!("job panicked: {}", panic_message(err.into_panic()));
                (JobOutcome::Panicked, HandleCallback::fail(id, msg))
            }
            Err(err) => (JobOutcome::Failed, HandleCallback::fail(id, err.to_string())),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
