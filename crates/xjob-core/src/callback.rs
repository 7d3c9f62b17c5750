use async_trait::async_trait;
use tracing::debug;
use xjob_model::HandleCallback;

/// Receives the completion report of every admitted job, exactly once per job.
///
/// Implementations must not fail the caller: transport errors are theirs to
/// log and swallow.
#[async_trait]
pub trait CompletionSink: Send + Sync + 'static {
    async fn report(&self, callback: HandleCallback);
}

/// Sink that only logs the report.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardCompletion;

#[async_trait]
impl CompletionSink for DiscardCompletion {
    async fn report(&self, callback: HandleCallback) {
        debug!(
            job_id = callback.job_id,
            code = callback.handle_code,
            msg = %callback.handle_msg,
            "completion discarded (no sink configured)"
        );
    }
}
