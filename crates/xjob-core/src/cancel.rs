use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Why a running job was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Explicit kill request.
    Killed,
    /// Superseded by a newer trigger under `COVER_EARLY`.
    Replaced,
    /// Configured execution timeout elapsed.
    Timeout,
}

impl CancelReason {
    pub fn message(&self) -> &'static str {
        match self {
            CancelReason::Killed => "job killed",
            CancelReason::Replaced => "job replaced by a newer run",
            CancelReason::Timeout => "job timeout",
        }
    }
}

/// Cooperative cancellation trigger shared by a running job and whoever may stop it.
///
/// Cancelling is idempotent; the first reason recorded wins. Handlers observe
/// the signal, nothing forces them to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
    reason: Arc<OnceLock<CancelReason>>,
    /// Fired when the job has returned; stops a pending deadline timer.
    done: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Returns `true` for the call that set the reason.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let first = self.reason.set(reason).is_ok();
        self.token.cancel();
        first
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Reason of the first cancel, if any.
    pub fn reason(&self) -> Option<CancelReason> {
        self.reason.get().copied()
    }

    /// Resolves once the signal has fired.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Mark the job as returned. A pending deadline timer exits without
    /// recording a reason.
    pub fn disarm(&self) {
        self.done.cancel();
    }

    /// Schedule a [`CancelReason::Timeout`] cancel `after` from now.
    ///
    /// The timer task ends early if the handle is cancelled for another reason
    /// or [`CancelHandle::disarm`]ed. Must be called from within a tokio runtime.
    pub fn arm_deadline(&self, after: Duration) -> Instant {
        let deadline = Instant::now() + after;
        let handle = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = handle.done.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    if handle.cancel(CancelReason::Timeout) {
                        debug!(timeout_ms = after.as_millis() as u64, "deadline hit; cancel signalled");
                    }
                }
                _ = handle.cancelled() => {}
            }
        });
        deadline
    }
}
