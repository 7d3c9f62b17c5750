mod unit;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tracing::{info, instrument, warn};
use xjob_model::{JobId, RunRequest};

use crate::{
    callback::{CompletionSink, DiscardCompletion},
    cancel::CancelReason,
    error::CoreError,
    log::{JobLog, LogSink, NoopLogSink},
    metrics::{MetricsHandle, NoopMetrics},
    registry::{HandlerRef, HandlerRegistry},
    state::{RunTable, RunningJob},
};

use unit::ExecutionUnit;

/// Admission controller and owner of the registry and run table.
///
/// `run` and `kill` must be called from within a tokio runtime: accepted jobs
/// are spawned onto it.
pub struct Executor {
    registry: HandlerRegistry,
    runs: RunTable,
    completion: Arc<dyn CompletionSink>,
    logs: Arc<dyn LogSink>,
    metrics: MetricsHandle,
    next_run: AtomicU64,
}

pub struct ExecutorBuilder {
    registry: HandlerRegistry,
    completion: Arc<dyn CompletionSink>,
    logs: Arc<dyn LogSink>,
    metrics: MetricsHandle,
}

impl Default for ExecutorBuilder {
    fn default() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            completion: Arc::new(DiscardCompletion),
            logs: Arc::new(NoopLogSink),
            metrics: Arc::new(NoopMetrics),
        }
    }
}

impl ExecutorBuilder {
    #[inline]
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[inline]
    pub fn with_completion(mut self, sink: Arc<dyn CompletionSink>) -> Self {
        self.completion = sink;
        self
    }

    #[inline]
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.logs = sink;
        self
    }

    #[inline]
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn build(self) -> Executor {
        Executor {
            registry: self.registry,
            runs: RunTable::new(),
            completion: self.completion,
            logs: self.logs,
            metrics: self.metrics,
            next_run: AtomicU64::new(1),
        }
    }
}

impl Executor {
    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::default()
    }

    #[inline]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Register `handler` under `name`; replaces any previous registration.
    pub fn register(&self, name: impl Into<String>, handler: HandlerRef) {
        self.registry.register(name, handler);
    }

    #[inline]
    pub fn runs(&self) -> &RunTable {
        &self.runs
    }

    pub fn is_running(&self, id: JobId) -> bool {
        self.runs.exists(id)
    }

    /// Admit a trigger.
    ///
    /// The whole decision runs under the run table lock, so two triggers for
    /// the same id can never both start. On `Ok` the job is already running
    /// on its own task; its outcome goes to the completion sink later.
    #[instrument(
        level = "debug",
        skip(self, req),
        fields(job_id = req.job_id, handler = %req.executor_handler, strategy = %req.executor_block_strategy)
    )]
    pub fn run(&self, req: RunRequest) -> Result<(), CoreError> {
        let mut table = self.runs.lock();

        let Some(handler) = self.registry.lookup(&req.executor_handler) else {
            let err = CoreError::HandlerNotFound(req.executor_handler.clone());
            warn!(
                job_id = req.job_id,
                handler = %req.executor_handler,
                "rejected: handler not registered"
            );
            self.metrics.job_rejected(err.reason());
            return Err(err);
        };

        if let Some(existing) = table.get(req.job_id) {
            if !req.executor_block_strategy.preempts() {
                let err = CoreError::AlreadyRunning(req.job_id);
                warn!(
                    job_id = req.job_id,
                    running_run = existing.run,
                    strategy = %req.executor_block_strategy,
                    "rejected: job is already running"
                );
                self.metrics.job_rejected(err.reason());
                return Err(err);
            }

            existing.cancel(CancelReason::Replaced);
            let replaced = existing.run;
            table.remove(req.job_id);
            info!(
                job_id = req.job_id,
                replaced_run = replaced,
                "running job cancelled; covered by new trigger"
            );
        }

        let timeout = req.timeout();
        let run = self.next_run.fetch_add(1, Ordering::Relaxed);
        let log = JobLog::open(req.job_id, run, Arc::clone(&self.logs));
        let mut job = RunningJob::new(
            req.job_id,
            run,
            req.executor_handler,
            req.executor_params,
            req.executor_block_strategy,
            log,
        );
        if let Some(timeout) = timeout {
            job.deadline = Some(job.cancel_handle().arm_deadline(timeout));
        }

        table.put(job.clone());
        self.metrics.job_admitted(&job.handler);
        info!(job_id = job.job_id, run, handler = %job.handler, "job admitted");

        ExecutionUnit {
            job,
            handler,
            runs: self.runs.clone(),
            completion: Arc::clone(&self.completion),
            metrics: Arc::clone(&self.metrics),
        }
        .spawn();

        Ok(())
    }

    /// Cancel a running job and drop its record.
    ///
    /// The handler is only signalled; its completion is still reported when it returns.
    #[instrument(level = "debug", skip(self))]
    pub fn kill(&self, job_id: JobId) -> Result<(), CoreError> {
        let mut table = self.runs.lock();
        match table.remove(job_id) {
            Some(job) => {
                job.cancel(CancelReason::Killed);
                info!(job_id, run = job.run, "job killed");
                Ok(())
            }
            None => {
                let err = CoreError::NotRunning(job_id);
                warn!(job_id, "kill ignored: job is not running");
                self.metrics.job_rejected(err.reason());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::{Notify, mpsc};
    use xjob_model::{BlockStrategy, HandleCallback};

    use super::*;
    use crate::{
        context::JobContext,
        error::JobError,
        log::{LogHandler, MemoryLogStore},
        registry::HandlerFn,
    };

    struct ChannelSink(mpsc::UnboundedSender<HandleCallback>);

    #[async_trait]
    impl CompletionSink for ChannelSink {
        async fn report(&self, callback: HandleCallback) {
            let _ = self.0.send(callback);
        }
    }

    fn executor() -> (Executor, mpsc::UnboundedReceiver<HandleCallback>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let exec = Executor::builder()
            .with_completion(Arc::new(ChannelSink(tx)))
            .build();
        (exec, rx)
    }

    /// Runs until cancelled.
    fn waits_for_cancel() -> HandlerRef {
        HandlerFn::arc(|ctx: JobContext| async move {
            ctx.cancelled().await;
            Err(JobError::Canceled)
        })
    }

    /// Runs until `gate` is notified.
    fn gated(gate: Arc<Notify>) -> HandlerRef {
        HandlerFn::arc(move |_ctx: JobContext| {
            let gate = Arc::clone(&gate);
            async move {
                gate.notified().await;
                Ok(())
            }
        })
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<HandleCallback>) -> HandleCallback {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("completion should arrive")
            .expect("sink channel open")
    }

    async fn wait_until_idle(exec: &Executor, id: JobId) {
        for _ in 0..200 {
            if !exec.is_running(id) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {id} still in run table");
    }

    #[tokio::test]
    async fn unregistered_handler_is_rejected_without_touching_table() {
        let (exec, _rx) = executor();

        let err = exec.run(RunRequest::new("missing", 1)).unwrap_err();

        assert_eq!(err, CoreError::HandlerNotFound("missing".into()));
        assert!(exec.runs().is_empty());
    }

    #[tokio::test]
    async fn serial_execution_rejects_second_trigger() {
        let (exec, mut rx) = executor();
        let gate = Arc::new(Notify::new());
        exec.register("echo", gated(Arc::clone(&gate)));

        let req = RunRequest::new("echo", 1).with_strategy(BlockStrategy::SerialExecution);
        exec.run(req.clone()).expect("first trigger admitted");
        assert!(exec.is_running(1));
        let first_run = exec.runs().get(1).unwrap().run;

        assert_eq!(exec.run(req), Err(CoreError::AlreadyRunning(1)));
        assert_eq!(exec.runs().get(1).unwrap().run, first_run);

        gate.notify_one();
        let cb = next(&mut rx).await;
        assert!(cb.is_success());
        assert_eq!(cb.job_id, 1);
        wait_until_idle(&exec, 1).await;
    }

    #[tokio::test]
    async fn discard_later_and_unknown_strategies_reject_identically() {
        let (exec, _rx) = executor();
        exec.register("wait", waits_for_cancel());
        exec.run(RunRequest::new("wait", 5)).unwrap();

        for strategy in [
            BlockStrategy::DiscardLater,
            BlockStrategy::SerialExecution,
            BlockStrategy::Other("SOMETHING_ELSE".into()),
        ] {
            let req = RunRequest::new("wait", 5).with_strategy(strategy);
            assert_eq!(exec.run(req), Err(CoreError::AlreadyRunning(5)));
        }

        let running = exec.runs().get(5).unwrap();
        assert!(!running.cancel_handle().is_cancelled());
    }

    #[tokio::test]
    async fn cover_early_cancels_and_replaces() {
        let (exec, mut rx) = executor();
        exec.register("wait", waits_for_cancel());

        exec.run(RunRequest::new("wait", 9)).unwrap();
        let first = exec.runs().get(9).unwrap();

        let cover = RunRequest::new("wait", 9).with_strategy(BlockStrategy::CoverEarly);
        exec.run(cover).expect("cover early admitted");

        assert!(first.cancel_handle().is_cancelled());
        assert_eq!(first.cancel_handle().reason(), Some(CancelReason::Replaced));

        let second = exec.runs().get(9).expect("replacement recorded");
        assert_ne!(second.run, first.run);
        assert!(!second.cancel_handle().is_cancelled());
        assert_eq!(exec.runs().len(), 1);

        let cb = next(&mut rx).await;
        assert_eq!(cb.job_id, 9);
        assert!(!cb.is_success());
        assert_eq!(cb.handle_msg, "job replaced by a newer run");

        // The superseded run finishing must not drop the replacement's record.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(exec.runs().get(9).unwrap().run, second.run);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn timeout_cancels_job() {
        let (exec, mut rx) = executor();
        exec.register("wait", waits_for_cancel());

        let started = tokio::time::Instant::now();
        exec.run(RunRequest::new("wait", 3).with_timeout_secs(2)).unwrap();
        assert!(exec.runs().get(3).unwrap().deadline.is_some());

        let cb = next(&mut rx).await;
        assert_eq!(cb.handle_msg, "job timeout");
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(started.elapsed() < Duration::from_secs(3));
        wait_until_idle(&exec, 3).await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn finished_jobs_leave_no_deadline_timer_behind() {
        let (exec, mut rx) = executor();
        let seen: Arc<std::sync::Mutex<Vec<JobContext>>> = Arc::default();
        let record = Arc::clone(&seen);
        exec.register(
            "quick",
            HandlerFn::arc(move |ctx: JobContext| {
                record.lock().unwrap().push(ctx);
                async move { Ok(()) }
            }),
        );

        for id in 0..20 {
            exec.run(RunRequest::new("quick", id).with_timeout_secs(3600)).unwrap();
        }
        for _ in 0..20 {
            assert!(next(&mut rx).await.is_success());
        }

        let metrics = tokio::runtime::Handle::current().metrics();
        for _ in 0..100 {
            if metrics.num_alive_tasks() == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(metrics.num_alive_tasks(), 0);
        assert!(exec.runs().is_empty());

        tokio::time::advance(Duration::from_secs(3601)).await;
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 20);
        assert!(seen.iter().all(|ctx| !ctx.is_cancelled()));
    }

    #[tokio::test]
    async fn panic_becomes_failure_completion() {
        let (exec, mut rx) = executor();
        fn explode() -> crate::error::JobResult {
            panic!("handler exploded")
        }
        exec.register("boom", HandlerFn::arc(|_ctx: JobContext| async move { explode() }));

        exec.run(RunRequest::new("boom", 4)).unwrap();

        let cb = next(&mut rx).await;
        assert!(!cb.is_success());
        assert_eq!(cb.handle_msg, "job panicked: handler exploded");
        wait_until_idle(&exec, 4).await;

        exec.run(RunRequest::new("boom", 4)).expect("agent still admits after a panic");
    }

    #[tokio::test]
    async fn handler_failure_reports_reason() {
        let (exec, mut rx) = executor();
        exec.register(
            "fail",
            HandlerFn::arc(|_ctx: JobContext| async move { Err(JobError::fail("db unreachable")) }),
        );

        exec.run(RunRequest::new("fail", 2)).unwrap();

        let cb = next(&mut rx).await;
        assert_eq!(cb.handle_code, xjob_model::FAIL_CODE);
        assert_eq!(cb.handle_msg, "db unreachable");
    }

    #[tokio::test]
    async fn kill_running_job() {
        let (exec, mut rx) = executor();
        exec.register("wait", waits_for_cancel());
        exec.run(RunRequest::new("wait", 8)).unwrap();

        exec.kill(8).expect("kill succeeds");
        assert!(!exec.is_running(8));

        let cb = next(&mut rx).await;
        assert_eq!(cb.handle_msg, "job killed");
    }

    #[tokio::test]
    async fn kill_unknown_job_leaves_table_unchanged() {
        let (exec, _rx) = executor();
        exec.register("wait", waits_for_cancel());
        exec.run(RunRequest::new("wait", 1)).unwrap();

        assert_eq!(exec.kill(2), Err(CoreError::NotRunning(2)));
        assert_eq!(exec.runs().ids(), vec![1]);
    }

    #[derive(Default)]
    struct RecordingMetrics {
        rejected: std::sync::Mutex<Vec<&'static str>>,
    }

    impl crate::metrics::MetricsBackend for RecordingMetrics {
        fn job_admitted(&self, _handler: &str) {}
        fn job_rejected(&self, reason: &'static str) {
            self.rejected.lock().unwrap().push(reason);
        }
        fn job_completed(&self, _outcome: crate::metrics::JobOutcome, _elapsed: Duration) {}
    }

    #[tokio::test]
    async fn rejections_are_counted_for_run_and_kill() {
        let metrics = Arc::new(RecordingMetrics::default());
        let exec = Executor::builder().with_metrics(metrics.clone()).build();
        exec.register("wait", waits_for_cancel());

        exec.run(RunRequest::new("wait", 1)).unwrap();
        let _ = exec.run(RunRequest::new("wait", 1));
        let _ = exec.run(RunRequest::new("missing", 2));
        let _ = exec.kill(3);

        assert_eq!(
            *metrics.rejected.lock().unwrap(),
            vec!["already_running", "handler_not_found", "not_running"]
        );
        exec.kill(1).unwrap();
    }

    #[tokio::test]
    async fn exactly_one_completion_per_job() {
        let (exec, mut rx) = executor();
        exec.register("ok", HandlerFn::arc(|_ctx: JobContext| async move { Ok(()) }));
        exec.register("wait", waits_for_cancel());

        exec.run(RunRequest::new("ok", 1)).unwrap();
        exec.run(RunRequest::new("wait", 2)).unwrap();
        exec.kill(2).unwrap();
        exec.run(RunRequest::new("wait", 3)).unwrap();
        exec.run(RunRequest::new("wait", 3).with_strategy(BlockStrategy::CoverEarly))
            .unwrap();
        exec.kill(3).unwrap();

        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(next(&mut rx).await.job_id);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 3]);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err(), "no extra completions");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_triggers_start_at_most_one() {
        let (exec, _rx) = executor();
        exec.register("wait", waits_for_cancel());
        let exec = Arc::new(exec);

        let mut handles = Vec::new();
        for _ in 0..32 {
            let exec = Arc::clone(&exec);
            handles.push(tokio::spawn(async move {
                exec.run(RunRequest::new("wait", 77)).is_ok()
            }));
        }

        let mut admitted = 0;
        for h in handles {
            if h.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(exec.runs().len(), 1);
    }

    #[tokio::test]
    async fn job_log_is_queryable() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let store = Arc::new(MemoryLogStore::default());
        let exec = Executor::builder()
            .with_completion(Arc::new(ChannelSink(tx)))
            .with_log_sink(store.clone())
            .build();
        exec.register(
            "echo",
            HandlerFn::arc(|ctx: JobContext| async move {
                ctx.log().line(format!("params={}", ctx.params()));
                Ok(())
            }),
        );

        exec.run(RunRequest::new("echo", 6).with_params("hello")).unwrap();
        next(&mut rx).await;

        let page = store
            .query(&xjob_model::LogRequest {
                job_id: 6,
                log_date_tim: 0,
                from_line_num: 1,
            })
            .await;
        assert_eq!(page.log_content, "params=hello\n");
        assert!(page.is_end);
    }
}
