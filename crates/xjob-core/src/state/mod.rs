use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::time::Instant;
use xjob_model::{BlockStrategy, JobId};

use crate::{
    cancel::{CancelHandle, CancelReason},
    log::JobLog,
};

/// Live execution record of one admitted trigger.
#[derive(Clone)]
pub struct RunningJob {
    pub job_id: JobId,
    /// Process-unique serial of this execution; distinguishes a run from the
    /// one that replaced it under the same job id.
    pub run: u64,
    pub handler: String,
    pub params: String,
    pub strategy: BlockStrategy,
    pub deadline: Option<Instant>,
    pub started_at: Instant,
    cancel: CancelHandle,
    log: JobLog,
}

impl RunningJob {
    pub fn new(
        job_id: JobId,
        run: u64,
        handler: impl Into<String>,
        params: impl Into<String>,
        strategy: BlockStrategy,
        log: JobLog,
    ) -> Self {
        Self {
            job_id,
            run,
            handler: handler.into(),
            params: params.into(),
            strategy,
            deadline: None,
            started_at: Instant::now(),
            cancel: CancelHandle::new(),
            log,
        }
    }

    /// Signal the job to stop; idempotent.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        self.cancel.cancel(reason)
    }

    #[inline]
    pub fn cancel_handle(&self) -> &CancelHandle {
        &self.cancel
    }

    #[inline]
    pub fn log(&self) -> &JobLog {
        &self.log
    }
}

/// In-memory table of running jobs.
///
/// One mutex guards the whole map. Single operations lock on their own; use
/// [`RunTable::lock`] when a check and a mutation must happen atomically.
#[derive(Clone, Default)]
pub struct RunTable {
    inner: Arc<Mutex<HashMap<JobId, RunningJob>>>,
}

impl RunTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the table for a multi-step critical section.
    pub fn lock(&self) -> RunTableGuard<'_> {
        RunTableGuard {
            jobs: self.inner.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    pub fn exists(&self, id: JobId) -> bool {
        self.lock().exists(id)
    }

    pub fn get(&self, id: JobId) -> Option<RunningJob> {
        self.lock().get(id).cloned()
    }

    /// Insert, overwriting any record under the same id.
    pub fn put(&self, job: RunningJob) -> Option<RunningJob> {
        self.lock().put(job)
    }

    pub fn remove(&self, id: JobId) -> Option<RunningJob> {
        self.lock().remove(id)
    }

    /// Remove the record only if it still belongs to execution `run`.
    pub fn remove_run(&self, id: JobId, run: u64) -> bool {
        self.lock().remove_run(id, run)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all running jobs, sorted.
    pub fn ids(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = self.lock().jobs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// Exclusive view of the [`RunTable`].
pub struct RunTableGuard<'a> {
    jobs: MutexGuard<'a, HashMap<JobId, RunningJob>>,
}

impl RunTableGuard<'_> {
    pub fn exists(&self, id: JobId) -> bool {
        self.jobs.contains_key(&id)
    }

    pub fn get(&self, id: JobId) -> Option<&RunningJob> {
        self.jobs.get(&id)
    }

    pub fn put(&mut self, job: RunningJob) -> Option<RunningJob> {
        self.jobs.insert(job.job_id, job)
    }

    pub fn remove(&mut self, id: JobId) -> Option<RunningJob> {
        self.jobs.remove(&id)
    }

    pub fn remove_run(&mut self, id: JobId, run: u64) -> bool {
        if self.jobs.get(&id).is_some_and(|job| job.run == run) {
            self.jobs.remove(&id);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
