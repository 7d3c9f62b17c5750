use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use xjob_model::{JobId, LogRequest, LogResult};

use super::{LogHandler, LogSink};

const DEFAULT_CAPACITY: usize = 256;
const MAX_LINES_PER_RUN: usize = 10_000;

/// Keeps the lines of the latest run of each job in memory.
///
/// At most `capacity` jobs are retained; the least recently started is evicted first.
pub struct MemoryLogStore {
    capacity: usize,
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    runs: HashMap<JobId, RunLog>,
    order: VecDeque<JobId>,
}

struct RunLog {
    run: u64,
    lines: Vec<String>,
    finished: bool,
}

impl MemoryLogStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(StoreInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of jobs with retained logs.
    pub fn len(&self) -> usize {
        self.lock().runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn page(&self, job_id: JobId, from: u32) -> LogResult {
        let from = from.max(1);
        let inner = self.lock();
        let Some(log) = inner.runs.get(&job_id) else {
            return LogResult::empty(from, true);
        };

        let start = (from as usize - 1).min(log.lines.len());
        let slice = &log.lines[start..];
        let mut content = String::new();
        for line in slice {
            content.push_str(line);
            content.push('\n');
        }

        LogResult {
            log_content: content,
            from_line_num: from,
            to_line_num: from - 1 + slice.len() as u32,
            is_end: log.finished,
        }
    }
}

impl Default for MemoryLogStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LogSink for MemoryLogStore {
    fn open(&self, job_id: JobId, run: u64) {
        let mut inner = self.lock();
        inner.order.retain(|id| *id != job_id);
        inner.order.push_back(job_id);
        inner.runs.insert(
            job_id,
            RunLog {
                run,
                lines: Vec::new(),
                finished: false,
            },
        );

        while inner.runs.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.runs.remove(&oldest);
        }
    }

    fn append(&self, job_id: JobId, run: u64, line: &str) {
        let mut inner = self.lock();
        if let Some(log) = inner.runs.get_mut(&job_id)
            && log.run == run
            && log.lines.len() < MAX_LINES_PER_RUN
        {
            log.lines.push(line.to_string());
        }
    }

    fn close(&self, job_id: JobId, run: u64) {
        let mut inner = self.lock();
        if let Some(log) = inner.runs.get_mut(&job_id)
            && log.run == run
        {
            log.finished = true;
        }
    }
}

#[async_trait]
impl LogHandler for MemoryLogStore {
    async fn query(&self, req: &LogRequest) -> LogResult {
        self.page(req.job_id, req.from_line_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(job_id: JobId, from: u32) -> LogRequest {
        LogRequest {
            job_id,
            log_date_tim: 0,
            from_line_num: from,
        }
    }

    #[tokio::test]
    async fn pages_from_offset() {
        let store = MemoryLogStore::default();
        store.open(1, 1);
        store.append(1, 1, "a");
        store.append(1, 1, "b");
        store.append(1, 1, "c");

        let page = store.query(&req(1, 2)).await;
        assert_eq!(page.log_content, "b\nc\n");
        assert_eq!(page.from_line_num, 2);
        assert_eq!(page.to_line_num, 3);
        assert!(!page.is_end);

        store.close(1, 1);
        let page = store.query(&req(1, 4)).await;
        assert!(page.log_content.is_empty());
        assert_eq!(page.to_line_num, 3);
        assert!(page.is_end);
    }

    #[tokio::test]
    async fn unknown_job_is_empty_and_final() {
        let store = MemoryLogStore::default();
        let page = store.query(&req(42, 1)).await;
        assert!(page.log_content.is_empty());
        assert!(page.is_end);
    }

    #[tokio::test]
    async fn stale_run_cannot_write_or_finish() {
        let store = MemoryLogStore::default();
        store.open(1, 1);
        store.append(1, 1, "old");
        store.open(1, 2);
        store.append(1, 1, "late write from replaced run");
        store.close(1, 1);
        store.append(1, 2, "new");

        let page = store.query(&req(1, 1)).await;
        assert_eq!(page.log_content, "new\n");
        assert!(!page.is_end);
    }

    #[test]
    fn evicts_oldest_job() {
        let store = MemoryLogStore::new(2);
        store.open(1, 1);
        store.open(2, 2);
        store.open(1, 3);
        store.open(3, 4);

        assert_eq!(store.len(), 2);
        let inner = store.lock();
        assert!(inner.runs.contains_key(&1));
        assert!(inner.runs.contains_key(&3));
        assert!(!inner.runs.contains_key(&2));
    }
}
