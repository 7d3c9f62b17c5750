use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{context::JobContext, error::JobResult};

/// A runnable job, invoked once per admitted trigger.
#[async_trait]
pub trait JobHandler: Send + Sync + 'static {
    async fn handle(&self, ctx: JobContext) -> JobResult;
}

pub type HandlerRef = Arc<dyn JobHandler>;

/// [`JobHandler`] built from an async closure.
///
/// ```ignore
/// let echo = HandlerFn::arc(|ctx: JobContext| async move {
///     ctx.log().line(ctx.params());
///     Ok(())
/// });
/// ```
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> HandlerFn<F>
where
    F: Fn(JobContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = JobResult> + Send + 'static,
{
    pub fn arc(f: F) -> HandlerRef {
        Arc::new(Self { f })
    }
}

#[async_trait]
impl<F, Fut> JobHandler for HandlerFn<F>
where
    F: Fn(JobContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = JobResult> + Send + 'static,
{
    async fn handle(&self, ctx: JobContext) -> JobResult {
        (self.f)(ctx).await
    }
}

/// Handlers by name.
///
/// Registering an existing name replaces the previous handler (last write
/// wins); lookups never block each other.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    inner: Arc<RwLock<HashMap<String, HandlerRef>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, handler: HandlerRef) {
        let name = name.into();
        if self.write().insert(name.clone(), handler).is_some() {
            warn!(handler = %name, "handler re-registered; previous one replaced");
        } else {
            debug!(handler = %name, "handler registered");
        }
    }

    pub fn lookup(&self, name: &str) -> Option<HandlerRef> {
        self.read().get(name).cloned()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, HandlerRef>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, HandlerRef>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
