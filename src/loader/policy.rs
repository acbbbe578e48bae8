//! Loading policy attached to a route descriptor.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::loader::context::LoaderContext;
use crate::state::StateSnapshot;

/// Error type loaders may fail with; the coordinator only keeps the
/// rendered reason.
pub type LoaderError = Box<dyn std::error::Error + Send + Sync>;

/// Future produced by one loader invocation.
pub type LoaderFuture = Pin<Box<dyn Future<Output = Result<(), LoaderError>> + Send + 'static>>;

/// A data-loading function: effects land in the store via dispatch, so
/// the only output is success or failure.
pub type LoaderFn = Arc<dyn Fn(LoaderContext) -> LoaderFuture + Send + Sync>;

/// Predicate deciding whether a loader should run, evaluated against the
/// state snapshot taken when the coordinator starts.
pub type Guard = Arc<dyn Fn(&StateSnapshot) -> bool + Send + Sync>;

/// Loading policy for one route descriptor.
#[derive(Clone)]
pub struct LoadPolicy {
    pub loader: LoaderFn,
    pub guard: Option<Guard>,

    /// Deferred loaders are fired without being awaited for the current
    /// render: best-effort on the server, backfilled on a live client.
    pub deferred: bool,
}

impl LoadPolicy {
    /// Policy whose completion gates the render decision.
    pub fn eager(loader: impl Fn(LoaderContext) -> LoaderFuture + Send + Sync + 'static) -> Self {
        Self {
            loader: Arc::new(loader),
            guard: None,
            deferred: false,
        }
    }

    /// Best-effort policy: fired, never awaited for the current render.
    pub fn deferred(loader: impl Fn(LoaderContext) -> LoaderFuture + Send + Sync + 'static) -> Self {
        Self {
            loader: Arc::new(loader),
            guard: None,
            deferred: true,
        }
    }

    /// Attach a guard predicate (e.g. "only load when the slice is not
    /// already populated").
    pub fn with_guard(mut self, guard: impl Fn(&StateSnapshot) -> bool + Send + Sync + 'static) -> Self {
        self.guard = Some(Arc::new(guard));
        self
    }
}
