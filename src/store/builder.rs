//! Fluent builder for configuring a [`Store`].

use crate::core::Model;
use crate::middleware::{Middleware, MiddlewareChain};
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::store::{Store, StoreInner};
use std::sync::Arc;
use std::time::Duration;

/// Builds a [`Store`] with middleware, an optional buffer window, and a
/// scheduler.
///
/// Middleware wraps transitions outermost-first in registration order.
/// A non-zero buffer window switches the store to buffered mode, where
/// dispatches coalesce until the window elapses without a new one. When
/// no scheduler is supplied, `build` installs a [`TokioScheduler`] bound
/// to the current runtime.
///
/// # Example
///
/// ```rust
/// use keel::middleware::LoggingMiddleware;
/// use keel::Store;
/// use std::time::Duration;
///
/// #[derive(Clone, Debug)]
/// struct Session {
///     user: Option<String>,
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = Store::builder(Session { user: None })
///     .middleware(LoggingMiddleware::new("session"))
///     .buffer_window(Duration::from_millis(25))
///     .build();
///
/// assert!(store.buffered());
/// # }
/// ```
pub struct StoreBuilder<M: Model> {
    initial: M,
    middleware: Vec<Arc<dyn Middleware<M>>>,
    buffer_window: Duration,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl<M: Model> StoreBuilder<M> {
    /// Start a builder around the initial state.
    pub fn new(initial: M) -> Self {
        Self {
            initial,
            middleware: Vec::new(),
            buffer_window: Duration::ZERO,
            scheduler: None,
        }
    }

    /// Append a middleware layer.
    ///
    /// Layers registered earlier sit further out: the first registered
    /// layer sees every transition first and its result last.
    pub fn middleware(mut self, layer: impl Middleware<M> + 'static) -> Self {
        self.middleware.push(Arc::new(layer));
        self
    }

    /// Coalesce dispatches over a quiet window.
    ///
    /// Every dispatch restarts the window; pending actions flush as one
    /// batch once it elapses without a new dispatch. A zero window (the
    /// default) keeps the store in immediate mode.
    pub fn buffer_window(mut self, window: Duration) -> Self {
        self.buffer_window = window;
        self
    }

    /// Install a scheduler for flush timers and notification rounds.
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Build the store.
    ///
    /// # Panics
    ///
    /// Panics when no scheduler was supplied and no Tokio runtime is
    /// running, since the default [`TokioScheduler`] needs one.
    pub fn build(self) -> Store<M> {
        let scheduler = self
            .scheduler
            .unwrap_or_else(|| Arc::new(TokioScheduler::new()));
        Store::from_inner(StoreInner::new(
            self.initial,
            MiddlewareChain::new(self.middleware),
            scheduler,
            self.buffer_window,
        ))
    }
}
