//! Middleware chain composition.
//!
//! A chain wraps every state transition in an "onion" of middleware layers:
//! the outermost layer runs first, each layer forwards to the next through a
//! continuation, and the terminal action sits at the center. A layer may
//! short-circuit by returning without forwarding, or abort by returning an
//! error.

use crate::core::{BoundAction, Model};
use crate::middleware::error::ChainError;
use std::sync::Arc;

/// A layer in the transition pipeline.
///
/// Middleware receives the state flowing inward and the continuation of the
/// chain. It must do exactly one of:
///
/// - call `next.run(state)` once to forward (possibly with a modified state),
/// - return `Ok(state)` directly to short-circuit the layers beneath it,
/// - return `Err` to abort the transition.
///
/// Calling the continuation twice is a contract violation and fails fast
/// with [`ChainError::ContinuationReplayed`].
///
/// Implement this trait for stateful middleware, or wrap a plain function
/// with [`from_fn`].
///
/// # Example
///
/// ```rust
/// use keel::core::bind;
/// use keel::middleware::{from_fn, MiddlewareChain};
/// use std::sync::Arc;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: i64,
/// }
///
/// // Clamp whatever the inner layers produce.
/// let clamp = from_fn(|state: Counter, next: &mut keel::middleware::Next<Counter>| {
///     let result = next.run(state)?;
///     Ok(Counter { count: result.count.min(100) })
/// });
///
/// let chain = MiddlewareChain::new(vec![Arc::new(clamp)]);
/// let result = chain
///     .run(
///         Counter { count: 0 },
///         bind(|s: Counter| Counter { count: s.count + 500 }, ()),
///     )
///     .unwrap();
///
/// assert_eq!(result.count, 100);
/// ```
pub trait Middleware<M: Model>: Send + Sync {
    /// Handle one transition step.
    fn handle(&self, state: M, next: &mut Next<'_, M>) -> Result<M, ChainError>;
}

/// Middleware backed by a plain function. Built with [`from_fn`].
pub struct FnMiddleware<F> {
    f: F,
}

/// Wrap a function as a middleware layer.
///
/// The function receives the state and the chain continuation, exactly like
/// [`Middleware::handle`]. Annotate the state parameter so the state type
/// can be inferred:
///
/// ```rust
/// use keel::middleware::{from_fn, Next};
///
/// #[derive(Clone, Debug)]
/// struct Counter {
///     count: i64,
/// }
///
/// let limit = 10;
/// let cap = from_fn(move |state: Counter, next: &mut Next<Counter>| {
///     let result = next.run(state)?;
///     Ok(Counter { count: result.count.min(limit) })
/// });
/// # let _ = cap;
/// ```
pub fn from_fn<M, F>(f: F) -> FnMiddleware<F>
where
    M: Model,
    F: Fn(M, &mut Next<'_, M>) -> Result<M, ChainError> + Send + Sync,
{
    FnMiddleware { f }
}

impl<M, F> Middleware<M> for FnMiddleware<F>
where
    M: Model,
    F: Fn(M, &mut Next<'_, M>) -> Result<M, ChainError> + Send + Sync,
{
    fn handle(&self, state: M, next: &mut Next<'_, M>) -> Result<M, ChainError> {
        (self.f)(state, next)
    }
}

/// Continuation cursor over the middleware sequence.
///
/// The cursor advances one position per call over an immutable sequence, so
/// a chain can be reused across transitions without aliasing a shared queue.
/// The terminal action is the virtual last element.
pub struct Next<'a, M: Model> {
    entries: &'a [Arc<dyn Middleware<M>>],
    terminal: Option<BoundAction<M>>,
    cursor: usize,
    current: Option<usize>,
}

impl<'a, M: Model> Next<'a, M> {
    fn new(entries: &'a [Arc<dyn Middleware<M>>], terminal: BoundAction<M>) -> Self {
        Self {
            entries,
            terminal: Some(terminal),
            cursor: 0,
            current: None,
        }
    }

    /// Forward the state to the next layer of the chain.
    ///
    /// Returns the state produced by the layers beneath the caller. Each
    /// middleware may call this at most once per transition.
    pub fn run(&mut self, state: M) -> Result<M, ChainError> {
        if let Some(caller) = self.current {
            // A layer's first continuation call always finds the cursor
            // exactly one past its own position.
            if self.cursor != caller + 1 {
                return Err(ChainError::ContinuationReplayed { position: caller });
            }
        }

        let position = self.cursor;
        self.cursor += 1;

        if position < self.entries.len() {
            let entry = Arc::clone(&self.entries[position]);
            let caller = self.current.replace(position);
            let result = entry.handle(state, self);
            self.current = caller;
            result
        } else {
            match self.terminal.take() {
                Some(terminal) => Ok(terminal(state)),
                None => Err(ChainError::ContinuationReplayed { position }),
            }
        }
    }
}

/// An immutable, reusable sequence of middleware layers.
///
/// Insertion order is execution order: the first entry is the outermost
/// layer. The chain holds its entries behind `Arc`, so cloning is cheap and
/// a single chain serves every transition the store runs.
#[derive(Clone)]
pub struct MiddlewareChain<M: Model> {
    entries: Arc<[Arc<dyn Middleware<M>>]>,
}

impl<M: Model> MiddlewareChain<M> {
    /// Compose a chain from ordered middleware entries.
    pub fn new(entries: Vec<Arc<dyn Middleware<M>>>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Number of middleware layers (excluding the terminal action).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the chain has no middleware layers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run one transition through the chain.
    ///
    /// The terminal action executes last if every layer forwards. On error
    /// the input state is lost; callers keep their own copy of the prior
    /// state for recovery.
    pub fn run(&self, state: M, terminal: BoundAction<M>) -> Result<M, ChainError> {
        let mut next = Next::new(&self.entries, terminal);
        next.run(state)
    }
}

impl<M: Model> Default for MiddlewareChain<M> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
