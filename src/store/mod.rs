//! The store: public read/write/subscribe surface.
//!
//! A store owns exactly one current state value and everything needed to
//! replace it: the middleware chain every transition runs through, the
//! subscriber registry notified after each transition, the injected
//! scheduler, and (in buffered mode) the pending dispatch buffer.
//!
//! Stores are cheap to clone; every clone is a handle to the same
//! underlying store.

mod builder;

pub use builder::StoreBuilder;

use crate::core::{bind, Action, BoundAction, Model};
use crate::dispatch::DispatchBuffer;
use crate::middleware::MiddlewareChain;
use crate::registry::{SubscriberFn, SubscriberRegistry, Subscription};
use crate::scheduler::{panic_message, ScheduledTask, Scheduler};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Framework-agnostic application-state container.
///
/// The store holds one state value of type `M`, replaces it wholesale on
/// each transition, and notifies subscribers asynchronously afterwards.
/// Transitions run through the configured middleware chain; in buffered
/// mode they coalesce over a quiet window first.
///
/// # Example
///
/// ```rust
/// use keel::scheduler::InlineScheduler;
/// use keel::Store;
/// use std::sync::Arc;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: i64,
/// }
///
/// fn add(state: Counter, amount: i64) -> Counter {
///     Counter { count: state.count + amount }
/// }
///
/// let store = Store::builder(Counter { count: 0 })
///     .scheduler(Arc::new(InlineScheduler::new()))
///     .build();
///
/// store.dispatch(add, (5,));
/// store.dispatch(add, (37,));
/// assert_eq!(store.get_state().count, 42);
/// ```
pub struct Store<M: Model> {
    inner: Arc<StoreInner<M>>,
}

struct StoreInner<M: Model> {
    state: RwLock<M>,
    // Serializes dispatch, flush and set_state so transitions and their
    // notification rounds keep a single global order.
    transition: Mutex<()>,
    chain: MiddlewareChain<M>,
    registry: Arc<SubscriberRegistry<M>>,
    scheduler: Arc<dyn Scheduler>,
    buffer: Option<DispatchBuffer<M>>,
}

impl<M: Model> Store<M> {
    /// Start building a store around `initial` state.
    pub fn builder(initial: M) -> StoreBuilder<M> {
        StoreBuilder::new(initial)
    }

    fn from_inner(inner: StoreInner<M>) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// A clone of the current state.
    ///
    /// The returned value is independent: nothing the caller does to it
    /// affects the store. Never blocks on in-flight transitions beyond
    /// the brief read-lock acquisition.
    pub fn get_state(&self) -> M {
        self.inner.state.read().unwrap().clone()
    }

    /// Read the current state by reference, without cloning.
    ///
    /// The read lock is held for the duration of `f`; the closure must
    /// not call back into store methods that write.
    ///
    /// ```rust
    /// # use keel::scheduler::InlineScheduler;
    /// # use keel::Store;
    /// # use std::sync::Arc;
    /// # #[derive(Clone, Debug)]
    /// # struct Counter { count: i64 }
    /// # let store = Store::builder(Counter { count: 3 })
    /// #     .scheduler(Arc::new(InlineScheduler::new()))
    /// #     .build();
    /// let doubled = store.with_state(|state| state.count * 2);
    /// assert_eq!(doubled, 6);
    /// ```
    pub fn with_state<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        let state = self.inner.state.read().unwrap();
        f(&state)
    }

    /// Replace the current state outright.
    ///
    /// Bypasses both the middleware chain and any pending buffer, and
    /// produces exactly one notification round. Actions already queued in
    /// buffered mode are unaffected; their flush later applies on top of
    /// whatever state is current at flush time.
    pub fn set_state(&self, state: M) {
        let _guard = self.inner.lock_transition();
        *self.inner.state.write().unwrap() = state.clone();
        debug!(state = ?state, "State replaced directly");
        self.inner.publish(state);
    }

    /// Dispatch an action with its arguments.
    ///
    /// In immediate mode the transition is applied before this returns;
    /// in buffered mode it is queued and coalesced over the configured
    /// window. Dispatch never returns a result in either mode: observe
    /// outcomes through [`subscribe`](Store::subscribe) or
    /// [`get_state`](Store::get_state).
    ///
    /// ```rust
    /// # use keel::scheduler::InlineScheduler;
    /// # use keel::Store;
    /// # use std::sync::Arc;
    /// #[derive(Clone, Debug)]
    /// struct Cart {
    ///     items: Vec<String>,
    /// }
    ///
    /// fn add_item(state: Cart, name: String) -> Cart {
    ///     let mut items = state.items;
    ///     items.push(name);
    ///     Cart { items }
    /// }
    ///
    /// # let store = Store::builder(Cart { items: vec![] })
    /// #     .scheduler(Arc::new(InlineScheduler::new()))
    /// #     .build();
    /// store.dispatch(add_item, ("apples".to_string(),));
    /// assert_eq!(store.get_state().items, vec!["apples"]);
    /// ```
    pub fn dispatch<A, Args>(&self, action: A, args: Args)
    where
        A: Action<M, Args>,
        Args: Send + 'static,
    {
        self.run_bound(bind(action, args));
    }

    /// Dispatch a plain state-to-state reducer.
    ///
    /// Equivalent to dispatching a zero-argument action: the reducer runs
    /// in terminal position behind the full middleware chain.
    pub fn reduce<F>(&self, reducer: F)
    where
        F: FnOnce(M) -> M + Send + 'static,
    {
        self.run_bound(Box::new(reducer));
    }

    /// Pre-bind an action to this store.
    ///
    /// The returned closure dispatches the action with call-time
    /// arguments, holding its own handle to the store.
    ///
    /// ```rust
    /// # use keel::scheduler::InlineScheduler;
    /// # use keel::Store;
    /// # use std::sync::Arc;
    /// # #[derive(Clone, Debug)]
    /// # struct Counter { count: i64 }
    /// # fn add(state: Counter, amount: i64) -> Counter {
    /// #     Counter { count: state.count + amount }
    /// # }
    /// # let store = Store::builder(Counter { count: 0 })
    /// #     .scheduler(Arc::new(InlineScheduler::new()))
    /// #     .build();
    /// let add_to_count = store.bind_action(add);
    /// add_to_count((2,));
    /// add_to_count((40,));
    /// assert_eq!(store.get_state().count, 42);
    /// ```
    pub fn bind_action<A, Args>(&self, action: A) -> impl Fn(Args)
    where
        A: Action<M, Args> + Clone,
        Args: Send + 'static,
    {
        let store = self.clone();
        move |args| store.dispatch(action.clone(), args)
    }

    /// Register a subscriber, returning a removal handle.
    ///
    /// The subscriber is invoked with each new state after each completed
    /// transition, never synchronously inside the call that produced the
    /// state, and never at registration time. Dropping the handle does
    /// not unsubscribe.
    pub fn subscribe<F>(&self, subscriber: F) -> Subscription<M>
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        self.subscribe_shared(Arc::new(subscriber))
    }

    /// Register a subscriber the caller keeps a handle to.
    ///
    /// Registration is identity-based: adding the same `Arc` twice keeps
    /// a single entry, so one state change still means one call.
    pub fn subscribe_shared(&self, subscriber: Arc<SubscriberFn<M>>) -> Subscription<M> {
        self.inner.registry.add(Arc::clone(&subscriber));
        Subscription::new(&self.inner.registry, &subscriber)
    }

    /// Remove a subscriber registered with
    /// [`subscribe_shared`](Store::subscribe_shared).
    ///
    /// Returns `true` if it was registered. Removing an absent subscriber
    /// is a no-op.
    pub fn unsubscribe_shared(&self, subscriber: &Arc<SubscriberFn<M>>) -> bool {
        self.inner.registry.remove(subscriber)
    }

    /// Whether this store coalesces dispatches over a buffer window.
    pub fn buffered(&self) -> bool {
        self.inner.buffer.is_some()
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.len()
    }

    fn run_bound(&self, action: BoundAction<M>) {
        match &self.inner.buffer {
            Some(buffer) => {
                buffer.push(action);
                let flush = StoreInner::flush_task(&self.inner);
                buffer.restart_timer(self.inner.scheduler.as_ref(), flush);
            }
            None => self.inner.apply_now(action),
        }
    }
}

impl<M: Model> Clone for Store<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: Model> StoreInner<M> {
    fn new(
        initial: M,
        chain: MiddlewareChain<M>,
        scheduler: Arc<dyn Scheduler>,
        buffer_window: Duration,
    ) -> Self {
        Self {
            state: RwLock::new(initial),
            transition: Mutex::new(()),
            chain,
            registry: Arc::new(SubscriberRegistry::new()),
            scheduler,
            buffer: (!buffer_window.is_zero()).then(|| DispatchBuffer::new(buffer_window)),
        }
    }

    // A panicking action can poison this lock mid-transition. The guard
    // carries no data, so recovering keeps the store usable.
    fn lock_transition(&self) -> MutexGuard<'_, ()> {
        self.transition
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one transition synchronously (immediate mode).
    fn apply_now(&self, action: BoundAction<M>) {
        let _guard = self.lock_transition();
        let current = self.state.read().unwrap().clone();

        match self.chain.run(current, action) {
            Ok(next) => {
                *self.state.write().unwrap() = next.clone();
                self.publish(next);
            }
            Err(e) => {
                error!(error = %e, "Transition failed; keeping prior state");
                let unchanged = self.state.read().unwrap().clone();
                self.publish(unchanged);
            }
        }
    }

    fn flush_task(inner: &Arc<Self>) -> ScheduledTask {
        let weak = Arc::downgrade(inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.flush();
            }
        })
    }

    /// Drain the pending buffer and apply the batch as one transition
    /// group with a single notification round.
    fn flush(&self) {
        let actions = match &self.buffer {
            Some(buffer) => buffer.drain(),
            None => return,
        };
        if actions.is_empty() {
            return;
        }

        let _guard = self.lock_transition();
        let batch = actions.len();
        let mut state = self.state.read().unwrap().clone();

        for action in actions {
            let current = state.clone();
            match catch_unwind(AssertUnwindSafe(|| self.chain.run(current, action))) {
                Ok(Ok(next)) => state = next,
                Ok(Err(e)) => {
                    error!(error = %e, "Buffered transition failed; keeping prior state");
                }
                Err(panic) => {
                    error!(
                        reason = panic_message(panic.as_ref()),
                        "Buffered transition panicked; keeping prior state"
                    );
                }
            }
        }

        *self.state.write().unwrap() = state.clone();
        debug!(batch, "Flushed buffered transitions");
        self.publish(state);
    }

    /// Schedule one notification round carrying `state`.
    ///
    /// Runs on the next scheduler tick, outside the stack of the call
    /// that produced the state. The subscriber list is snapshotted at
    /// delivery time; each subscriber is isolated so one panicking
    /// subscriber cannot starve the rest.
    fn publish(&self, state: M) {
        let registry = Arc::clone(&self.registry);
        let round: ScheduledTask = Box::new(move || {
            for subscriber in registry.snapshot() {
                if let Err(panic) = catch_unwind(AssertUnwindSafe(|| subscriber(&state))) {
                    warn!(
                        reason = panic_message(panic.as_ref()),
                        "Subscriber panicked during notification"
                    );
                }
            }
        });
        self.scheduler.schedule(Duration::ZERO, round);
    }
}
