//! Subscriber registry: ordered listeners with identity-based membership.
//!
//! Subscribers are held as `Arc`s and deduplicated by allocation identity,
//! so registering the same handle twice is a no-op. Notification walks a
//! snapshot of the list in registration order; mutations during a round
//! take effect from the next round on.

use crate::core::Model;
use std::sync::{Arc, RwLock, Weak};

/// A listener invoked with the new state after each completed transition.
pub type SubscriberFn<M> = dyn Fn(&M) + Send + Sync;

/// Ordered set of subscribers, unique by allocation identity.
pub struct SubscriberRegistry<M: Model> {
    entries: RwLock<Vec<Arc<SubscriberFn<M>>>>,
}

impl<M: Model> SubscriberRegistry<M> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Add a subscriber unless the same `Arc` is already registered.
    ///
    /// Returns `true` if the subscriber was added, `false` if it was
    /// already present.
    pub fn add(&self, subscriber: Arc<SubscriberFn<M>>) -> bool {
        let mut entries = self.entries.write().unwrap();
        if entries.iter().any(|entry| Arc::ptr_eq(entry, &subscriber)) {
            return false;
        }
        entries.push(subscriber);
        true
    }

    /// Remove a subscriber by identity.
    ///
    /// Returns `true` if it was present. Removing an absent subscriber is
    /// a no-op, never an error.
    pub fn remove(&self, subscriber: &Arc<SubscriberFn<M>>) -> bool {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|entry| !Arc::ptr_eq(entry, subscriber));
        entries.len() < before
    }

    /// Invoke every currently-registered subscriber with `state`, in
    /// registration order.
    ///
    /// The list is snapshotted first: a subscriber registered during the
    /// round is not called until the next one, and no lock is held while
    /// subscribers run. A panicking subscriber unwinds out of this method;
    /// callers wanting isolation wrap each call themselves.
    pub fn notify_all(&self, state: &M) {
        for subscriber in self.snapshot() {
            subscriber(state);
        }
    }

    /// Clone the current subscriber list in registration order.
    pub fn snapshot(&self) -> Vec<Arc<SubscriberFn<M>>> {
        self.entries.read().unwrap().clone()
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// True if no subscribers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl<M: Model> Default for SubscriberRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for removing a subscriber registered through a store.
///
/// The handle holds only weak references: dropping it does *not*
/// unsubscribe, and it does not keep the store alive. Call
/// [`unsubscribe`](Subscription::unsubscribe) explicitly to remove the
/// subscriber; calling it again afterwards is a safe no-op.
pub struct Subscription<M: Model> {
    registry: Weak<SubscriberRegistry<M>>,
    subscriber: Weak<SubscriberFn<M>>,
}

impl<M: Model> Subscription<M> {
    pub(crate) fn new(
        registry: &Arc<SubscriberRegistry<M>>,
        subscriber: &Arc<SubscriberFn<M>>,
    ) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            subscriber: Arc::downgrade(subscriber),
        }
    }

    /// Remove the subscriber from its registry.
    ///
    /// Returns `true` if the subscriber was still registered. Returns
    /// `false` on repeated calls, after a manual unsubscribe through the
    /// store, or once the store itself has been dropped.
    pub fn unsubscribe(&self) -> bool {
        let (Some(registry), Some(subscriber)) =
            (self.registry.upgrade(), self.subscriber.upgrade())
        else {
            return false;
        };
        registry.remove(&subscriber)
    }
}
