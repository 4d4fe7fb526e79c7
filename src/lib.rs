//! Keel: a framework-agnostic application state container
//!
//! Keel keeps your whole application state in one place and replaces it
//! wholesale on every transition. Actions are pure functions from state
//! to state; middleware wraps each transition like layers of an onion;
//! subscribers hear about new state asynchronously, one notification
//! round per transition, never inside the call that produced it.
//!
//! # Core Concepts
//!
//! - **Store**: owns the current state and serializes all transitions
//! - **Actions**: pure `fn(state, args...) -> state` transition logic
//! - **Middleware**: layered interception with short-circuit and abort
//! - **Buffered dispatch**: coalesce rapid dispatches over a quiet window
//! - **Scheduler**: injected timer capability behind flushes and notifications
//!
//! # Example
//!
//! ```rust
//! use keel::Store;
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! fn add(state: Counter, amount: i64) -> Counter {
//!     Counter { count: state.count + amount }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Store::builder(Counter { count: 0 }).build();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let log = Arc::clone(&seen);
//! store.subscribe(move |state: &Counter| {
//!     log.lock().unwrap().push(state.count);
//! });
//!
//! store.dispatch(add, (2,));
//! store.dispatch(add, (40,));
//! assert_eq!(store.get_state().count, 42);
//!
//! // Subscribers hear about each transition on the next tick.
//! tokio::time::sleep(Duration::from_millis(20)).await;
//! assert_eq!(*seen.lock().unwrap(), vec![2, 42]);
//! # }
//! ```

pub mod core;
mod dispatch;
pub mod middleware;
pub mod registry;
pub mod scheduler;
pub mod store;

// Re-export commonly used types
pub use crate::core::{Action, Model};
pub use crate::registry::Subscription;
pub use crate::store::{Store, StoreBuilder};
