//! Middleware composition for state transitions.
//!
//! Every transition a store applies runs through its middleware chain:
//! - `Middleware` is one layer of the pipeline
//! - `MiddlewareChain` composes layers into a reusable onion
//! - `Next` is the continuation a layer uses to forward inward
//!
//! Layers run outermost-first in insertion order; the terminal action
//! (the dispatched action or reducer) always sits at the center.

mod chain;
mod error;
mod logging;

pub use chain::{from_fn, FnMiddleware, Middleware, MiddlewareChain, Next};
pub use error::ChainError;
pub use logging::LoggingMiddleware;
