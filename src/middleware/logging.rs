//! Transition logging middleware.

use crate::core::Model;
use crate::middleware::chain::{Middleware, Next};
use crate::middleware::error::ChainError;
use tracing::debug;

/// Middleware that logs every transition flowing through it.
///
/// Logs the inbound state at `debug` level, forwards to the rest of the
/// chain, then logs the outbound state. Install it as the outermost layer
/// to observe whole transitions.
///
/// # Example
///
/// ```rust
/// use keel::middleware::LoggingMiddleware;
/// use keel::Store;
///
/// #[derive(Clone, Debug)]
/// struct Counter {
///     count: i64,
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = Store::builder(Counter { count: 0 })
///     .middleware(LoggingMiddleware::new("counter"))
///     .build();
/// # let _ = store;
/// # }
/// ```
pub struct LoggingMiddleware {
    label: String,
}

impl LoggingMiddleware {
    /// Create a logging layer tagged with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new("store")
    }
}

impl<M: Model> Middleware<M> for LoggingMiddleware {
    fn handle(&self, state: M, next: &mut Next<'_, M>) -> Result<M, ChainError> {
        debug!(label = %self.label, state = ?state, "transition entering chain");
        let result = next.run(state)?;
        debug!(label = %self.label, state = ?result, "transition leaving chain");
        Ok(result)
    }
}
