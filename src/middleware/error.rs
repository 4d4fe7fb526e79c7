//! Chain execution errors.

use thiserror::Error;

/// Errors that can occur while running a middleware chain.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChainError {
    /// A middleware invoked its continuation a second time.
    #[error("Middleware at position {position} called its continuation more than once. Call next at most once per transition")]
    ContinuationReplayed { position: usize },

    /// A middleware refused to produce a usable state.
    #[error("Transition aborted: {reason}")]
    Aborted { reason: String },
}

impl ChainError {
    /// Abort the current transition with the given reason.
    ///
    /// Shorthand for middleware that wants to reject a transition:
    ///
    /// ```rust
    /// use keel::middleware::ChainError;
    ///
    /// let err = ChainError::abort("negative count not allowed");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Transition aborted: negative count not allowed"
    /// );
    /// ```
    pub fn abort(reason: impl Into<String>) -> Self {
        Self::Aborted {
            reason: reason.into(),
        }
    }
}
