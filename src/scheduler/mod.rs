//! Injected scheduling capability.
//!
//! The store never consults a clock or runtime directly. Flush timers and
//! next-tick notification rounds go through the `Scheduler` trait, so the
//! environment decides how deferred work runs and tests can substitute a
//! deterministic implementation.

mod inline;
mod runtime;

pub use inline::InlineScheduler;
pub use runtime::TokioScheduler;

use std::any::Any;
use std::time::Duration;

/// A unit of deferred work.
pub type ScheduledTask = Box<dyn FnOnce() + Send + 'static>;

/// Handle identifying a scheduled task so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Wrap a raw identifier. Scheduler implementations allocate these;
    /// ids only need to be unique within one scheduler.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Deferred-execution capability required by a store.
///
/// Two operations cover everything the store needs: run a task once after
/// a delay, and cancel a task that has not yet run. A zero delay means
/// "next tick": the task still runs outside the stack of the caller that
/// scheduled it.
///
/// Implementations must run tasks one at a time, in deadline order with
/// ties broken by submission order. The store relies on this to keep
/// notification rounds for different states from interleaving.
pub trait Scheduler: Send + Sync + 'static {
    /// Run `task` once, `delay` from now.
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> TaskId;

    /// Cancel a scheduled task. Best effort: cancelling a task that has
    /// already run, or an unknown id, is a no-op.
    fn cancel(&self, id: TaskId);
}

/// Best-effort extraction of a panic payload for log output.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
