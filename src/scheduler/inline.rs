//! Inline scheduler for synchronous contexts.

use crate::scheduler::{ScheduledTask, Scheduler, TaskId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Scheduler that runs every task inline, inside the `schedule` call.
///
/// Delays are ignored and `cancel` is a no-op: by the time a caller holds
/// a [`TaskId`], the task has already run. This makes store behavior fully
/// synchronous and deterministic, which is what property tests and scratch
/// code want.
///
/// Two caveats follow from running inline:
///
/// - notification rounds run inside the dispatch call that produced them,
///   so subscribers must not call back into the store;
/// - buffered mode degenerates: every dispatch flushes itself immediately
///   instead of coalescing over a window.
pub struct InlineScheduler {
    next_id: AtomicU64,
}

impl InlineScheduler {
    /// Create an inline scheduler.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InlineScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for InlineScheduler {
    fn schedule(&self, _delay: Duration, task: ScheduledTask) -> TaskId {
        let id = TaskId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        task();
        id
    }

    fn cancel(&self, _id: TaskId) {}
}
