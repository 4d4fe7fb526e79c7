//! Pending buffer for coalescing dispatch.
//!
//! In buffered mode the store queues bound actions here instead of
//! applying them, and keeps a single delay timer alive: every new dispatch
//! cancels the previous timer and starts a fresh one (debounce, not
//! throttle). The batch drains only after a full quiet window.

use crate::core::{BoundAction, Model};
use crate::scheduler::{ScheduledTask, Scheduler, TaskId};
use std::sync::Mutex;
use std::time::Duration;

/// FIFO queue of bound actions awaiting a flush, plus the restartable
/// timer that triggers it.
pub(crate) struct DispatchBuffer<M: Model> {
    pending: Mutex<Vec<BoundAction<M>>>,
    timer: Mutex<Option<TaskId>>,
    window: Duration,
}

impl<M: Model> DispatchBuffer<M> {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            timer: Mutex::new(None),
            window,
        }
    }

    /// Append a bound action to the pending queue.
    pub(crate) fn push(&self, action: BoundAction<M>) {
        self.pending.lock().unwrap().push(action);
    }

    /// Take the whole pending queue, oldest first.
    pub(crate) fn drain(&self) -> Vec<BoundAction<M>> {
        std::mem::take(&mut *self.pending.lock().unwrap())
    }

    /// Cancel the running window timer (if any) and start a fresh one
    /// that executes `flush` after a full quiet window.
    ///
    /// The timer slot stays locked across the schedule call so concurrent
    /// restarts cannot interleave cancel and schedule. An inline scheduler
    /// will run `flush` during that call; `flush` must therefore never
    /// touch the timer slot itself.
    pub(crate) fn restart_timer(&self, scheduler: &dyn Scheduler, flush: ScheduledTask) {
        let mut timer = self.timer.lock().unwrap();
        if let Some(previous) = timer.take() {
            scheduler.cancel(previous);
        }
        *timer = Some(scheduler.schedule(self.window, flush));
    }
}
