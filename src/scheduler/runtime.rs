//! Tokio-backed scheduler.

use crate::scheduler::{panic_message, ScheduledTask, Scheduler, TaskId};
use std::collections::{BTreeMap, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{error, warn};

enum TimerCommand {
    Schedule {
        id: TaskId,
        deadline: Instant,
        task: ScheduledTask,
    },
    Cancel {
        id: TaskId,
    },
}

/// Scheduler that drives deferred work on a Tokio runtime.
///
/// All tasks run on a single worker task in deadline order (ties broken by
/// submission order), so two scheduled tasks never execute concurrently.
/// Timers use `tokio::time`, which means tests running under a paused
/// clock (`#[tokio::test(start_paused = true)]`) control exactly when
/// tasks fire.
///
/// A panicking task is caught, logged, and does not stop the worker.
/// Dropping the scheduler stops the worker; tasks that have not yet fired
/// are dropped with it.
pub struct TokioScheduler {
    commands: mpsc::UnboundedSender<TimerCommand>,
    next_id: AtomicU64,
}

impl TokioScheduler {
    /// Spawn the timer worker on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime. Use
    /// [`with_handle`](TokioScheduler::with_handle) to target an explicit
    /// runtime instead.
    pub fn new() -> Self {
        let handle = Handle::try_current().expect(
            "TokioScheduler requires a running Tokio runtime; use with_handle to target one explicitly",
        );
        Self::with_handle(&handle)
    }

    /// Spawn the timer worker on the runtime behind `handle`.
    pub fn with_handle(handle: &Handle) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        handle.spawn(timer_loop(receiver));
        Self {
            commands,
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> TaskId {
        let id = TaskId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let deadline = Instant::now() + delay;
        let command = TimerCommand::Schedule { id, deadline, task };
        if self.commands.send(command).is_err() {
            warn!("Timer worker stopped; dropping scheduled task");
        }
        id
    }

    fn cancel(&self, id: TaskId) {
        let _ = self.commands.send(TimerCommand::Cancel { id });
    }
}

async fn timer_loop(mut commands: mpsc::UnboundedReceiver<TimerCommand>) {
    let mut queue: BTreeMap<(Instant, u64), (TaskId, ScheduledTask)> = BTreeMap::new();
    let mut index: HashMap<TaskId, (Instant, u64)> = HashMap::new();
    let mut sequence: u64 = 0;

    loop {
        let next_deadline = queue.keys().next().map(|(deadline, _)| *deadline);
        let sleep_target = next_deadline.unwrap_or_else(Instant::now);

        tokio::select! {
            biased;

            command = commands.recv() => {
                match command {
                    Some(TimerCommand::Schedule { id, deadline, task }) => {
                        sequence += 1;
                        index.insert(id, (deadline, sequence));
                        queue.insert((deadline, sequence), (id, task));
                    }
                    Some(TimerCommand::Cancel { id }) => {
                        if let Some(key) = index.remove(&id) {
                            queue.remove(&key);
                        }
                    }
                    // All senders dropped; nothing can be scheduled anymore.
                    None => break,
                }
            }

            _ = tokio::time::sleep_until(sleep_target), if next_deadline.is_some() => {
                let now = Instant::now();
                while let Some(entry) = queue.first_entry() {
                    if entry.key().0 > now {
                        break;
                    }
                    let (id, task) = entry.remove();
                    index.remove(&id);
                    if let Err(panic) = catch_unwind(AssertUnwindSafe(task)) {
                        error!(
                            reason = panic_message(panic.as_ref()),
                            "Scheduled task panicked"
                        );
                    }
                }
            }
        }
    }
}
