//! Custom Scheduler
//!
//! This example demonstrates the scheduler seam: any timer source can
//! drive flushes and notification rounds by implementing `Scheduler`.
//!
//! Key concepts:
//! - Scheduler as an injected capability, not an ambient global
//! - Deterministic control over when deferred work runs
//! - Watching the debounce timer restart under a burst of dispatches
//!
//! Run with: cargo run --example custom_scheduler

use keel::scheduler::{ScheduledTask, Scheduler, TaskId};
use keel::Store;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Queues tasks until `drain` is called, ignoring delays entirely.
#[derive(Default)]
struct StepScheduler {
    next_id: AtomicU64,
    queue: Mutex<Vec<(TaskId, ScheduledTask)>>,
}

impl StepScheduler {
    fn drain(&self) {
        loop {
            let next = {
                let mut queue = self.queue.lock().unwrap();
                if queue.is_empty() {
                    break;
                }
                queue.remove(0)
            };
            println!("  running task {:?}", next.0);
            (next.1)();
        }
    }
}

impl Scheduler for StepScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> TaskId {
        let id = TaskId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        println!("  scheduled task {:?} with delay {:?}", id, delay);
        self.queue.lock().unwrap().push((id, task));
        id
    }

    fn cancel(&self, id: TaskId) {
        println!("  cancelled task {:?}", id);
        self.queue.lock().unwrap().retain(|(task_id, _)| *task_id != id);
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    count: i64,
}

fn add(state: Counter, amount: i64) -> Counter {
    Counter {
        count: state.count + amount,
    }
}

fn main() {
    println!("=== Custom Scheduler Example ===\n");

    let scheduler = Arc::new(StepScheduler::default());
    let store = Store::builder(Counter { count: 0 })
        .buffer_window(Duration::from_millis(25))
        .scheduler(Arc::clone(&scheduler) as Arc<dyn Scheduler>)
        .build();

    store.subscribe(|state: &Counter| {
        println!("  subscriber saw count = {}", state.count);
    });

    println!("Dispatching add(1), add(2), add(3); each restarts the flush timer:");
    store.dispatch(add, (1,));
    store.dispatch(add, (2,));
    store.dispatch(add, (3,));

    println!("\nDraining the scheduler by hand:");
    scheduler.drain();

    println!("\nFinal count: {}", store.get_state().count);

    println!("\n=== Example Complete ===");
}
