//! Integration tests for buffered dispatch timing.
//!
//! These tests drive the real Tokio scheduler on a paused clock, so the
//! debounce window elapses deterministically instead of racing wall time.

use keel::Store;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    count: i64,
}

fn increment(state: Counter) -> Counter {
    Counter {
        count: state.count + 1,
    }
}

fn add(state: Counter, amount: i64) -> Counter {
    Counter {
        count: state.count + amount,
    }
}

fn multiply(state: Counter, factor: i64) -> Counter {
    Counter {
        count: state.count * factor,
    }
}

fn buffered_store(initial: i64, window_ms: u64) -> Store<Counter> {
    Store::builder(Counter { count: initial })
        .buffer_window(Duration::from_millis(window_ms))
        .build()
}

fn seen_counts(store: &Store<Counter>) -> Arc<Mutex<Vec<i64>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    store.subscribe(move |state: &Counter| {
        log.lock().unwrap().push(state.count);
    });
    seen
}

#[tokio::test(start_paused = true)]
async fn burst_coalesces_into_one_notification_with_cumulative_state() {
    let store = buffered_store(0, 25);
    let seen = seen_counts(&store);

    store.dispatch(add, (1,));
    store.dispatch(add, (9,));
    store.dispatch(add, (0,));

    // Still waiting out the quiet window.
    assert_eq!(store.get_state().count, 0);

    sleep(Duration::from_millis(40)).await;

    assert_eq!(store.get_state().count, 10);
    assert_eq!(*seen.lock().unwrap(), vec![10]);
}

#[tokio::test(start_paused = true)]
async fn each_dispatch_restarts_the_quiet_window() {
    let store = buffered_store(0, 25);
    let seen = seen_counts(&store);

    store.dispatch(add, (1,));
    sleep(Duration::from_millis(15)).await;
    store.dispatch(add, (2,));
    sleep(Duration::from_millis(15)).await;
    store.dispatch(add, (3,));
    sleep(Duration::from_millis(15)).await;

    // 45ms in, but never 25ms of quiet: nothing has flushed.
    assert_eq!(store.get_state().count, 0);
    assert!(seen.lock().unwrap().is_empty());

    sleep(Duration::from_millis(30)).await;

    assert_eq!(store.get_state().count, 6);
    assert_eq!(*seen.lock().unwrap(), vec![6]);
}

#[tokio::test(start_paused = true)]
async fn gap_separated_bursts_flush_as_separate_groups() {
    let store = buffered_store(0, 25);
    let seen = seen_counts(&store);

    store.dispatch(add, (1,));
    store.dispatch(add, (2,));
    sleep(Duration::from_millis(40)).await;

    store.dispatch(add, (10,));
    sleep(Duration::from_millis(40)).await;

    assert_eq!(store.get_state().count, 13);
    assert_eq!(*seen.lock().unwrap(), vec![3, 13]);
}

#[tokio::test(start_paused = true)]
async fn flushed_batch_applies_in_dispatch_order() {
    let store = buffered_store(1, 25);
    let seen = seen_counts(&store);

    store.dispatch(add, (5,));
    store.dispatch(multiply, (3,));
    sleep(Duration::from_millis(40)).await;

    // (1 + 5) * 3, not 1 * 3 + 5.
    assert_eq!(store.get_state().count, 18);
    assert_eq!(*seen.lock().unwrap(), vec![18]);
}

#[tokio::test(start_paused = true)]
async fn set_state_bypasses_the_buffer_and_queued_actions_flush_on_top() {
    let store = buffered_store(0, 25);
    let seen = seen_counts(&store);

    store.dispatch(increment, ());
    store.set_state(Counter { count: 100 });

    // The replacement landed synchronously; the increment is still queued.
    assert_eq!(store.get_state().count, 100);

    sleep(Duration::from_millis(40)).await;

    assert_eq!(store.get_state().count, 101);
    assert_eq!(*seen.lock().unwrap(), vec![100, 101]);
}

#[tokio::test(start_paused = true)]
async fn immediate_mode_delivers_one_round_per_dispatch_in_order() {
    let store = Store::builder(Counter { count: 0 }).build();
    let seen = seen_counts(&store);

    store.dispatch(increment, ());
    store.dispatch(increment, ());
    store.dispatch(increment, ());

    sleep(Duration::from_millis(5)).await;

    // Each round carries the state produced by its own transition.
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_store_discards_pending_flushes() {
    let store = buffered_store(0, 25);
    let seen = seen_counts(&store);

    store.dispatch(add, (5,));
    drop(store);

    sleep(Duration::from_millis(40)).await;

    assert!(seen.lock().unwrap().is_empty());
}
