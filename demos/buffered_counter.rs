//! Buffered Counter
//!
//! This example demonstrates buffered dispatch: rapid dispatches coalesce
//! over a quiet window and flush as one batch with one notification.
//!
//! Key concepts:
//! - Debounced flushing (each dispatch restarts the window)
//! - One notification round per flushed batch
//! - Reads before the flush still see the old state
//!
//! Run with: cargo run --example buffered_counter

use keel::Store;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    count: i64,
}

fn add(state: Counter, amount: i64) -> Counter {
    Counter {
        count: state.count + amount,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Buffered Counter Example ===\n");

    let store = Store::builder(Counter { count: 0 })
        .buffer_window(Duration::from_millis(25))
        .build();
    println!("Store is buffered: {}", store.buffered());

    store.subscribe(|state: &Counter| {
        println!("  subscriber saw count = {}", state.count);
    });

    println!("\nDispatching add(1), add(9), add(0) in a burst...");
    store.dispatch(add, (1,));
    store.dispatch(add, (9,));
    store.dispatch(add, (0,));

    // Nothing applied yet: the batch is waiting out the quiet window.
    println!(
        "Count immediately after the burst: {}",
        store.get_state().count
    );

    tokio::time::sleep(Duration::from_millis(60)).await;
    println!("Count after the window elapsed: {}", store.get_state().count);

    println!("\n=== Example Complete ===");
}
