//! Counter Store
//!
//! This example demonstrates the basic store lifecycle: dispatch, read,
//! and subscribe.
//!
//! Key concepts:
//! - Whole-value state replacement with pure actions
//! - Dispatching actions with argument tuples
//! - Asynchronous subscriber notification (never inside dispatch)
//!
//! Run with: cargo run --example counter

use keel::Store;
use std::time::Duration;

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

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Counter Store Example ===\n");

    let store = Store::builder(Counter { count: 0 }).build();

    // Subscribers hear about every new state on the next tick.
    store.subscribe(|state: &Counter| {
        println!("  subscriber saw count = {}", state.count);
    });

    println!("Dispatching increment and add(41)...");
    store.dispatch(increment, ());
    store.dispatch(add, (41,));

    // Immediate mode applies transitions synchronously.
    println!("Count right after dispatch: {}", store.get_state().count);

    // Give the notification rounds a tick to run.
    tokio::time::sleep(Duration::from_millis(50)).await;

    println!("\n=== Example Complete ===");
}
