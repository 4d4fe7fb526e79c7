//! Logging Middleware
//!
//! This example demonstrates the middleware chain: a logging layer around
//! a validation layer that rejects invalid transitions.
//!
//! Key concepts:
//! - Middleware layering (outermost-first registration order)
//! - Short-circuiting a transition with an abort
//! - Structured tracing output around each transition
//!
//! Run with: cargo run --example logging_middleware

use keel::middleware::{from_fn, ChainError, LoggingMiddleware, Next};
use keel::Store;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
struct Account {
    balance: i64,
}

fn deposit(state: Account, amount: i64) -> Account {
    Account {
        balance: state.balance + amount,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Logging Middleware Example ===\n");

    let store = Store::builder(Account { balance: 100 })
        .middleware(LoggingMiddleware::new("account"))
        .middleware(from_fn(|state: Account, next: &mut Next<Account>| {
            let result = next.run(state)?;
            if result.balance < 0 {
                return Err(ChainError::abort("balance would go negative"));
            }
            Ok(result)
        }))
        .build();

    println!("Depositing 50...");
    store.dispatch(deposit, (50,));
    println!("Balance: {}", store.get_state().balance);

    println!("\nWithdrawing 500 (deposit of -500)...");
    store.dispatch(deposit, (-500,));
    println!("Balance kept at: {}", store.get_state().balance);

    tokio::time::sleep(Duration::from_millis(50)).await;

    println!("\n=== Example Complete ===");
}
