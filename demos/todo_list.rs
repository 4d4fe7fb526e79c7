//! Todo List
//!
//! This example demonstrates a richer state shape with several actions,
//! pre-bound dispatchers, and direct state replacement.
//!
//! Key concepts:
//! - Multi-field state replaced as a whole value
//! - Actions of different arities sharing one store
//! - bind_action for ergonomic call sites
//! - InlineScheduler for synchronous, runtime-free usage
//!
//! Run with: cargo run --example todo_list

use keel::scheduler::InlineScheduler;
use keel::Store;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
struct Todo {
    title: String,
    done: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct TodoList {
    items: Vec<Todo>,
}

fn add_todo(state: TodoList, title: String) -> TodoList {
    let mut items = state.items;
    items.push(Todo { title, done: false });
    TodoList { items }
}

fn complete(state: TodoList, index: usize) -> TodoList {
    let mut items = state.items;
    if let Some(item) = items.get_mut(index) {
        item.done = true;
    }
    TodoList { items }
}

fn clear_done(state: TodoList) -> TodoList {
    let items = state.items.into_iter().filter(|item| !item.done).collect();
    TodoList { items }
}

fn main() {
    println!("=== Todo List Example ===\n");

    // The inline scheduler runs notifications synchronously, so no async
    // runtime is needed.
    let store = Store::builder(TodoList { items: vec![] })
        .scheduler(Arc::new(InlineScheduler::new()))
        .build();

    let add = store.bind_action(add_todo);
    add(("write the demo".to_string(),));
    add(("review the demo".to_string(),));
    add(("ship it".to_string(),));

    store.dispatch(complete, (0,));
    store.dispatch(complete, (2,));

    println!("After completing two items:");
    store.with_state(|state| {
        for item in &state.items {
            let mark = if item.done { "x" } else { " " };
            println!("  [{}] {}", mark, item.title);
        }
    });

    store.dispatch(clear_done, ());
    println!(
        "\nAfter clearing done items: {} left",
        store.get_state().items.len()
    );

    // set_state replaces everything outright, skipping actions entirely.
    store.set_state(TodoList { items: vec![] });
    println!(
        "After set_state(empty): {} left",
        store.get_state().items.len()
    );

    println!("\n=== Example Complete ===");
}
