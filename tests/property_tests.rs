//! Property-based tests for store dispatch and subscription laws.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use keel::middleware::{from_fn, ChainError, Next};
use keel::registry::SubscriberFn;
use keel::scheduler::InlineScheduler;
use keel::Store;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    count: i64,
}

#[derive(Clone, Debug)]
enum Op {
    Add(i64),
    Mul(i64),
    Reset(i64),
}

fn apply(state: Counter, op: &Op) -> Counter {
    match op {
        Op::Add(amount) => Counter {
            count: state.count + amount,
        },
        Op::Mul(factor) => Counter {
            count: state.count * factor,
        },
        Op::Reset(value) => Counter { count: *value },
    }
}

fn step(state: Counter, op: Op) -> Counter {
    apply(state, &op)
}

fn inline_store(initial: Counter) -> Store<Counter> {
    Store::builder(initial)
        .scheduler(Arc::new(InlineScheduler::new()))
        .build()
}

prop_compose! {
    fn arbitrary_op()(variant in 0..3u8, value in -100..100i64) -> Op {
        match variant {
            0 => Op::Add(value),
            1 => Op::Mul(value % 4),
            _ => Op::Reset(value),
        }
    }
}

proptest! {
    #[test]
    fn dispatch_matches_a_plain_fold(
        initial in -100..100i64,
        ops in prop::collection::vec(arbitrary_op(), 0..12),
    ) {
        let store = inline_store(Counter { count: initial });
        let expected = ops
            .iter()
            .fold(Counter { count: initial }, |state, op| apply(state, op));

        for op in &ops {
            store.dispatch(step, (op.clone(),));
        }

        prop_assert_eq!(store.get_state(), expected);
    }

    #[test]
    fn subscribers_hear_every_transition_in_order(
        ops in prop::collection::vec(arbitrary_op(), 1..10),
    ) {
        let store = inline_store(Counter { count: 0 });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        store.subscribe(move |state: &Counter| {
            log.lock().unwrap().push(state.count);
        });

        let mut expected = Vec::new();
        let mut state = Counter { count: 0 };
        for op in &ops {
            state = apply(state, op);
            expected.push(state.count);
            store.dispatch(step, (op.clone(),));
        }

        prop_assert_eq!(seen.lock().unwrap().clone(), expected);
    }

    #[test]
    fn rejected_transitions_leave_state_unchanged(
        initial in -50..50i64,
        ops in prop::collection::vec(arbitrary_op(), 0..12),
    ) {
        let store = Store::builder(Counter { count: initial })
            .middleware(from_fn(|state: Counter, next: &mut Next<Counter>| {
                let result = next.run(state)?;
                if result.count.abs() > 1_000 {
                    return Err(ChainError::abort("count out of bounds"));
                }
                Ok(result)
            }))
            .scheduler(Arc::new(InlineScheduler::new()))
            .build();

        let mut expected = Counter { count: initial };
        for op in &ops {
            let candidate = apply(expected.clone(), op);
            if candidate.count.abs() <= 1_000 {
                expected = candidate;
            }
            store.dispatch(step, (op.clone(),));
        }

        prop_assert_eq!(store.get_state(), expected);
    }

    #[test]
    fn duplicate_registration_collapses_to_one_entry(copies in 1..5usize) {
        let store = inline_store(Counter { count: 0 });
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscriber: Arc<SubscriberFn<Counter>> = Arc::new(move |_state: &Counter| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for _ in 0..copies {
            store.subscribe_shared(Arc::clone(&subscriber));
        }

        prop_assert_eq!(store.subscriber_count(), 1);
        store.dispatch(step, (Op::Add(1),));
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_succeeds_exactly_once(attempts in 2..6usize) {
        let store = inline_store(Counter { count: 0 });
        let subscription = store.subscribe(|_state: &Counter| {});

        prop_assert!(subscription.unsubscribe());
        for _ in 1..attempts {
            prop_assert!(!subscription.unsubscribe());
        }
        prop_assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn separate_stores_never_share_state(
        ops in prop::collection::vec(arbitrary_op(), 1..8),
    ) {
        let initial = Counter { count: 7 };
        let active = inline_store(initial.clone());
        let untouched = inline_store(initial.clone());

        for op in &ops {
            active.dispatch(step, (op.clone(),));
        }

        prop_assert_eq!(untouched.get_state(), initial);
    }

    #[test]
    fn set_state_overrides_any_dispatch_history(
        ops in prop::collection::vec(arbitrary_op(), 0..10),
        replacement in -100..100i64,
    ) {
        let store = inline_store(Counter { count: 0 });
        for op in &ops {
            store.dispatch(step, (op.clone(),));
        }

        store.set_state(Counter { count: replacement });

        prop_assert_eq!(store.get_state().count, replacement);
    }
}
