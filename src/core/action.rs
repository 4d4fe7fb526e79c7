//! Actions: pure transition functions with explicit argument tuples.
//!
//! An action computes the next state from the current state plus call-time
//! arguments. Instead of runtime reflection over variable argument lists,
//! each arity is a separate `Args` tuple type resolved at the call site.

use crate::core::Model;

/// A pure state transition function taking call-time arguments.
///
/// `Args` is the argument tuple for this action: `()` for a plain reducer,
/// `(A,)` for one argument, up to four. Any `Fn(M, ...) -> M` closure or
/// function with a matching shape implements this automatically.
///
/// Actions carry no identity and may be invoked any number of times; they
/// receive the state by value and must return the full replacement state.
///
/// # Example
///
/// ```rust
/// use keel::core::Action;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: i64,
/// }
///
/// fn add(state: Counter, amount: i64) -> Counter {
///     Counter { count: state.count + amount }
/// }
///
/// let next = add.apply(Counter { count: 1 }, (41,));
/// assert_eq!(next.count, 42);
/// ```
pub trait Action<M: Model, Args>: Send + Sync + 'static {
    /// Compute the next state from the current state and arguments.
    fn apply(&self, state: M, args: Args) -> M;
}

/// An action bound to its arguments, ready to run against a state.
///
/// This is the queueable form: the pending buffer holds these, and the
/// middleware chain receives one as its terminal step.
pub type BoundAction<M> = Box<dyn FnOnce(M) -> M + Send>;

/// Capture an action together with its arguments as a [`BoundAction`].
pub fn bind<M, A, Args>(action: A, args: Args) -> BoundAction<M>
where
    M: Model,
    A: Action<M, Args>,
    Args: Send + 'static,
{
    Box::new(move |state| action.apply(state, args))
}

macro_rules! impl_action {
    ($($arg:ident),*) => {
        #[allow(non_snake_case)]
        impl<M, F, $($arg),*> Action<M, ($($arg,)*)> for F
        where
            M: Model,
            F: Fn(M $(, $arg)*) -> M + Send + Sync + 'static,
            $($arg: Send + 'static,)*
        {
            fn apply(&self, state: M, ($($arg,)*): ($($arg,)*)) -> M {
                self(state $(, $arg)*)
            }
        }
    };
}

impl_action!();
impl_action!(A1);
impl_action!(A1, A2);
impl_action!(A1, A2, A3);
impl_action!(A1, A2, A3, A4);

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn zero_arity_action_applies() {
        let next = increment.apply(Counter { count: 0 }, ());
        assert_eq!(next.count, 1);
    }

    #[test]
    fn single_argument_action_applies() {
        let next = add.apply(Counter { count: 40 }, (2,));
        assert_eq!(next.count, 42);
    }

    #[test]
    fn multi_argument_action_applies() {
        let scale_then_add = |state: Counter, factor: i64, offset: i64| Counter {
            count: state.count * factor + offset,
        };

        let next = scale_then_add.apply(Counter { count: 10 }, (3, 7));
        assert_eq!(next.count, 37);
    }

    #[test]
    fn actions_are_reusable() {
        let first = add.apply(Counter { count: 0 }, (5,));
        let second = add.apply(first, (5,));
        assert_eq!(second.count, 10);
    }

    #[test]
    fn bound_action_captures_arguments() {
        let bound = bind(add, (9,));
        let next = bound(Counter { count: 1 });
        assert_eq!(next.count, 10);
    }

    #[test]
    fn closures_implement_action() {
        let double = |state: Counter| Counter {
            count: state.count * 2,
        };

        let next = double.apply(Counter { count: 21 }, ());
        assert_eq!(next.count, 42);
    }
}
