//! Core Model trait for store state values.
//!
//! The store treats state as an opaque value: it never reaches inside,
//! never mutates in place, and replaces the whole value on each transition.

use std::fmt::Debug;

/// Trait for store state values.
///
/// State is immutable by convention: transitions consume the current value
/// and produce a replacement. The store never mutates state in place.
///
/// # Required Traits
///
/// - `Clone`: snapshots are handed to readers and subscribers by value
/// - `Debug`: states must be debuggable for diagnostics
/// - `Send + Sync + 'static`: state crosses scheduler task boundaries
///
/// The blanket implementation covers every type meeting those bounds, so
/// ordinary data types qualify without any ceremony:
///
/// # Example
///
/// ```rust
/// use keel::core::Model;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct AppState {
///     count: i64,
///     items: Vec<String>,
/// }
///
/// fn takes_model<M: Model>(_: &M) {}
///
/// takes_model(&AppState { count: 0, items: vec![] });
/// ```
pub trait Model: Clone + Debug + Send + Sync + 'static {}

impl<T: Clone + Debug + Send + Sync + 'static> Model for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct TestModel {
        count: i64,
    }

    fn assert_model<M: Model>() {}

    #[test]
    fn plain_data_types_are_models() {
        assert_model::<TestModel>();
        assert_model::<i64>();
        assert_model::<String>();
        assert_model::<Vec<u8>>();
    }

    #[test]
    fn model_snapshots_are_independent() {
        let original = TestModel { count: 1 };
        let mut snapshot = original.clone();
        snapshot.count = 99;

        assert_eq!(original.count, 1);
        assert_eq!(snapshot.count, 99);
    }
}
