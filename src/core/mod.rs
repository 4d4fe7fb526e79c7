//! Core store types.
//!
//! This module contains the pure vocabulary of the store:
//! - State values via the `Model` trait
//! - Transition functions via the `Action` trait and its bound form
//!
//! Nothing here performs scheduling or notification; these types are
//! plain data and pure functions.

mod action;
mod model;

pub use action::{bind, Action, BoundAction};
pub use model::Model;
