//! # Access Semantics
//!
//! Decides which visual category a trail segment falls into for the
//! active travel mode. Pure and synchronous: no I/O, no engine types.
//!
//! ## Modules
//!
//! - [`expr`]: the tag predicate tree, its evaluator and filter lowering
//! - [`mode`]: `TravelMode`
//! - [`rules`]: implied-yes / implied-no tables per mode
//! - [`classify`]: the six category predicates

pub mod classify;
pub mod expr;
pub mod mode;
pub mod rules;

pub use classify::{Category, CategoryPredicates, classify};
pub use expr::{Expr, TagSet, tags};
pub use mode::TravelMode;
