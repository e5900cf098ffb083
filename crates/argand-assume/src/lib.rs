//! # argand-assume
//!
//! Three-valued assumption inference for Argand expressions.
//!
//! Symbols carry closed [`FactSet`]s; this crate derives the facts of every
//! composite node from the facts of its children using per-operator rules,
//! then closes the result under the same implication graph the symbols use.
//!
//! Inference is monotonic: nodes never change, so a derived set stays valid
//! forever and [`FactEngine`] memoizes results per handle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
mod rules;

#[cfg(test)]
mod proptests;

pub use argand_core::{FactError, FactSet, Predicate, Truth};
pub use engine::{ask, FactEngine};
