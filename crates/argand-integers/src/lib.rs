//! # argand-integers
//!
//! Exact integer and rational arithmetic for the Argand kernel.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`)
//! - Arbitrary precision rationals (`Rational`)
//!
//! Numeric constants inside expression trees are always `Rational`, so the
//! kernel never loses precision when folding coefficients.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod integer;
pub mod rational;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
pub use rational::Rational;
