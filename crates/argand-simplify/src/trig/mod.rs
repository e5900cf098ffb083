//! Trigonometric expansion by equality saturation.
//!
//! `sin` and `cos` applications are lowered into a small egg language whose
//! leaves are opaque placeholders, saturated with the angle-addition
//! identities, and the cheapest form is rebuilt through the evaluating
//! constructors. The cost function makes a `sin`/`cos` grow quadratically
//! with the size of its argument, so the extracted form pushes them down
//! onto the individual summands.

pub mod cost;
pub mod engine;
pub mod language;
pub mod rules;

pub use engine::{TrigConfig, TrigExpander, TrigStats};
pub use language::TrigLang;
