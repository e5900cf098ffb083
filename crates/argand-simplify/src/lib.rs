//! # argand-simplify
//!
//! Evaluating constructors and rewrite rules for the Argand kernel.
//!
//! Every expression is built through a [`Context`], whose constructors put
//! the result in canonical form as it is created:
//! - sums and products are flattened, their numbers folded and like terms
//!   collected
//! - powers with numeric operands are evaluated exactly
//! - function applications run the ordered rewrite rules registered for
//!   their kind in the [`RuleTable`], and stay unevaluated when none fires
//!
//! The complex-part functions (`re`, `im`, `sign`, `Abs`, `arg`,
//! `conjugate`) consult the assumptions engine before rewriting, so
//! `re(r)` for a real `r` is `r` while `re(x)` for an opaque `x` remains
//! `re(x)`.
//!
//! On top of the constructors sit the collaborators: [`Context::diff`],
//! [`Context::subs`], [`Context::doit`] and [`Context::expand`], the last
//! of which uses equality saturation (egg) for trigonometric expansion.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod calculus;
pub mod context;
pub mod expand;
pub mod functions;
pub mod rules;
pub mod trig;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

pub use context::Context;
pub use expand::ExpandHints;
pub use rules::{FuncRules, Rule, RuleTable};
pub use trig::{TrigConfig, TrigExpander, TrigStats};
