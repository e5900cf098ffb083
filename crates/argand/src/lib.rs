//! # Argand
//!
//! Complex-part rewriting for symbolic expressions, backed by a
//! three-valued assumptions kernel.
//!
//! ## Features
//!
//! - **Hash-consed core**: arena-allocated DAG where structural equality is
//!   handle equality
//! - **Exact arithmetic**: big integers and rationals
//! - **Assumptions**: `real`, `positive`, `integer` and friends, closed under
//!   their implications and derived for compound expressions
//! - **Complex parts**: `re`, `im`, `sign`, `Abs`, `arg` and `conjugate`
//!   evaluate eagerly whenever the assumptions decide the answer
//! - **Expansion**: hint-driven `expand`, with trigonometric expansion by
//!   equality saturation
//!
//! ## Quick Start
//!
//! ```rust
//! use argand::prelude::*;
//!
//! let mut ctx = Context::new();
//! let x = ctx.symbol("x");
//! let r = ctx.symbol_with("r", [(Predicate::Real, true)]).unwrap();
//!
//! let ri = ctx.mul(&[r, consts::I]);
//! let z = ctx.add(&[x, ri]);
//! let re = ctx.re(z);
//! assert_eq!(ctx.display(re).to_string(), "re(x)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use argand_assume as assume;
pub use argand_core as core;
pub use argand_integers as integers;
pub use argand_simplify as simplify;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use argand_core::{
        consts, Constant, ExprHandle, ExprNode, FactError, FactSet, Func, Predicate, Truth,
    };
    pub use argand_integers::{Integer, Rational};
    pub use argand_simplify::{Context, ExpandHints, RuleTable, TrigConfig};
}
