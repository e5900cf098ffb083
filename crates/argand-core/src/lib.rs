//! # argand-core
//!
//! Expression tree and assumption sets for the Argand kernel.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Type-safe expression handles with O(1) structural equality
//! - Pre-interned special constants at fixed handles
//! - Closed three-valued assumption sets attached to symbols
//!
//! The arena never rewrites what it stores; canonical forms are produced by
//! the constructors in `argand-simplify`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod display;
pub mod expr;
pub mod facts;
pub mod handle;
pub mod intern;

pub use arena::{consts, ExprArena, SymbolEntry};
pub use display::ExprDisplay;
pub use expr::{Args, Constant, ExprNode, Func, FunctionId, SymbolId, Terms};
pub use facts::{FactError, FactSet, Predicate, Truth};
pub use handle::ExprHandle;
