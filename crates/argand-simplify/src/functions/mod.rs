//! Rules for the built-in function kinds.
//!
//! Each submodule exposes a `register` function that installs its rewrite
//! rules and hooks into a [`RuleTable`](crate::RuleTable).

pub mod complexes;
pub mod elementary;
