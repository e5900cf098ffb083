//! Type-safe expression handles.
//!
//! Handles are 32-bit indices into the arena. Because every node is
//! interned, two handles from the same arena are equal exactly when the
//! expressions they name are structurally equal.

use std::fmt;

/// A handle to an expression in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Creates a new handle from an index.
    ///
    /// This is primarily for internal use by the arena and for the
    /// pre-interned constant slots in [`crate::consts`].
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}

impl fmt::Display for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
