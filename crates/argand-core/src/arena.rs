//! Arena allocator for expression storage.
//!
//! All nodes live in one contiguous `Vec`, with hash-consing ensuring each
//! structurally unique node is stored exactly once. The arena performs no
//! simplification: callers are expected to intern nodes that are already in
//! canonical form (the simplifier's constructors do this).

use argand_integers::Rational;
use hashbrown::HashMap;

use crate::expr::{Constant, ExprNode, Func, FunctionId, SymbolId};
use crate::facts::FactSet;
use crate::handle::ExprHandle;
use crate::intern::InternTable;

/// Handles of the constants every arena interns on creation.
///
/// The slots are fixed, so these handles are valid in any arena and never
/// change after construction.
pub mod consts {
    use crate::handle::ExprHandle;

    /// The number `0`.
    pub const ZERO: ExprHandle = ExprHandle::new(0);
    /// The number `1`.
    pub const ONE: ExprHandle = ExprHandle::new(1);
    /// The number `-1`.
    pub const NEG_ONE: ExprHandle = ExprHandle::new(2);
    /// The number `1/2`.
    pub const HALF: ExprHandle = ExprHandle::new(3);
    /// The number `2`.
    pub const TWO: ExprHandle = ExprHandle::new(4);
    /// The imaginary unit.
    pub const I: ExprHandle = ExprHandle::new(5);
    /// `pi`.
    pub const PI: ExprHandle = ExprHandle::new(6);
    /// Euler's number.
    pub const E: ExprHandle = ExprHandle::new(7);
    /// `oo`.
    pub const INFINITY: ExprHandle = ExprHandle::new(8);
    /// `-oo`.
    pub const NEG_INFINITY: ExprHandle = ExprHandle::new(9);
    /// `zoo`.
    pub const COMPLEX_INFINITY: ExprHandle = ExprHandle::new(10);
    /// `nan`.
    pub const NAN: ExprHandle = ExprHandle::new(11);
}

/// A symbol's identity: its name together with its assumption set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolEntry {
    /// The printed name.
    pub name: String,
    /// The closed assumption set attached at creation.
    pub facts: FactSet,
}

/// The main arena for storing expressions.
#[derive(Debug, Clone)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbols keyed by name and facts.
    symbols: InternTable<SymbolEntry>,
    /// Names of undefined functions.
    functions: InternTable<String>,
}

impl Default for ExprArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprArena {
    /// Creates an arena holding only the pre-interned constants.
    #[must_use]
    pub fn new() -> Self {
        let mut arena = Self {
            nodes: Vec::new(),
            intern_map: HashMap::new(),
            symbols: InternTable::new(),
            functions: InternTable::new(),
        };
        let seeded = [
            ExprNode::Number(Rational::from(0)),
            ExprNode::Number(Rational::from(1)),
            ExprNode::Number(Rational::from(-1)),
            ExprNode::Number(Rational::from_i64(1, 2)),
            ExprNode::Number(Rational::from(2)),
            ExprNode::Constant(Constant::ImaginaryUnit),
            ExprNode::Constant(Constant::Pi),
            ExprNode::Constant(Constant::E),
            ExprNode::Constant(Constant::Infinity),
            ExprNode::Constant(Constant::NegativeInfinity),
            ExprNode::Constant(Constant::ComplexInfinity),
            ExprNode::Constant(Constant::NaN),
        ];
        for node in seeded {
            arena.intern(node);
        }
        debug_assert_eq!(arena.get(consts::NAN), &ExprNode::Constant(Constant::NaN));
        arena
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, returns the existing handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena holds `u32::MAX` nodes.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "Arena capacity exceeded");

        #[allow(clippy::cast_possible_truncation)]
        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this arena.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index() as usize]
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Atoms ===

    /// Interns a rational number.
    pub fn number(&mut self, value: Rational) -> ExprHandle {
        self.intern(ExprNode::Number(value))
    }

    /// Interns an integer.
    pub fn integer(&mut self, value: i64) -> ExprHandle {
        self.number(Rational::from(value))
    }

    /// Interns a symbol with the given (already closed) facts.
    pub fn symbol(&mut self, name: &str, facts: FactSet) -> ExprHandle {
        let id = self.symbols.intern(SymbolEntry {
            name: name.to_string(),
            facts,
        });
        self.intern(ExprNode::Symbol(id))
    }

    /// Returns the symbol entry for an id.
    #[must_use]
    pub fn symbol_entry(&self, id: SymbolId) -> Option<&SymbolEntry> {
        self.symbols.get(id)
    }

    /// Returns the facts attached to a symbol id (empty if unknown).
    #[must_use]
    pub fn symbol_facts(&self, id: SymbolId) -> FactSet {
        self.symbols.get(id).map(|s| s.facts).unwrap_or_default()
    }

    /// Interns the name of an undefined function.
    pub fn function_id(&mut self, name: &str) -> FunctionId {
        self.functions.intern(name.to_string())
    }

    /// Returns the name of an undefined function.
    #[must_use]
    pub fn function_name(&self, id: FunctionId) -> Option<&str> {
        self.functions.get(id).map(String::as_str)
    }

    // === Queries ===

    /// Returns the rational value of a number node.
    #[must_use]
    pub fn as_number(&self, handle: ExprHandle) -> Option<&Rational> {
        self.get(handle).as_number()
    }

    /// Returns true if `handle` is a function application of kind `func`.
    #[must_use]
    pub fn is_apply_of(&self, handle: ExprHandle, func: Func) -> bool {
        matches!(self.get(handle), ExprNode::Apply { func: f, .. } if *f == func)
    }

    /// Returns true if `target` occurs anywhere inside `expr`.
    #[must_use]
    pub fn contains(&self, expr: ExprHandle, target: ExprHandle) -> bool {
        self.any_node(expr, &mut |h, _| h == target)
    }

    /// Returns true if any node of `expr` (itself included) satisfies `pred`.
    pub fn any_node(
        &self,
        expr: ExprHandle,
        pred: &mut impl FnMut(ExprHandle, &ExprNode) -> bool,
    ) -> bool {
        let node = self.get(expr);
        if pred(expr, node) {
            return true;
        }
        node.children().into_iter().any(|c| self.any_node(c, pred))
    }

    /// Returns true if `expr` contains no symbols and no undefined functions.
    #[must_use]
    pub fn is_constant(&self, expr: ExprHandle) -> bool {
        !self.any_node(expr, &mut |_, node| {
            matches!(
                node,
                ExprNode::Symbol(_)
                    | ExprNode::Derivative { .. }
                    | ExprNode::Apply {
                        func: Func::Undefined(_),
                        ..
                    }
            )
        })
    }
}
