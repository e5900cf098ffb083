//! The memoizing inference engine.

use argand_core::{ExprArena, ExprHandle, ExprNode, FactSet, Predicate, Truth};
use rustc_hash::FxHashMap;

use crate::rules;

/// Derives and caches the facts of expression nodes.
///
/// The cache is keyed by handle, so an engine must only be used with the
/// arena it was first queried against.
#[derive(Debug, Default, Clone)]
pub struct FactEngine {
    cache: FxHashMap<ExprHandle, FactSet>,
}

impl FactEngine {
    /// Creates an engine with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the closed fact set of `expr`.
    pub fn facts(&mut self, arena: &ExprArena, expr: ExprHandle) -> FactSet {
        if let Some(&facts) = self.cache.get(&expr) {
            return facts;
        }

        let facts = match arena.get(expr) {
            ExprNode::Symbol(id) => arena.symbol_facts(*id),
            node => {
                let node = node.clone();
                let children: Vec<FactSet> = node
                    .children()
                    .into_iter()
                    .map(|c| self.facts(arena, c))
                    .collect();
                rules::derive(arena, &node, &children)
            }
        };

        self.cache.insert(expr, facts);
        facts
    }

    /// Queries one predicate of `expr`.
    pub fn ask(&mut self, arena: &ExprArena, expr: ExprHandle, predicate: Predicate) -> Truth {
        self.facts(arena, expr).get(predicate)
    }

    /// Returns the number of cached nodes.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Queries one predicate without keeping a cache.
pub fn ask(arena: &ExprArena, expr: ExprHandle, predicate: Predicate) -> Truth {
    FactEngine::new().ask(arena, expr, predicate)
}
