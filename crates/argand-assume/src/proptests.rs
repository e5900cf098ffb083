//! Property-based tests for fact derivation.

#[cfg(test)]
mod tests {
    use argand_core::{ExprArena, ExprHandle, ExprNode, FactSet, Predicate, Truth};
    use proptest::prelude::*;
    use smallvec::smallvec;

    use crate::FactEngine;

    fn literal() -> impl Strategy<Value = (Predicate, bool)> {
        (0..Predicate::ALL.len(), any::<bool>()).prop_map(|(i, v)| (Predicate::ALL[i], v))
    }

    fn literals() -> impl Strategy<Value = Vec<(Predicate, bool)>> {
        prop::collection::vec(literal(), 0..3)
    }

    fn derived(x: FactSet, y: FactSet, product: bool) -> FactSet {
        let mut arena = ExprArena::new();
        let a = arena.symbol("a", x);
        let b = arena.symbol("b", y);
        let terms = smallvec![a, b];
        let node = if product {
            ExprNode::Mul(terms)
        } else {
            ExprNode::Add(terms)
        };
        let h: ExprHandle = arena.intern(node);
        FactEngine::new().facts(&arena, h)
    }

    proptest! {
        #[test]
        fn more_facts_never_flip_a_derived_value(
            x in literals(),
            y in literals(),
            extra in literal(),
            product in any::<bool>(),
        ) {
            let weak = FactSet::from_pairs(x.iter().copied());
            let strong = FactSet::from_pairs(x.iter().copied().chain([extra]));
            let other = FactSet::from_pairs(y.iter().copied());
            prop_assume!(weak.is_ok() && strong.is_ok() && other.is_ok());
            let (weak, strong, other) = (weak.unwrap(), strong.unwrap(), other.unwrap());

            let before = derived(weak, other, product);
            let after = derived(strong, other, product);
            for p in Predicate::ALL {
                if before.get(p) != Truth::Unknown {
                    prop_assert_eq!(before.get(p), after.get(p), "{} flipped", p);
                }
            }
        }

        #[test]
        fn sum_of_reals_is_real(x in literals(), y in literals()) {
            let xs = FactSet::from_pairs(x.iter().copied().chain([(Predicate::Real, true)]));
            let ys = FactSet::from_pairs(y.iter().copied().chain([(Predicate::Real, true)]));
            prop_assume!(xs.is_ok() && ys.is_ok());
            let sum = derived(xs.unwrap(), ys.unwrap(), false);
            prop_assert_eq!(sum.get(Predicate::Real), Truth::True);
        }
    }
}
