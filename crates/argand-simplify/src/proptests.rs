//! Property-based tests for the complex-part rewrite rules.

#[cfg(test)]
mod tests {
    use argand_core::{consts, ExprHandle, Predicate};
    use proptest::prelude::*;

    use crate::Context;

    /// A term `coeff * leaf * leaf?` over a small fixed alphabet.
    type TermSpec = (i64, usize, Option<usize>);

    fn term() -> impl Strategy<Value = TermSpec> {
        (-3i64..=3, 0usize..6, prop::option::of(0usize..6))
    }

    fn terms() -> impl Strategy<Value = Vec<TermSpec>> {
        prop::collection::vec(term(), 1..4)
    }

    struct Alphabet {
        leaves: [ExprHandle; 6],
    }

    impl Alphabet {
        fn new(ctx: &mut Context) -> Self {
            let x = ctx.symbol("x");
            let y = ctx.symbol("y");
            let r = ctx.symbol_with("r", [(Predicate::Real, true)]).unwrap();
            let p = ctx.symbol_with("p", [(Predicate::Positive, true)]).unwrap();
            let seven = ctx.integer(7);
            Self {
                leaves: [x, y, r, p, consts::I, seven],
            }
        }

        fn build(&self, ctx: &mut Context, spec: &[TermSpec]) -> ExprHandle {
            let parts: Vec<ExprHandle> = spec
                .iter()
                .map(|&(coeff, a, b)| {
                    let c = ctx.integer(coeff);
                    let mut factors = vec![c, self.leaves[a]];
                    factors.extend(b.map(|b| self.leaves[b]));
                    ctx.mul(&factors)
                })
                .collect();
            ctx.add(&parts)
        }
    }

    proptest! {
        #[test]
        fn re_and_im_are_additive(a in terms(), b in terms()) {
            let mut ctx = Context::new();
            let alphabet = Alphabet::new(&mut ctx);
            let a = alphabet.build(&mut ctx, &a);
            let b = alphabet.build(&mut ctx, &b);
            let sum = ctx.add(&[a, b]);

            let (re_a, re_b) = (ctx.re(a), ctx.re(b));
            let re_sum = ctx.re(sum);
            prop_assert_eq!(re_sum, ctx.add(&[re_a, re_b]));

            let (im_a, im_b) = (ctx.im(a), ctx.im(b));
            let im_sum = ctx.im(sum);
            prop_assert_eq!(im_sum, ctx.add(&[im_a, im_b]));
        }

        #[test]
        fn conjugate_is_an_additive_involution(a in terms(), b in terms()) {
            let mut ctx = Context::new();
            let alphabet = Alphabet::new(&mut ctx);
            let a = alphabet.build(&mut ctx, &a);
            let b = alphabet.build(&mut ctx, &b);
            let sum = ctx.add(&[a, b]);

            let (ca, cb) = (ctx.conjugate(a), ctx.conjugate(b));
            let conj_sum = ctx.conjugate(sum);
            prop_assert_eq!(conj_sum, ctx.add(&[ca, cb]));
            prop_assert_eq!(ctx.conjugate(ca), a);
        }

        #[test]
        fn parts_are_idempotent(a in terms()) {
            let mut ctx = Context::new();
            let alphabet = Alphabet::new(&mut ctx);
            let a = alphabet.build(&mut ctx, &a);

            let re = ctx.re(a);
            prop_assert!(ctx.is(re, Predicate::Real));
            prop_assert_eq!(ctx.re(re), re);
            let im = ctx.im(a);
            prop_assert_eq!(ctx.re(im), im);
            prop_assert_eq!(ctx.im(re), consts::ZERO);

            let sign = ctx.sign(a);
            prop_assert_eq!(ctx.sign(sign), sign);
        }
    }
}
