//! Canonical products.
//!
//! A canonical `Mul` is flat, holds at most one number (first, never zero
//! or one), combines factors with a common base into a single power, and
//! keeps the remaining factors sorted by handle. A number times a single
//! sum is distributed: `2*(x + 1)` is `2*x + 2`.

use argand_core::{consts, Constant, ExprHandle, ExprNode, Terms};
use argand_integers::Rational;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;

use crate::context::Context;

/// Regrouping a product can expose new numbers (`sqrt(2)*sqrt(2)`) or new
/// products (`I**3`); the product is then rebuilt, at most this many times.
const MAX_REGROUP_DEPTH: usize = 4;

/// Creates the canonical product of `factors`.
pub(crate) fn mul(ctx: &mut Context, factors: &[ExprHandle]) -> ExprHandle {
    mul_at_depth(ctx, factors, 0)
}

fn mul_at_depth(ctx: &mut Context, factors: &[ExprHandle], depth: usize) -> ExprHandle {
    let mut flat: Vec<ExprHandle> = Vec::with_capacity(factors.len());
    for &f in factors {
        match ctx.node(f) {
            ExprNode::Mul(inner) => flat.extend(inner.iter().copied()),
            _ => flat.push(f),
        }
    }
    if flat.contains(&consts::NAN) {
        return consts::NAN;
    }

    let mut coeff = Rational::one();
    let mut real_infinity = false;
    let mut complex_infinity = false;
    // Exponents per base, in first-seen order.
    let mut order: Vec<ExprHandle> = Vec::new();
    let mut exponents: FxHashMap<ExprHandle, Vec<ExprHandle>> = FxHashMap::default();

    for f in flat {
        let (base, exp) = match ctx.node(f) {
            ExprNode::Number(n) => {
                coeff = coeff * n;
                continue;
            }
            ExprNode::Constant(Constant::Infinity) => {
                real_infinity = true;
                continue;
            }
            ExprNode::Constant(Constant::NegativeInfinity) => {
                real_infinity = true;
                coeff = -coeff;
                continue;
            }
            ExprNode::Constant(Constant::ComplexInfinity) => {
                complex_infinity = true;
                continue;
            }
            ExprNode::Pow { base, exp } => (*base, *exp),
            _ => (f, consts::ONE),
        };
        exponents
            .entry(base)
            .or_insert_with(|| {
                order.push(base);
                Vec::new()
            })
            .push(exp);
    }

    if coeff.is_zero() {
        return if real_infinity || complex_infinity {
            consts::NAN
        } else {
            consts::ZERO
        };
    }

    let mut out: Vec<ExprHandle> = Vec::with_capacity(order.len() + 1);
    let mut regroup = false;
    for base in order {
        let exps = exponents.remove(&base).unwrap_or_default();
        let combined = if exps.len() == 1 {
            let exp = exps[0];
            if exp == consts::ONE {
                out.push(base);
                continue;
            }
            exp
        } else {
            ctx.add(&exps)
        };
        let p = ctx.pow(base, combined);
        if p == consts::ONE {
            continue;
        }
        regroup |= match ctx.node(p) {
            ExprNode::Number(_) | ExprNode::Mul(_) => true,
            ExprNode::Constant(c) => c.is_infinite() || *c == Constant::NaN,
            _ => false,
        };
        out.push(p);
    }

    if regroup && depth < MAX_REGROUP_DEPTH {
        let mut again = out;
        again.push(ctx.number(coeff));
        if real_infinity {
            again.push(consts::INFINITY);
        }
        if complex_infinity {
            again.push(consts::COMPLEX_INFINITY);
        }
        return mul_at_depth(ctx, &again, depth + 1);
    }

    if complex_infinity {
        coeff = Rational::one();
        out.push(consts::COMPLEX_INFINITY);
    } else if real_infinity {
        if out.is_empty() {
            return if coeff.is_negative() {
                consts::NEG_INFINITY
            } else {
                consts::INFINITY
            };
        }
        coeff = Rational::from(i64::from(coeff.signum()));
        out.push(consts::INFINITY);
    }

    out.sort_unstable();
    match out.len() {
        0 => ctx.number(coeff),
        1 if coeff.is_one() => out[0],
        1 => distribute_or_build(ctx, coeff, out[0]),
        _ if coeff.is_one() => ctx.arena.intern(ExprNode::Mul(Terms::from_vec(out))),
        _ => {
            let c = ctx.number(coeff);
            let mut terms = Terms::with_capacity(out.len() + 1);
            terms.push(c);
            terms.extend(out);
            ctx.arena.intern(ExprNode::Mul(terms))
        }
    }
}

/// `c * (a + b)` becomes `c*a + c*b`; anything else is a plain product.
fn distribute_or_build(ctx: &mut Context, coeff: Rational, factor: ExprHandle) -> ExprHandle {
    let c = ctx.number(coeff);
    if let ExprNode::Add(terms) = ctx.node(factor).clone() {
        let scaled: Vec<ExprHandle> = terms.iter().map(|&t| ctx.mul(&[c, t])).collect();
        return ctx.add(&scaled);
    }
    ctx.arena.intern(ExprNode::Mul(smallvec::smallvec![c, factor]))
}
