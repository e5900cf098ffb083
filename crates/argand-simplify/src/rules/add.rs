//! Canonical sums.
//!
//! A canonical `Add` is flat, holds at most one number (first, and never
//! zero), has no two terms that differ only by a rational coefficient, and
//! keeps the remaining terms sorted by handle.

use argand_core::{consts, Constant, ExprHandle, ExprNode, Terms};
use argand_integers::Rational;
use num_traits::Zero;
use rustc_hash::FxHashMap;

use crate::context::Context;

/// Infinite terms seen while folding a sum.
#[derive(Default)]
struct Infinities {
    positive: bool,
    negative: bool,
    complex: usize,
}

impl Infinities {
    /// `oo - oo`, `zoo + zoo` and `zoo + oo` are undefined.
    fn is_undefined(&self) -> bool {
        let real = self.positive || self.negative;
        (self.positive && self.negative) || self.complex > 1 || (self.complex == 1 && real)
    }

    fn constant(&self) -> Option<ExprHandle> {
        if self.complex > 0 {
            Some(consts::COMPLEX_INFINITY)
        } else if self.positive {
            Some(consts::INFINITY)
        } else if self.negative {
            Some(consts::NEG_INFINITY)
        } else {
            None
        }
    }
}

/// Creates the canonical sum of `terms`.
pub(crate) fn add(ctx: &mut Context, terms: &[ExprHandle]) -> ExprHandle {
    let mut flat: Vec<ExprHandle> = Vec::with_capacity(terms.len());
    for &t in terms {
        match ctx.node(t) {
            ExprNode::Add(inner) => flat.extend(inner.iter().copied()),
            _ => flat.push(t),
        }
    }
    if flat.contains(&consts::NAN) {
        return consts::NAN;
    }

    let mut number = Rational::zero();
    let mut infinities = Infinities::default();
    // Coefficient per term, in first-seen order.
    let mut order: Vec<ExprHandle> = Vec::new();
    let mut coeffs: FxHashMap<ExprHandle, Rational> = FxHashMap::default();

    for t in flat {
        match ctx.node(t) {
            ExprNode::Number(n) => {
                number = number + n;
                continue;
            }
            ExprNode::Constant(Constant::Infinity) => {
                infinities.positive = true;
                continue;
            }
            ExprNode::Constant(Constant::NegativeInfinity) => {
                infinities.negative = true;
                continue;
            }
            ExprNode::Constant(Constant::ComplexInfinity) => {
                infinities.complex += 1;
                continue;
            }
            _ => {}
        }
        let (c, rest) = ctx.split_coefficient(t);
        match coeffs.get_mut(&rest) {
            Some(sum) => *sum = &*sum + &c,
            None => {
                order.push(rest);
                coeffs.insert(rest, c);
            }
        }
    }

    if infinities.is_undefined() {
        return consts::NAN;
    }

    let mut out: Vec<ExprHandle> = Vec::with_capacity(order.len() + 1);
    for rest in order {
        let Some(c) = coeffs.remove(&rest) else {
            continue;
        };
        if c.is_zero() {
            continue;
        }
        let term = if c == Rational::from(1) {
            rest
        } else {
            let c = ctx.number(c);
            ctx.mul(&[c, rest])
        };
        match ctx.node(term) {
            ExprNode::Number(n) => number = number + n,
            _ => out.push(term),
        }
    }

    if let Some(inf) = infinities.constant() {
        // Finite numbers are absorbed by the infinity.
        number = Rational::zero();
        out.push(inf);
    }

    out.sort_unstable();
    match (number.is_zero(), out.len()) {
        (_, 0) => ctx.number(number),
        (true, 1) => out[0],
        (true, _) => ctx.arena.intern(ExprNode::Add(Terms::from_vec(out))),
        (false, _) => {
            let n = ctx.number(number);
            let mut terms = Terms::with_capacity(out.len() + 1);
            terms.push(n);
            terms.extend(out);
            ctx.arena.intern(ExprNode::Add(terms))
        }
    }
}
