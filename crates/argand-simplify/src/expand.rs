//! Structural expansion.
//!
//! [`Context::expand`] rewrites an expression according to a set of
//! [`ExpandHints`]. With `deep` set, children are expanded before their
//! parent; each node is then rewritten by the first applicable pass, in the
//! order trig, complex, mul, multinomial, power_exp, log, and the result is
//! expanded again until nothing changes.
//!
//! When both `trig` and `complex` are requested, the whole tree is first
//! expanded without `complex` and then without `trig`, so angle sums are
//! split before their arguments are decomposed into real and imaginary
//! parts.

use argand_core::{consts, ExprHandle, ExprNode, Func, Predicate};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::context::Context;
use crate::functions::complexes::function_parts;

/// Bound on how often a node is re-expanded after a pass changed it.
const MAX_EXPAND_ROUNDS: usize = 8;

/// Largest exponent for which `(a + b)**n` is multiplied out.
const MAX_MULTINOMIAL_EXPONENT: i64 = 32;

/// Options for [`Context::expand`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExpandHints {
    /// Distribute products over sums: `x*(y + 1)` becomes `x*y + x`.
    pub mul: bool,
    /// Multiply out positive integer powers of sums.
    pub multinomial: bool,
    /// Split sums in exponents: `b**(x + y)` becomes `b**x*b**y`.
    pub power_exp: bool,
    /// Split powers of products where valid.
    ///
    /// The power constructor already performs every valid split, so this
    /// hint is satisfied by construction.
    pub power_base: bool,
    /// Split logarithms of products with positive factors and of powers of
    /// positive bases.
    pub log: bool,
    /// Decompose into real and imaginary parts.
    pub complex: bool,
    /// Expand `sin` and `cos` of sums and integer multiples.
    pub trig: bool,
    /// Expand children before their parent.
    pub deep: bool,
}

impl Default for ExpandHints {
    fn default() -> Self {
        Self {
            mul: true,
            multinomial: true,
            power_exp: true,
            power_base: true,
            log: true,
            complex: false,
            trig: false,
            deep: true,
        }
    }
}

impl ExpandHints {
    /// All hints switched off.
    #[must_use]
    pub fn none() -> Self {
        Self {
            mul: false,
            multinomial: false,
            power_exp: false,
            power_base: false,
            log: false,
            complex: false,
            trig: false,
            deep: false,
        }
    }

    /// Sets the `mul` hint.
    #[must_use]
    pub fn with_mul(mut self, on: bool) -> Self {
        self.mul = on;
        self
    }

    /// Sets the `multinomial` hint.
    #[must_use]
    pub fn with_multinomial(mut self, on: bool) -> Self {
        self.multinomial = on;
        self
    }

    /// Sets the `power_exp` hint.
    #[must_use]
    pub fn with_power_exp(mut self, on: bool) -> Self {
        self.power_exp = on;
        self
    }

    /// Sets the `power_base` hint.
    #[must_use]
    pub fn with_power_base(mut self, on: bool) -> Self {
        self.power_base = on;
        self
    }

    /// Sets the `log` hint.
    #[must_use]
    pub fn with_log(mut self, on: bool) -> Self {
        self.log = on;
        self
    }

    /// Sets the `complex` hint.
    #[must_use]
    pub fn with_complex(mut self, on: bool) -> Self {
        self.complex = on;
        self
    }

    /// Sets the `trig` hint.
    #[must_use]
    pub fn with_trig(mut self, on: bool) -> Self {
        self.trig = on;
        self
    }

    /// Sets the `deep` hint.
    #[must_use]
    pub fn with_deep(mut self, on: bool) -> Self {
        self.deep = on;
        self
    }
}

/// `arg` and `sign` have no rectangular form, so complex expansion leaves
/// their arguments alone.
fn keeps_argument(node: &ExprNode) -> bool {
    matches!(
        node,
        ExprNode::Apply {
            func: Func::Arg | Func::Sign,
            ..
        }
    )
}

impl Context {
    /// Expands `e` according to `hints`.
    pub fn expand(&mut self, e: ExprHandle, hints: &ExpandHints) -> ExprHandle {
        debug!(expr = %self.display(e), ?hints, "expand");
        if hints.trig && hints.complex {
            let first = self.expand_tree(e, &hints.with_complex(false));
            return self.expand_tree(first, &hints.with_trig(false));
        }
        self.expand_tree(e, hints)
    }

    fn expand_tree(&mut self, e: ExprHandle, hints: &ExpandHints) -> ExprHandle {
        let mut memo = FxHashMap::default();
        self.expand_rec(e, hints, &mut memo, 0)
    }

    fn expand_rec(
        &mut self,
        e: ExprHandle,
        hints: &ExpandHints,
        memo: &mut FxHashMap<ExprHandle, ExprHandle>,
        round: usize,
    ) -> ExprHandle {
        if let Some(&done) = memo.get(&e) {
            return done;
        }
        // Reaching `e` again below it returns `e` unchanged.
        memo.insert(e, e);

        let node = self.node(e).clone();
        let descend = hints.deep && !node.is_atom() && !(hints.complex && keeps_argument(&node));
        let rebuilt = if descend {
            let children = node.children();
            let expanded: Vec<ExprHandle> = children
                .iter()
                .map(|&c| self.expand_rec(c, hints, memo, round))
                .collect();
            if expanded.as_slice() == children.as_slice() {
                e
            } else {
                self.rebuild(&node, &expanded)
            }
        } else {
            e
        };

        let result = match self.expand_node(rebuilt, hints) {
            Some(next) if next != rebuilt && round < MAX_EXPAND_ROUNDS => {
                self.expand_rec(next, hints, memo, round + 1)
            }
            Some(next) => next,
            None => rebuilt,
        };
        memo.insert(e, result);
        result
    }

    /// Applies the first pass that changes `h`.
    fn expand_node(&mut self, h: ExprHandle, hints: &ExpandHints) -> Option<ExprHandle> {
        if hints.trig {
            let trig = self.trig.clone();
            if let Some(r) = trig.expand(self, h) {
                return Some(r);
            }
        }
        if hints.complex {
            if let Some(r) = self.expand_complex(h) {
                return Some(r);
            }
        }
        if hints.mul {
            if let Some(r) = self.expand_mul(h) {
                return Some(r);
            }
        }
        if hints.multinomial {
            if let Some(r) = self.expand_multinomial(h) {
                return Some(r);
            }
        }
        if hints.power_exp {
            if let Some(r) = self.expand_power_exp(h) {
                return Some(r);
            }
        }
        if hints.log {
            if let Some(r) = self.expand_log(h) {
                return Some(r);
            }
        }
        None
    }

    /// `re(z) + I*im(z)` for `z` not known to be real.
    fn rectangular(&mut self, re: ExprHandle, im: ExprHandle) -> ExprHandle {
        let i_im = self.mul(&[consts::I, im]);
        self.add(&[re, i_im])
    }

    fn expand_complex(&mut self, h: ExprHandle) -> Option<ExprHandle> {
        let node = self.node(h).clone();
        match &node {
            // Built-ins of the wrong arity stay as they are.
            ExprNode::Apply { func, args }
                if args.len() != 1 && !matches!(func, Func::Undefined(_)) =>
            {
                return None;
            }
            // Abs(w) = sqrt(re(w)**2 + im(w)**2)
            ExprNode::Apply {
                func: Func::Abs,
                args,
            } => {
                let w = args[0];
                if self.is(w, Predicate::Real) {
                    return None;
                }
                let (re, im) = (self.re(w), self.im(w));
                let re2 = self.powi(re, 2);
                let im2 = self.powi(im, 2);
                let sum = self.add(&[re2, im2]);
                return Some(self.sqrt(sum)).filter(|&r| r != h);
            }
            ExprNode::Apply {
                func: Func::Re | Func::Im | Func::Arg | Func::Sign,
                ..
            } => return None,
            _ => {}
        }
        if self.is(h, Predicate::Real) {
            return None;
        }
        let result = match node {
            ExprNode::Symbol(_)
            | ExprNode::Apply {
                func: Func::Undefined(_),
                ..
            } => {
                let (re, im) = (self.re(h), self.im(h));
                self.rectangular(re, im)
            }
            ExprNode::Apply {
                func: Func::Conjugate,
                args,
            } => {
                let (re, im) = (self.re(args[0]), self.im(args[0]));
                let neg_im = self.neg(im);
                self.rectangular(re, neg_im)
            }
            ExprNode::Apply { .. } => {
                let (re, im) = function_parts(self, h, true)?;
                self.rectangular(re, im)
            }
            _ => return None,
        };
        (result != h).then_some(result)
    }

    /// Distributes a product over its first sum factor.
    fn expand_mul(&mut self, h: ExprHandle) -> Option<ExprHandle> {
        let ExprNode::Mul(factors) = self.node(h).clone() else {
            return None;
        };
        let pos = factors
            .iter()
            .position(|&f| matches!(self.node(f), ExprNode::Add(_)))?;
        let ExprNode::Add(terms) = self.node(factors[pos]).clone() else {
            return None;
        };
        let mut rest = factors.to_vec();
        rest.remove(pos);
        let products: Vec<ExprHandle> = terms
            .iter()
            .map(|&t| {
                let mut p = rest.clone();
                p.push(t);
                self.mul(&p)
            })
            .collect();
        Some(self.add(&products))
    }

    fn expand_multinomial(&mut self, h: ExprHandle) -> Option<ExprHandle> {
        let ExprNode::Pow { base, exp } = *self.node(h) else {
            return None;
        };
        let ExprNode::Add(terms) = self.node(base).clone() else {
            return None;
        };
        let n = self
            .as_i64(exp)
            .filter(|n| (2..=MAX_MULTINOMIAL_EXPONENT).contains(n))?;

        let mut acc: Vec<ExprHandle> = terms.to_vec();
        for _ in 1..n {
            let mut next = Vec::with_capacity(acc.len() * terms.len());
            for &a in &acc {
                for &t in &terms {
                    next.push(self.mul(&[a, t]));
                }
            }
            let sum = self.add(&next);
            acc = match self.node(sum) {
                ExprNode::Add(collected) => collected.to_vec(),
                _ => vec![sum],
            };
        }
        Some(self.add(&acc))
    }

    fn expand_power_exp(&mut self, h: ExprHandle) -> Option<ExprHandle> {
        match self.node(h).clone() {
            // b**(x + y) = b**x * b**y
            ExprNode::Pow { base, exp } => {
                let ExprNode::Add(terms) = self.node(exp).clone() else {
                    return None;
                };
                let parts: Vec<ExprHandle> = terms.iter().map(|&t| self.pow(base, t)).collect();
                Some(self.mul(&parts))
            }
            // exp(x + y) = exp(x) * exp(y)
            ExprNode::Apply {
                func: Func::Exp,
                args,
            } if args.len() == 1 => {
                let ExprNode::Add(terms) = self.node(args[0]).clone() else {
                    return None;
                };
                let parts: Vec<ExprHandle> = terms.iter().map(|&t| self.exp(t)).collect();
                Some(self.mul(&parts))
            }
            _ => None,
        }
    }

    fn expand_log(&mut self, h: ExprHandle) -> Option<ExprHandle> {
        let ExprNode::Apply {
            func: Func::Log,
            args,
        } = self.node(h).clone()
        else {
            return None;
        };
        let &[arg] = args.as_slice() else {
            return None;
        };
        match self.node(arg).clone() {
            // log(p*z) = log(p) + log(z) for positive p
            ExprNode::Mul(factors) => {
                let (positive, rest): (Vec<ExprHandle>, Vec<ExprHandle>) = factors
                    .iter()
                    .partition(|&&f| self.is(f, Predicate::Positive));
                if positive.is_empty() {
                    return None;
                }
                let mut logs: Vec<ExprHandle> = positive.iter().map(|&p| self.log(p)).collect();
                if !rest.is_empty() {
                    let rest = self.mul(&rest);
                    logs.push(self.log(rest));
                }
                Some(self.add(&logs))
            }
            // log(b**e) = e*log(b) for positive b and real e
            ExprNode::Pow { base, exp } => {
                if !(self.is(base, Predicate::Positive) && self.is(exp, Predicate::Real)) {
                    return None;
                }
                let l = self.log(base);
                Some(self.mul(&[exp, l]))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_builder() {
        let hints = ExpandHints::default();
        assert!(hints.mul && hints.deep && !hints.complex && !hints.trig);
        let hints = ExpandHints::none().with_complex(true);
        assert!(hints.complex && !hints.mul);
    }

    #[test]
    fn test_distribution() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let y1 = ctx.add(&[y, consts::ONE]);
        let p = ctx.mul(&[x, y1]);
        let e = ctx.expand(p, &ExpandHints::default());
        let xy = ctx.mul(&[x, y]);
        assert_eq!(e, ctx.add(&[xy, x]));
    }

    #[test]
    fn test_multinomial() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let x1 = ctx.add(&[x, consts::ONE]);
        let sq = ctx.powi(x1, 2);
        let e = ctx.expand(sq, &ExpandHints::default());
        assert_eq!(ctx.display(e).to_string(), "x**2 + 2*x + 1");
    }

    #[test]
    fn test_power_exp() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let s = ctx.add(&[x, y]);
        let e = ctx.exp(s);
        let expanded = ctx.expand(e, &ExpandHints::default());
        let (ex, ey) = (ctx.exp(x), ctx.exp(y));
        assert_eq!(expanded, ctx.mul(&[ex, ey]));
    }

    #[test]
    fn test_log_of_positive_product() {
        let mut ctx = Context::new();
        let p = ctx.symbol_with("p", [(Predicate::Positive, true)]).unwrap();
        let x = ctx.symbol("x");
        let px = ctx.mul(&[p, x]);
        let l = ctx.log(px);
        let e = ctx.expand(l, &ExpandHints::default());
        let (lp, lx) = (ctx.log(p), ctx.log(x));
        assert_eq!(e, ctx.add(&[lp, lx]));
    }

    #[test]
    fn test_complex_decomposition_of_symbol() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let e = ctx.expand(x, &ExpandHints::default().with_complex(true));
        let (re, im) = (ctx.re(x), ctx.im(x));
        let i_im = ctx.mul(&[consts::I, im]);
        assert_eq!(e, ctx.add(&[re, i_im]));
        assert_eq!(ctx.display(e).to_string(), "re(x) + I*im(x)");
    }

    #[test]
    fn test_complex_abs() {
        let mut ctx = Context::new();
        let hints = ExpandHints::default().with_complex(true);

        let r = ctx.symbol_with("r", [(Predicate::Real, true)]).unwrap();
        let abs_r = ctx.abs(r);
        assert_eq!(ctx.expand(abs_r, &hints), abs_r);

        let x = ctx.symbol("x");
        let abs_x = ctx.abs(x);
        let e = ctx.expand(abs_x, &hints);
        assert_eq!(ctx.display(e).to_string(), "sqrt(re(x)**2 + im(x)**2)");
    }

    #[test]
    fn test_complex_parts_are_fixed_points() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let hints = ExpandHints::default().with_complex(true);

        let re_x = ctx.re(x);
        assert_eq!(ctx.expand(re_x, &hints), re_x);

        let im_x = ctx.im(x);
        let sum = ctx.add(&[re_x, im_x, x]);
        let i_im = ctx.mul(&[consts::I, im_x]);
        let expected = ctx.add(&[re_x, im_x, re_x, i_im]);
        assert_eq!(ctx.expand(sum, &hints), expected);
    }

    #[test]
    fn test_none_is_identity() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let x1 = ctx.add(&[x, consts::ONE]);
        let sq = ctx.powi(x1, 2);
        assert_eq!(ctx.expand(sq, &ExpandHints::none()), sq);
    }
}
