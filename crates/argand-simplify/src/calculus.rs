//! Differentiation, substitution and evaluation of unevaluated derivatives.
//!
//! Derivatives of built-in functions come from the derivative hooks in the
//! rule table. A function without a hook, an undefined function, or a hook
//! that declines leaves an unevaluated `Derivative` node that [`Context::doit`]
//! can evaluate later, typically after [`Context::subs`] has replaced the
//! undefined function with something concrete.

use argand_core::{consts, ExprHandle, ExprNode, Func};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::context::Context;

impl Context {
    /// Differentiates `e` with respect to `var`.
    pub fn diff(&mut self, e: ExprHandle, var: ExprHandle) -> ExprHandle {
        debug!(expr = %self.display(e), var = %self.display(var), "diff");
        self.differentiate(e, var)
    }

    /// Creates the unevaluated derivative `d e / d var`.
    pub fn derivative(&mut self, e: ExprHandle, var: ExprHandle) -> ExprHandle {
        if e == consts::NAN {
            return consts::NAN;
        }
        self.arena.intern(ExprNode::Derivative { expr: e, var })
    }

    fn differentiate(&mut self, e: ExprHandle, var: ExprHandle) -> ExprHandle {
        if e == var {
            return consts::ONE;
        }
        if !self.arena.contains(e, var) {
            return consts::ZERO;
        }

        match self.node(e).clone() {
            ExprNode::Number(_) | ExprNode::Constant(_) | ExprNode::Symbol(_) => consts::ZERO,

            ExprNode::Add(terms) => {
                let parts: Vec<ExprHandle> =
                    terms.iter().map(|&t| self.differentiate(t, var)).collect();
                self.add(&parts)
            }

            // Product rule
            ExprNode::Mul(factors) => {
                let mut parts = Vec::with_capacity(factors.len());
                for (i, &f) in factors.iter().enumerate() {
                    let d = self.differentiate(f, var);
                    if d == consts::ZERO {
                        continue;
                    }
                    let mut product = factors.to_vec();
                    product[i] = d;
                    parts.push(self.mul(&product));
                }
                self.add(&parts)
            }

            ExprNode::Pow { base, exp } => self.diff_pow(e, base, exp, var),

            ExprNode::Apply { func, args } => {
                let hook = match func {
                    Func::Undefined(_) => None,
                    _ if args.len() == 1 => self.rules.derivative_hook(func),
                    _ => None,
                };
                let evaluated = hook.and_then(|hook| {
                    trace!(?func, "derivative hook used");
                    hook(self, &args, var)
                });
                evaluated.unwrap_or_else(|| self.derivative(e, var))
            }

            ExprNode::Derivative { .. } => self.derivative(e, var),
        }
    }

    fn diff_pow(
        &mut self,
        e: ExprHandle,
        base: ExprHandle,
        exp: ExprHandle,
        var: ExprHandle,
    ) -> ExprHandle {
        let base_varies = self.arena.contains(base, var);
        let exp_varies = self.arena.contains(exp, var);

        if !exp_varies {
            // d(b^n) = n * b^(n-1) * b'
            let db = self.differentiate(base, var);
            let n_minus_1 = self.add(&[exp, consts::NEG_ONE]);
            let lowered = self.pow(base, n_minus_1);
            return self.mul(&[exp, lowered, db]);
        }

        let de = self.differentiate(exp, var);
        let log_base = self.log(base);
        if !base_varies {
            // d(a^u) = a^u * log(a) * u'
            return self.mul(&[e, log_base, de]);
        }

        // d(b^u) = b^u * (u' * log(b) + u * b' / b)
        let db = self.differentiate(base, var);
        let t1 = self.mul(&[de, log_base]);
        let ratio = self.div(db, base);
        let t2 = self.mul(&[exp, ratio]);
        let inner = self.add(&[t1, t2]);
        self.mul(&[e, inner])
    }

    /// Replaces every occurrence of `old` in `e` with `new`, re-evaluating
    /// the rebuilt expression.
    pub fn subs(&mut self, e: ExprHandle, old: ExprHandle, new: ExprHandle) -> ExprHandle {
        let mut memo = FxHashMap::default();
        self.subs_rec(e, old, new, &mut memo)
    }

    fn subs_rec(
        &mut self,
        e: ExprHandle,
        old: ExprHandle,
        new: ExprHandle,
        memo: &mut FxHashMap<ExprHandle, ExprHandle>,
    ) -> ExprHandle {
        if e == old {
            return new;
        }
        if let Some(&done) = memo.get(&e) {
            return done;
        }
        let node = self.node(e).clone();
        if node.is_atom() {
            return e;
        }
        let children = node.children();
        let replaced: Vec<ExprHandle> = children
            .iter()
            .map(|&c| self.subs_rec(c, old, new, memo))
            .collect();
        let result = if replaced.as_slice() == children.as_slice() {
            e
        } else {
            self.rebuild(&node, &replaced)
        };
        memo.insert(e, result);
        result
    }

    /// Evaluates every `Derivative` node in `e`, innermost first.
    pub fn doit(&mut self, e: ExprHandle) -> ExprHandle {
        let mut memo = FxHashMap::default();
        self.doit_rec(e, &mut memo)
    }

    fn doit_rec(&mut self, e: ExprHandle, memo: &mut FxHashMap<ExprHandle, ExprHandle>) -> ExprHandle {
        if let Some(&done) = memo.get(&e) {
            return done;
        }
        let node = self.node(e).clone();
        if node.is_atom() {
            return e;
        }
        let children = node.children();
        let evaluated: Vec<ExprHandle> = children.iter().map(|&c| self.doit_rec(c, memo)).collect();
        let result = match node {
            ExprNode::Derivative { .. } => self.diff(evaluated[0], evaluated[1]),
            _ if evaluated.as_slice() == children.as_slice() => e,
            _ => self.rebuild(&node, &evaluated),
        };
        memo.insert(e, result);
        result
    }
}
