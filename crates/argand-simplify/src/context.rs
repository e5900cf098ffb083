//! The evaluation context.
//!
//! A [`Context`] owns the expression arena, the assumption cache and the
//! rule table. All construction goes through it so that every handle it
//! returns is already in canonical form.

use argand_assume::FactEngine;
use argand_core::{
    consts, Args, ExprArena, ExprDisplay, ExprHandle, ExprNode, FactError, FactSet, Func,
    Predicate, Truth,
};
use argand_integers::{Integer, Rational};
use tracing::trace;

use crate::rules::{self, RuleTable};
use crate::trig::{TrigConfig, TrigExpander};

/// Owner of all expressions and the rules that evaluate them.
#[derive(Clone)]
pub struct Context {
    pub(crate) arena: ExprArena,
    pub(crate) facts: FactEngine,
    pub(crate) rules: RuleTable,
    pub(crate) trig: TrigExpander,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context with the standard rule table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(RuleTable::standard())
    }

    /// Creates a context with a custom rule table.
    #[must_use]
    pub fn with_rules(rules: RuleTable) -> Self {
        Self {
            arena: ExprArena::new(),
            facts: FactEngine::new(),
            rules,
            trig: TrigExpander::default(),
        }
    }

    /// Replaces the limits used by trigonometric expansion.
    #[must_use]
    pub fn with_trig_config(mut self, config: TrigConfig) -> Self {
        self.trig = TrigExpander::with_config(config);
        self
    }

    /// Returns the underlying arena.
    #[must_use]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Returns the rule table.
    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Returns the rule table for registering additional rules.
    pub fn rules_mut(&mut self) -> &mut RuleTable {
        &mut self.rules
    }

    /// Returns the node behind a handle.
    #[must_use]
    pub fn node(&self, h: ExprHandle) -> &ExprNode {
        self.arena.get(h)
    }

    /// Returns a printable view of `h`.
    #[must_use]
    pub fn display(&self, h: ExprHandle) -> ExprDisplay<'_> {
        self.arena.display(h)
    }

    // === Atoms ===

    /// Creates a symbol with no assumptions.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        self.arena.symbol(name, FactSet::new())
    }

    /// Creates a symbol with declared assumptions.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::Contradiction`] if the declarations are
    /// inconsistent, e.g. `positive` together with `negative`.
    pub fn symbol_with(
        &mut self,
        name: &str,
        facts: impl IntoIterator<Item = (Predicate, bool)>,
    ) -> Result<ExprHandle, FactError> {
        let facts = FactSet::from_pairs(facts)?;
        Ok(self.arena.symbol(name, facts))
    }

    /// Creates a symbol from `(predicate name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::UnknownPredicate`] for an unrecognised name and
    /// [`FactError::Contradiction`] for inconsistent declarations.
    pub fn symbol_named_facts<'a>(
        &mut self,
        name: &str,
        facts: impl IntoIterator<Item = (&'a str, bool)>,
    ) -> Result<ExprHandle, FactError> {
        let facts = FactSet::parse_pairs(facts)?;
        Ok(self.arena.symbol(name, facts))
    }

    /// Creates an integer.
    pub fn integer(&mut self, n: i64) -> ExprHandle {
        self.arena.integer(n)
    }

    /// Creates the rational `num/den`.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    pub fn rational(&mut self, num: i64, den: i64) -> ExprHandle {
        self.arena.number(Rational::from_i64(num, den))
    }

    /// Creates a number node.
    pub fn number(&mut self, value: Rational) -> ExprHandle {
        self.arena.number(value)
    }

    /// The imaginary unit.
    #[must_use]
    pub fn i(&self) -> ExprHandle {
        consts::I
    }

    /// `pi`.
    #[must_use]
    pub fn pi(&self) -> ExprHandle {
        consts::PI
    }

    /// Euler's number.
    #[must_use]
    pub fn e(&self) -> ExprHandle {
        consts::E
    }

    /// `oo`.
    #[must_use]
    pub fn infinity(&self) -> ExprHandle {
        consts::INFINITY
    }

    /// `-oo`.
    #[must_use]
    pub fn neg_infinity(&self) -> ExprHandle {
        consts::NEG_INFINITY
    }

    /// `zoo`.
    #[must_use]
    pub fn complex_infinity(&self) -> ExprHandle {
        consts::COMPLEX_INFINITY
    }

    /// `nan`.
    #[must_use]
    pub fn nan(&self) -> ExprHandle {
        consts::NAN
    }

    // === Assumptions ===

    /// Returns the closed facts of `h`.
    pub fn facts(&mut self, h: ExprHandle) -> FactSet {
        self.facts.facts(&self.arena, h)
    }

    /// Queries one predicate of `h`.
    pub fn ask(&mut self, h: ExprHandle, predicate: Predicate) -> Truth {
        self.facts.ask(&self.arena, h, predicate)
    }

    /// Returns true if `predicate` provably holds for `h`.
    pub fn is(&mut self, h: ExprHandle, predicate: Predicate) -> bool {
        self.ask(h, predicate).is_true()
    }

    // === Arithmetic ===

    /// Creates the canonical sum of `terms`.
    pub fn add(&mut self, terms: &[ExprHandle]) -> ExprHandle {
        rules::add::add(self, terms)
    }

    /// Creates `a - b`.
    pub fn sub(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let neg_b = self.neg(b);
        self.add(&[a, neg_b])
    }

    /// Creates `-a`.
    pub fn neg(&mut self, a: ExprHandle) -> ExprHandle {
        self.mul(&[consts::NEG_ONE, a])
    }

    /// Creates the canonical product of `factors`.
    pub fn mul(&mut self, factors: &[ExprHandle]) -> ExprHandle {
        rules::mul::mul(self, factors)
    }

    /// Creates `a / b`.
    pub fn div(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let inv = self.pow(b, consts::NEG_ONE);
        self.mul(&[a, inv])
    }

    /// Creates `base ** exp`.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        rules::pow::pow(self, base, exp)
    }

    /// Creates `base ** n` for an integer `n`.
    pub fn powi(&mut self, base: ExprHandle, n: i64) -> ExprHandle {
        let exp = self.integer(n);
        self.pow(base, exp)
    }

    /// Creates `sqrt(a)`.
    pub fn sqrt(&mut self, a: ExprHandle) -> ExprHandle {
        self.pow(a, consts::HALF)
    }

    // === Functions ===

    /// Applies `func` to `args`, running its registered rewrite rules.
    ///
    /// Built-in kinds take exactly one argument; any other arity leaves the
    /// application unevaluated.
    pub fn apply(&mut self, func: Func, args: &[ExprHandle]) -> ExprHandle {
        let builtin = !matches!(func, Func::Undefined(_));
        if builtin {
            if args.len() != 1 {
                return self.intern_apply(func, args);
            }
            if args[0] == consts::NAN {
                return consts::NAN;
            }
        }

        let mut index = 0;
        while let Some(rule) = self.rules.eval_rule(func, index) {
            if let Some(result) = (rule.apply)(self, args) {
                trace!(rule = rule.name, ?func, "rewrite rule fired");
                return result;
            }
            index += 1;
        }
        self.intern_apply(func, args)
    }

    /// Applies an undefined function `name` to `args`.
    pub fn function(&mut self, name: &str, args: &[ExprHandle]) -> ExprHandle {
        let id = self.arena.function_id(name);
        self.apply(Func::Undefined(id), args)
    }

    pub(crate) fn intern_apply(&mut self, func: Func, args: &[ExprHandle]) -> ExprHandle {
        self.arena.intern(ExprNode::Apply {
            func,
            args: Args::from_slice(args),
        })
    }

    /// `exp(a)`.
    pub fn exp(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Exp, &[a])
    }

    /// `log(a)`.
    pub fn log(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Log, &[a])
    }

    /// `sin(a)`.
    pub fn sin(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Sin, &[a])
    }

    /// `cos(a)`.
    pub fn cos(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Cos, &[a])
    }

    /// `atan(a)`.
    pub fn atan(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Atan, &[a])
    }

    /// The real part of `a`.
    pub fn re(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Re, &[a])
    }

    /// The imaginary part of `a`.
    pub fn im(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Im, &[a])
    }

    /// The complex sign of `a`.
    pub fn sign(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Sign, &[a])
    }

    /// The absolute value of `a`.
    pub fn abs(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Abs, &[a])
    }

    /// The argument (phase angle) of `a`.
    pub fn arg(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Arg, &[a])
    }

    /// The complex conjugate of `a`.
    pub fn conjugate(&mut self, a: ExprHandle) -> ExprHandle {
        self.apply(Func::Conjugate, &[a])
    }

    // === Structure ===

    /// Rebuilds `node` with new children through the evaluating
    /// constructors.
    ///
    /// `children` must be in the order of [`ExprNode::children`].
    pub fn rebuild(&mut self, node: &ExprNode, children: &[ExprHandle]) -> ExprHandle {
        match node {
            ExprNode::Number(_) | ExprNode::Constant(_) | ExprNode::Symbol(_) => {
                self.arena.intern(node.clone())
            }
            ExprNode::Add(_) => self.add(children),
            ExprNode::Mul(_) => self.mul(children),
            ExprNode::Pow { .. } => self.pow(children[0], children[1]),
            ExprNode::Apply { func, .. } => self.apply(*func, children),
            ExprNode::Derivative { .. } => self.derivative(children[0], children[1]),
        }
    }

    /// Splits a term into its rational coefficient and the rest.
    ///
    /// `3*x*y` gives `(3, x*y)`, `x` gives `(1, x)` and a bare number gives
    /// `(n, 1)`.
    pub(crate) fn split_coefficient(&mut self, h: ExprHandle) -> (Rational, ExprHandle) {
        match self.arena.get(h).clone() {
            ExprNode::Number(n) => (n, consts::ONE),
            ExprNode::Mul(factors) => match self.arena.as_number(factors[0]).cloned() {
                Some(c) => {
                    let rest = &factors[1..];
                    let rest = if rest.len() == 1 {
                        rest[0]
                    } else {
                        self.arena.intern(ExprNode::Mul(rest.iter().copied().collect()))
                    };
                    (c, rest)
                }
                None => (Rational::from(1), h),
            },
            _ => (Rational::from(1), h),
        }
    }

    /// Returns `-h` if `h` carries an explicit minus sign.
    pub(crate) fn extract_minus_sign(&mut self, h: ExprHandle) -> Option<ExprHandle> {
        if h == consts::NEG_INFINITY {
            return Some(consts::INFINITY);
        }
        let (coeff, _) = self.split_coefficient(h);
        coeff.is_negative().then(|| self.neg(h))
    }

    /// Returns the integer value of a number node that fits in an `i64`.
    pub(crate) fn as_i64(&self, h: ExprHandle) -> Option<i64> {
        self.arena.as_number(h).and_then(Rational::to_i64)
    }

    /// Returns the exact integer of a number node.
    pub(crate) fn as_integer(&self, h: ExprHandle) -> Option<Integer> {
        self.arena.as_number(h).and_then(Rational::to_integer)
    }

    /// Returns true if `h` contains an unevaluated `re` or `im`.
    pub(crate) fn has_complex_parts(&self, h: ExprHandle) -> bool {
        self.arena.any_node(h, &mut |_, node| {
            matches!(
                node,
                ExprNode::Apply {
                    func: Func::Re | Func::Im,
                    ..
                }
            )
        })
    }
}
