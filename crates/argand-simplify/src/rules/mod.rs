//! Canonicalization of arithmetic and the per-function rule table.
//!
//! Sums, products and powers are normalized by the constructors in
//! [`add`], [`mul`] and [`pow`]. Function applications are normalized by
//! the [`RuleTable`]: for each function kind it holds an ordered list of
//! named rewrite rules, tried in order until one returns a result, and a
//! set of hooks that other operations consult (real/imaginary split,
//! conjugation, powers, differentiation).

pub mod add;
pub mod mul;
pub mod pow;

use argand_core::{ExprHandle, Func};
use rustc_hash::FxHashMap;

use crate::context::Context;
use crate::functions;

/// A rewrite rule for a function application.
///
/// Returns `None` when the rule does not match the arguments.
pub type RuleFn = fn(&mut Context, &[ExprHandle]) -> Option<ExprHandle>;

/// Splits `f(args)` into real and imaginary parts.
///
/// `forced` is set by complex expansion, which asks for a decomposition
/// even when it is not considered simpler.
pub type RealImagHook = fn(&mut Context, &[ExprHandle], bool) -> Option<(ExprHandle, ExprHandle)>;

/// Computes `conjugate(f(args))`.
pub type ConjugateHook = fn(&mut Context, &[ExprHandle]) -> Option<ExprHandle>;

/// Computes `f(args) ** exp`.
pub type PowerHook = fn(&mut Context, &[ExprHandle], ExprHandle) -> Option<ExprHandle>;

/// Computes `d f(args) / d var`, chain rule included.
pub type DerivativeHook = fn(&mut Context, &[ExprHandle], ExprHandle) -> Option<ExprHandle>;

/// A named rewrite rule.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Name reported when the rule fires.
    pub name: &'static str,
    /// The rewrite.
    pub apply: RuleFn,
}

impl Rule {
    /// Creates a rule.
    #[must_use]
    pub const fn new(name: &'static str, apply: RuleFn) -> Self {
        Self { name, apply }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// Everything registered for one function kind.
#[derive(Clone, Default)]
pub struct FuncRules {
    /// Evaluation rules, tried in order.
    pub eval: Vec<Rule>,
    /// Real/imaginary decomposition.
    pub real_imag: Option<RealImagHook>,
    /// Conjugation.
    pub conjugate: Option<ConjugateHook>,
    /// Powers of the application.
    pub power: Option<PowerHook>,
    /// Differentiation.
    pub derivative: Option<DerivativeHook>,
}

impl std::fmt::Debug for FuncRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuncRules")
            .field("eval", &self.eval)
            .field("real_imag", &self.real_imag.is_some())
            .field("conjugate", &self.conjugate.is_some())
            .field("power", &self.power.is_some())
            .field("derivative", &self.derivative.is_some())
            .finish()
    }
}

/// The registration table mapping function kinds to their rules.
#[derive(Clone, Default, Debug)]
pub struct RuleTable {
    funcs: FxHashMap<Func, FuncRules>,
}

impl RuleTable {
    /// Creates an empty table: every application stays unevaluated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the table with the complex-part and elementary functions.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        functions::complexes::register(&mut table);
        functions::elementary::register(&mut table);
        table
    }

    /// Returns the entry for `func`, creating an empty one if needed.
    pub fn entry(&mut self, func: Func) -> &mut FuncRules {
        self.funcs.entry(func).or_default()
    }

    /// Appends an evaluation rule for `func`.
    pub fn register(&mut self, func: Func, rule: Rule) {
        self.entry(func).eval.push(rule);
    }

    /// Returns the entry for `func`, if any.
    #[must_use]
    pub fn get(&self, func: Func) -> Option<&FuncRules> {
        self.funcs.get(&func)
    }

    /// Returns the `index`-th evaluation rule of `func`.
    #[must_use]
    pub fn eval_rule(&self, func: Func, index: usize) -> Option<Rule> {
        self.get(func).and_then(|r| r.eval.get(index).copied())
    }

    /// Returns the names of the evaluation rules of `func`, in order.
    #[must_use]
    pub fn rule_names(&self, func: Func) -> Vec<&'static str> {
        self.get(func)
            .map(|r| r.eval.iter().map(|rule| rule.name).collect())
            .unwrap_or_default()
    }

    pub(crate) fn real_imag_hook(&self, func: Func) -> Option<RealImagHook> {
        self.get(func).and_then(|r| r.real_imag)
    }

    pub(crate) fn conjugate_hook(&self, func: Func) -> Option<ConjugateHook> {
        self.get(func).and_then(|r| r.conjugate)
    }

    pub(crate) fn power_hook(&self, func: Func) -> Option<PowerHook> {
        self.get(func).and_then(|r| r.power)
    }

    pub(crate) fn derivative_hook(&self, func: Func) -> Option<DerivativeHook> {
        self.get(func).and_then(|r| r.derivative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argand_core::consts;

    fn always_zero(_: &mut Context, _: &[ExprHandle]) -> Option<ExprHandle> {
        Some(consts::ZERO)
    }

    #[test]
    fn test_standard_table_orders_rules() {
        let table = RuleTable::standard();
        let names = table.rule_names(Func::Re);
        assert!(!names.is_empty());
        assert!(table.get(Func::Abs).and_then(|r| r.power).is_some());
        assert!(table.get(Func::Undefined(0)).is_none());
    }

    #[test]
    fn test_registered_rule_applies_to_undefined_function() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let id = ctx.arena.function_id("g");
        ctx.rules_mut()
            .register(Func::Undefined(id), Rule::new("g-is-zero", always_zero));

        assert_eq!(ctx.function("g", &[x]), consts::ZERO);
        let f = ctx.function("f", &[x]);
        assert_ne!(f, consts::ZERO);
    }

    #[test]
    fn test_empty_table_leaves_everything_unevaluated() {
        let mut ctx = Context::with_rules(RuleTable::new());
        let re_one = ctx.re(consts::ONE);
        assert_ne!(re_one, consts::ONE);
        assert_eq!(ctx.display(re_one).to_string(), "re(1)");
    }
}
