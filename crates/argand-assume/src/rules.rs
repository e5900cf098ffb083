//! Per-operator inference rules.
//!
//! Each rule sees the node and the closed fact sets of its children and
//! emits the literals it can prove. The literals are then closed under the
//! implication graph; anything not emitted stays unknown.

use argand_core::{Constant, ExprArena, ExprNode, FactSet, Func, Predicate};
use argand_integers::Rational;
use num_traits::Zero;

use Predicate::{
    Complex, Even, Integer, Negative, Nonnegative, Nonpositive, Nonzero, Odd, Positive, Real,
    Zero as IsZero,
};

/// Literals collected for one node.
#[derive(Default)]
struct Derived(Vec<(Predicate, bool)>);

impl Derived {
    fn set(&mut self, predicate: Predicate, value: bool) {
        self.0.push((predicate, value));
    }

    fn set_if(&mut self, condition: bool, predicate: Predicate, value: bool) {
        if condition {
            self.set(predicate, value);
        }
    }

    fn finish(self, node: &ExprNode) -> FactSet {
        FactSet::from_pairs(self.0).unwrap_or_else(|err| {
            tracing::warn!(?node, %err, "inconsistent derived facts, treating as unknown");
            FactSet::new()
        })
    }
}

fn all(children: &[FactSet], predicate: Predicate) -> bool {
    children.iter().all(|f| f.get(predicate).is_true())
}

fn any(children: &[FactSet], predicate: Predicate) -> bool {
    children.iter().any(|f| f.get(predicate).is_true())
}

/// Derives the closed facts of `node` from the facts of its children.
pub(crate) fn derive(arena: &ExprArena, node: &ExprNode, children: &[FactSet]) -> FactSet {
    let mut out = Derived::default();
    match node {
        ExprNode::Number(n) => number(&mut out, n),
        ExprNode::Constant(c) => constant(&mut out, *c),
        ExprNode::Symbol(id) => return arena.symbol_facts(*id),
        ExprNode::Add(_) => add(&mut out, children),
        ExprNode::Mul(_) => mul(&mut out, children),
        ExprNode::Pow { exp, .. } => pow(&mut out, arena.as_number(*exp), children[0], children[1]),
        ExprNode::Apply { func, .. } => apply(&mut out, *func, children),
        ExprNode::Derivative { .. } => {}
    }
    out.finish(node)
}

fn number(out: &mut Derived, n: &Rational) {
    out.set(Real, true);
    out.set(IsZero, n.is_zero());
    out.set(Positive, n.is_positive());
    out.set(Negative, n.is_negative());
    out.set(Integer, n.is_integer());
    if n.is_integer() {
        out.set(Even, n.is_even());
    }
}

fn constant(out: &mut Derived, c: Constant) {
    match c {
        Constant::ImaginaryUnit => {
            out.set(Complex, true);
            out.set(Real, false);
        }
        Constant::ComplexInfinity => out.set(Real, false),
        Constant::Pi | Constant::E | Constant::Infinity => {
            out.set(Positive, true);
            out.set(Integer, false);
        }
        Constant::NegativeInfinity => {
            out.set(Negative, true);
            out.set(Integer, false);
        }
        Constant::NaN => {}
    }
}

fn add(out: &mut Derived, terms: &[FactSet]) {
    let real = terms.iter().filter(|f| f.get(Real).is_true()).count();
    let non_real = terms.iter().filter(|f| f.get(Real).is_false()).count();
    if real == terms.len() {
        out.set(Real, true);
    } else if non_real == 1 && real + 1 == terms.len() {
        out.set(Real, false);
    }

    out.set_if(all(terms, Complex), Complex, true);
    out.set_if(all(terms, Integer), Integer, true);
    out.set_if(all(terms, Even), Even, true);

    let nonneg = all(terms, Nonnegative);
    let nonpos = all(terms, Nonpositive);
    out.set_if(nonneg, Nonnegative, true);
    out.set_if(nonpos, Nonpositive, true);
    out.set_if(nonneg && any(terms, Positive), Positive, true);
    out.set_if(nonpos && any(terms, Negative), Negative, true);
}

/// Sign bookkeeping for a product of reals.
enum ProductSign {
    Strict { negative: bool },
    Weak { negative: bool },
    Unknown,
}

fn product_sign(factors: &[FactSet]) -> ProductSign {
    let mut negative = false;
    let mut weak = false;
    for f in factors {
        if f.get(Positive).is_true() {
            continue;
        }
        if f.get(Negative).is_true() {
            negative = !negative;
        } else if f.get(Nonnegative).is_true() {
            weak = true;
        } else if f.get(Nonpositive).is_true() {
            weak = true;
            negative = !negative;
        } else {
            return ProductSign::Unknown;
        }
    }
    if weak {
        ProductSign::Weak { negative }
    } else {
        ProductSign::Strict { negative }
    }
}

fn mul(out: &mut Derived, factors: &[FactSet]) {
    if any(factors, IsZero) {
        out.set(IsZero, true);
        return;
    }
    out.set_if(all(factors, Nonzero), Nonzero, true);
    out.set_if(all(factors, Complex), Complex, true);

    let real = factors.iter().filter(|f| f.get(Real).is_true()).count();
    let non_real = factors.iter().filter(|f| f.get(Real).is_false()).count();
    if real == factors.len() {
        out.set(Real, true);
        match product_sign(factors) {
            ProductSign::Strict { negative } => out.set(if negative { Negative } else { Positive }, true),
            ProductSign::Weak { negative } => {
                out.set(if negative { Nonpositive } else { Nonnegative }, true);
            }
            ProductSign::Unknown => {}
        }
    } else if non_real == 1 && real + 1 == factors.len() && all(factors, Nonzero) {
        out.set(Real, false);
    }

    if all(factors, Integer) {
        out.set(Integer, true);
        out.set_if(any(factors, Even), Even, true);
        out.set_if(all(factors, Odd), Odd, true);
    }
}

fn pow(out: &mut Derived, exp_value: Option<&Rational>, base: FactSet, exp: FactSet) {
    let base_real = base.get(Real).is_true();
    let base_nonzero = base.get(Nonzero).is_true();

    if let Some(n) = exp_value.filter(|n| n.is_integer()) {
        out.set_if(base_real && (base_nonzero || n.is_positive()), Real, true);
        out.set_if(base_nonzero, Nonzero, true);
        if n.is_even() {
            out.set_if(base_real && (base_nonzero || n.is_positive()), Nonnegative, true);
            out.set_if(base_real && base_nonzero, Positive, true);
        } else {
            out.set_if(base.get(Positive).is_true(), Positive, true);
            out.set_if(base.get(Negative).is_true(), Negative, true);
        }
        if n.is_positive() {
            out.set_if(base.get(Integer).is_true(), Integer, true);
            out.set_if(base.get(IsZero).is_true(), IsZero, true);
        }
        return;
    }

    if let Some(n) = exp_value {
        // Non-integer rational exponent.
        let half_integer = n.denominator() == argand_integers::Integer::new(2);
        out.set_if(base.get(Negative).is_true() && half_integer, Real, false);
        out.set_if(
            base.get(Nonnegative).is_true() && n.is_positive(),
            Nonnegative,
            true,
        );
    }

    let exp_real = exp.get(Real).is_true();
    out.set_if(base.get(Positive).is_true() && exp_real, Positive, true);
    out.set_if(base_nonzero, Nonzero, true);
    if exp.get(Integer).is_true() {
        let finite = base_nonzero || exp.get(Nonnegative).is_true();
        out.set_if(base_real && finite, Real, true);
        if exp.get(Even).is_true() {
            out.set_if(base_real && finite, Nonnegative, true);
            out.set_if(base_real && base_nonzero, Positive, true);
        }
        if exp.get(Odd).is_true() {
            out.set_if(base.get(Negative).is_true(), Negative, true);
        }
    }
}

fn apply(out: &mut Derived, func: Func, args: &[FactSet]) {
    let &[arg] = args else {
        return;
    };
    let arg_is = |p: Predicate| arg.get(p);

    match func {
        Func::Re | Func::Im | Func::Arg => out.set(Real, true),
        Func::Abs => {
            out.set(Nonnegative, true);
            out.set_if(arg_is(IsZero).is_true(), IsZero, true);
            out.set_if(arg_is(Nonzero).is_true(), Positive, true);
            out.set_if(arg_is(Integer).is_true(), Integer, true);
        }
        Func::Sign => {
            out.set_if(arg_is(IsZero).is_true(), IsZero, true);
            out.set_if(arg_is(Nonzero).is_true(), Nonzero, true);
            out.set_if(arg_is(Positive).is_true(), Positive, true);
            out.set_if(arg_is(Negative).is_true(), Negative, true);
            out.set_if(arg_is(Real).is_true(), Integer, true);
            out.set_if(arg_is(Real).is_false(), Real, false);
        }
        Func::Conjugate => {
            if arg_is(Real).is_true() {
                out.0.extend(arg.iter());
            }
            out.set_if(arg_is(Real).is_false(), Real, false);
            out.set_if(arg_is(Nonzero).is_true(), Nonzero, true);
            out.set_if(arg_is(IsZero).is_true(), IsZero, true);
        }
        Func::Exp => {
            out.set(Nonzero, true);
            out.set_if(arg_is(Real).is_true(), Positive, true);
        }
        Func::Log => {
            out.set_if(arg_is(Positive).is_true(), Real, true);
        }
        Func::Sin | Func::Cos | Func::Atan => {
            out.set_if(arg_is(Real).is_true(), Real, true);
        }
        Func::Undefined(_) => {}
    }
}
