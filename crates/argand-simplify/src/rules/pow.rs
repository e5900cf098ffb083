//! Canonical powers.
//!
//! Numeric powers are evaluated exactly where the result is rational
//! (`4**(1/2) = 2`, `(2/3)**-2 = 9/4`), nested powers are merged only when
//! the merge is valid for every value of the base, and powers of products
//! are split where each factor can be raised separately.

use argand_core::{consts, Constant, ExprHandle, ExprNode, Predicate};
use argand_integers::{Integer, Rational};
use num_traits::Zero;

use crate::context::Context;

/// Largest integer exponent evaluated exactly on a rational base.
const MAX_EXACT_EXPONENT: u64 = 1024;

/// Creates `base ** exp`.
pub(crate) fn pow(ctx: &mut Context, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
    if exp == consts::ZERO {
        return consts::ONE;
    }
    if exp == consts::ONE {
        return base;
    }
    if base == consts::NAN || exp == consts::NAN {
        return consts::NAN;
    }
    if base == consts::ONE {
        return if is_infinite(ctx, exp) {
            consts::NAN
        } else {
            consts::ONE
        };
    }

    let evaluated = match ctx.node(base).clone() {
        ExprNode::Number(q) => match ctx.arena.as_number(exp).cloned() {
            Some(r) => numeric(ctx, &q, &r),
            None if q.is_zero() => zero_base(ctx, exp),
            None => None,
        },
        ExprNode::Constant(c) => constant_base(ctx, c, exp),
        ExprNode::Pow { base: inner, exp: e1 } => pow_of_pow(ctx, inner, e1, exp),
        ExprNode::Mul(factors) => pow_of_mul(ctx, &factors, exp),
        ExprNode::Apply { func, args } if args.len() == 1 => ctx
            .rules
            .power_hook(func)
            .and_then(|hook| hook(ctx, &args, exp)),
        ExprNode::Apply { .. }
        | ExprNode::Symbol(_)
        | ExprNode::Add(_)
        | ExprNode::Derivative { .. } => None,
    };

    evaluated.unwrap_or_else(|| ctx.arena.intern(ExprNode::Pow { base, exp }))
}

fn is_infinite(ctx: &Context, h: ExprHandle) -> bool {
    matches!(ctx.node(h), ExprNode::Constant(c) if c.is_infinite())
}

/// `q ** r` for rationals.
fn numeric(ctx: &mut Context, q: &Rational, r: &Rational) -> Option<ExprHandle> {
    if q.is_zero() {
        return Some(if r.is_negative() {
            consts::COMPLEX_INFINITY
        } else {
            consts::ZERO
        });
    }

    if r.is_integer() {
        let n = r.to_i64().filter(|n| n.unsigned_abs() <= MAX_EXACT_EXPONENT)?;
        let value = q.powi(n)?;
        return Some(ctx.number(value));
    }

    let p = r.numerator();
    let d = u32::try_from(r.denominator().to_i64()?).ok()?;

    if q.is_negative() {
        // (-a)**(p/2) = a**(p/2) * I**p
        if d != 2 {
            return None;
        }
        let magnitude = ctx.number(-q);
        let exp = ctx.number(r.clone());
        let real = pow(ctx, magnitude, exp);
        let p = ctx.number(Rational::from_integer(p));
        let phase = pow(ctx, consts::I, p);
        return Some(ctx.mul(&[real, phase]));
    }

    if let Some(root) = q.exact_root(d) {
        let root = ctx.number(root);
        let p = ctx.number(Rational::from_integer(p));
        return Some(pow(ctx, root, p));
    }

    // 2**(5/2) = 4*2**(1/2)
    let whole = r.floor();
    if whole.is_zero() {
        return None;
    }
    let whole_i64 = whole
        .to_i64()
        .filter(|n| n.unsigned_abs() <= MAX_EXACT_EXPONENT)?;
    let scale = q.powi(whole_i64)?;
    let frac = r - &Rational::from_integer(whole);
    let scale = ctx.number(scale);
    let base = ctx.number(q.clone());
    let frac = ctx.number(frac);
    let rest = ctx.arena.intern(ExprNode::Pow { base, exp: frac });
    Some(ctx.mul(&[scale, rest]))
}

/// `0 ** e` for a symbolic exponent.
fn zero_base(ctx: &mut Context, exp: ExprHandle) -> Option<ExprHandle> {
    if ctx.is(exp, Predicate::Positive) {
        Some(consts::ZERO)
    } else if ctx.is(exp, Predicate::Negative) {
        Some(consts::COMPLEX_INFINITY)
    } else {
        None
    }
}

fn constant_base(ctx: &mut Context, c: Constant, exp: ExprHandle) -> Option<ExprHandle> {
    match c {
        Constant::ImaginaryUnit => {
            let n = ctx.as_integer(exp)?;
            let cycle = (n % Integer::new(4)).to_i64()?.rem_euclid(4);
            Some(match cycle {
                0 => consts::ONE,
                1 => consts::I,
                2 => consts::NEG_ONE,
                _ => ctx.neg(consts::I),
            })
        }
        Constant::E => Some(ctx.exp(exp)),
        Constant::Infinity | Constant::ComplexInfinity => {
            if ctx.is(exp, Predicate::Positive) {
                Some(ctx.arena.intern(ExprNode::Constant(c)))
            } else if ctx.is(exp, Predicate::Negative) {
                Some(consts::ZERO)
            } else {
                None
            }
        }
        Constant::NegativeInfinity => {
            let n = ctx.as_integer(exp)?;
            Some(if n.is_negative() {
                consts::ZERO
            } else if n.is_even() {
                consts::INFINITY
            } else {
                consts::NEG_INFINITY
            })
        }
        Constant::Pi | Constant::NaN => None,
    }
}

/// `(b ** e1) ** e`.
fn pow_of_pow(ctx: &mut Context, b: ExprHandle, e1: ExprHandle, e: ExprHandle) -> Option<ExprHandle> {
    let merges = ctx.is(e, Predicate::Integer)
        || (ctx.is(b, Predicate::Positive) && ctx.is(e1, Predicate::Real) && ctx.is(e, Predicate::Real));
    if merges {
        let combined = ctx.mul(&[e1, e]);
        return Some(ctx.pow(b, combined));
    }

    // (b**(2k))**e = Abs(b)**(2k*e) for real b.
    let even = ctx.arena.as_number(e1).is_some_and(Rational::is_even);
    if even && ctx.is(b, Predicate::Real) && ctx.is(e, Predicate::Real) {
        let magnitude = ctx.abs(b);
        let combined = ctx.mul(&[e1, e]);
        return Some(ctx.pow(magnitude, combined));
    }
    None
}

/// `(f1*f2*...) ** e`.
fn pow_of_mul(ctx: &mut Context, factors: &[ExprHandle], e: ExprHandle) -> Option<ExprHandle> {
    if ctx.is(e, Predicate::Integer) {
        let raised: Vec<ExprHandle> = factors.iter().map(|&f| ctx.pow(f, e)).collect();
        return Some(ctx.mul(&raised));
    }

    // Nonnegative factors can be raised on their own.
    let mut split = Vec::new();
    let mut keep = Vec::new();
    for &f in factors {
        match ctx.arena.as_number(f).cloned() {
            Some(c) if c.is_negative() && c != Rational::from(-1) => {
                split.push(ctx.number(-c));
                keep.push(consts::NEG_ONE);
            }
            _ if ctx.is(f, Predicate::Nonnegative) => split.push(f),
            _ => keep.push(f),
        }
    }
    if split.is_empty() {
        return None;
    }

    let mut raised: Vec<ExprHandle> = split.iter().map(|&f| ctx.pow(f, e)).collect();
    if !keep.is_empty() {
        let rest = ctx.mul(&keep);
        raised.push(ctx.pow(rest, e));
    }
    Some(ctx.mul(&raised))
}

#[cfg(test)]
mod tests {
    use crate::Context;
    use argand_core::{consts, ExprNode, Predicate};

    #[test]
    fn test_trivial_exponents() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        assert_eq!(ctx.pow(x, consts::ZERO), consts::ONE);
        assert_eq!(ctx.pow(x, consts::ONE), x);
        assert_eq!(ctx.pow(consts::ONE, x), consts::ONE);
        assert_eq!(ctx.pow(consts::ONE, consts::INFINITY), consts::NAN);
        assert_eq!(ctx.pow(x, consts::NAN), consts::NAN);
    }

    #[test]
    fn test_exact_numeric_powers() {
        let mut ctx = Context::new();
        let four = ctx.integer(4);
        assert_eq!(ctx.sqrt(four), consts::TWO);

        let two_thirds = ctx.rational(2, 3);
        let p = ctx.powi(two_thirds, -2);
        assert_eq!(p, ctx.rational(9, 4));

        assert_eq!(ctx.powi(consts::ZERO, -1), consts::COMPLEX_INFINITY);

        let minus_four = ctx.integer(-4);
        let root = ctx.sqrt(minus_four);
        assert_eq!(root, ctx.mul(&[consts::TWO, consts::I]));
    }

    #[test]
    fn test_irrational_roots_stay_symbolic() {
        let mut ctx = Context::new();
        let root2 = ctx.sqrt(consts::TWO);
        assert_eq!(ctx.display(root2).to_string(), "sqrt(2)");

        let five_halves = ctx.rational(5, 2);
        let p = ctx.pow(consts::TWO, five_halves);
        let four = ctx.integer(4);
        assert_eq!(p, ctx.mul(&[four, root2]));
    }

    #[test]
    fn test_imaginary_unit_powers() {
        let mut ctx = Context::new();
        assert_eq!(ctx.powi(consts::I, 2), consts::NEG_ONE);
        assert_eq!(ctx.powi(consts::I, 4), consts::ONE);
        assert_eq!(ctx.powi(consts::I, 5), consts::I);
        let minus_i = ctx.neg(consts::I);
        assert_eq!(ctx.powi(consts::I, -1), minus_i);
    }

    #[test]
    fn test_nested_powers() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let x2 = ctx.powi(x, 2);
        let x6 = ctx.powi(x, 6);
        assert_eq!(ctx.powi(x2, 3), x6);

        // sqrt(x**2) is not x for an unconstrained x.
        let root = ctx.sqrt(x2);
        assert_ne!(root, x);
        assert_eq!(ctx.display(root).to_string(), "sqrt(x**2)");

        let p = ctx.symbol_with("p", [(Predicate::Positive, true)]).unwrap();
        let p2 = ctx.powi(p, 2);
        assert_eq!(ctx.sqrt(p2), p);
    }

    #[test]
    fn test_power_of_product() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let y = ctx.symbol("y");
        let xy = ctx.mul(&[x, y]);
        let sq = ctx.powi(xy, 2);
        let x2 = ctx.powi(x, 2);
        let y2 = ctx.powi(y, 2);
        assert_eq!(sq, ctx.mul(&[x2, y2]));

        let a = ctx.symbol_with("a", [(Predicate::Positive, true)]).unwrap();
        let minus_a = ctx.neg(a);
        let root = ctx.sqrt(minus_a);
        let root_a = ctx.sqrt(a);
        assert_eq!(root, ctx.mul(&[consts::I, root_a]));
    }

    #[test]
    fn test_exponential_base() {
        let mut ctx = Context::new();
        let x = ctx.symbol("x");
        let p = ctx.pow(consts::E, x);
        assert_eq!(p, ctx.exp(x));
    }

    #[test]
    fn test_infinite_bases() {
        let mut ctx = Context::new();
        assert_eq!(ctx.powi(consts::INFINITY, 2), consts::INFINITY);
        assert_eq!(ctx.powi(consts::INFINITY, -1), consts::ZERO);
        assert_eq!(ctx.powi(consts::NEG_INFINITY, 3), consts::NEG_INFINITY);
        assert_eq!(ctx.powi(consts::NEG_INFINITY, 2), consts::INFINITY);
    }

    #[test]
    fn test_out_of_range_exponents_stay_symbolic() {
        let mut ctx = Context::new();
        for n in [i64::MIN, i64::MAX, 1025, -1025] {
            let exp = ctx.integer(n);
            let p = ctx.pow(consts::TWO, exp);
            assert!(
                matches!(ctx.node(p), ExprNode::Pow { base, exp: e } if *base == consts::TWO && *e == exp),
                "2**{n}"
            );
        }

        let exp = ctx.rational(i64::MAX, 2);
        let p = ctx.pow(consts::TWO, exp);
        assert!(matches!(ctx.node(p), ExprNode::Pow { .. }));
    }
}
