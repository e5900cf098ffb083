//! Rules for `exp`, `log`, `sin`, `cos` and `atan`.
//!
//! Only exact special values and symmetries are evaluated; these functions
//! mostly exist so that the complex-part rules have something to decompose
//! and differentiate.

use argand_core::{consts, ExprHandle, ExprNode, Func, Predicate};
use argand_integers::{Integer, Rational};

use crate::context::Context;
use crate::rules::{Rule, RuleTable};

/// Installs the elementary-function rules and hooks into `table`.
pub fn register(table: &mut RuleTable) {
    table.register(Func::Exp, Rule::new("exp-special", exp_special));
    table.register(Func::Exp, Rule::new("exp-log", exp_log));
    table.register(Func::Exp, Rule::new("exp-imaginary-pi", exp_imaginary_pi));
    let exp = table.entry(Func::Exp);
    exp.real_imag = Some(exp_real_imag);
    exp.conjugate = Some(exp_conjugate);
    exp.power = Some(exp_pow);
    exp.derivative = Some(exp_derivative);

    table.register(Func::Log, Rule::new("log-special", log_special));
    table.register(Func::Log, Rule::new("log-exp", log_exp));
    let log = table.entry(Func::Log);
    log.real_imag = Some(log_real_imag);
    log.derivative = Some(log_derivative);

    table.register(Func::Sin, Rule::new("sin-pi-multiple", sin_pi_multiple));
    table.register(Func::Sin, Rule::new("sin-odd", sin_odd));
    let sin = table.entry(Func::Sin);
    sin.conjugate = Some(sin_conjugate);
    sin.derivative = Some(sin_derivative);

    table.register(Func::Cos, Rule::new("cos-pi-multiple", cos_pi_multiple));
    table.register(Func::Cos, Rule::new("cos-even", cos_even));
    let cos = table.entry(Func::Cos);
    cos.conjugate = Some(cos_conjugate);
    cos.derivative = Some(cos_derivative);

    table.register(Func::Atan, Rule::new("atan-special", atan_special));
    table.register(Func::Atan, Rule::new("atan-odd", atan_odd));
    let atan = table.entry(Func::Atan);
    atan.conjugate = Some(atan_conjugate);
    atan.derivative = Some(atan_derivative);
}

/// Returns `q` if `h` is `q*pi` for a rational `q` (including `0`).
fn pi_multiple(ctx: &mut Context, h: ExprHandle) -> Option<Rational> {
    if h == consts::ZERO {
        return Some(Rational::from(0));
    }
    let (c, rest) = ctx.split_coefficient(h);
    (rest == consts::PI).then_some(c)
}

/// `2*q` as an integer, for `q` a multiple of one half.
fn half_turns(q: &Rational) -> Option<Integer> {
    (q * &Rational::from(2)).to_integer()
}

fn quarter(n: &Integer) -> Option<i64> {
    (n.clone() % Integer::new(4)).to_i64().map(|r| r.rem_euclid(4))
}

// === exp ===

fn exp_special(_: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    match args[0] {
        consts::ZERO => Some(consts::ONE),
        consts::ONE => Some(consts::E),
        consts::INFINITY => Some(consts::INFINITY),
        consts::NEG_INFINITY => Some(consts::ZERO),
        _ => None,
    }
}

fn exp_log(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    match ctx.node(args[0]) {
        ExprNode::Apply {
            func: Func::Log,
            args: inner,
        } if inner.len() == 1 => Some(inner[0]),
        _ => None,
    }
}

/// `exp(I*pi*k/2)` for integer `k`.
fn exp_imaginary_pi(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let (c, rest) = ctx.split_coefficient(args[0]);
    let i_pi = ctx.mul(&[consts::I, consts::PI]);
    if rest != i_pi {
        return None;
    }
    let k = ctx.number(Rational::from_integer(half_turns(&c)?));
    Some(ctx.pow(consts::I, k))
}

/// `exp(a + b*I) = exp(a)*cos(b) + I*exp(a)*sin(b)`, only on request.
fn exp_real_imag(
    ctx: &mut Context,
    args: &[ExprHandle],
    forced: bool,
) -> Option<(ExprHandle, ExprHandle)> {
    if !forced {
        return None;
    }
    let (re, im) = (ctx.re(args[0]), ctx.im(args[0]));
    let scale = ctx.exp(re);
    let cos = ctx.cos(im);
    let sin = ctx.sin(im);
    Some((ctx.mul(&[scale, cos]), ctx.mul(&[scale, sin])))
}

fn exp_conjugate(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let conj = ctx.conjugate(args[0]);
    Some(ctx.exp(conj))
}

fn exp_pow(ctx: &mut Context, args: &[ExprHandle], exp: ExprHandle) -> Option<ExprHandle> {
    if !ctx.is(exp, Predicate::Integer) {
        return None;
    }
    let scaled = ctx.mul(&[args[0], exp]);
    Some(ctx.exp(scaled))
}

fn exp_derivative(ctx: &mut Context, args: &[ExprHandle], var: ExprHandle) -> Option<ExprHandle> {
    let d = ctx.diff(args[0], var);
    let e = ctx.exp(args[0]);
    Some(ctx.mul(&[e, d]))
}

// === log ===

fn log_special(_: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    match args[0] {
        consts::ONE => Some(consts::ZERO),
        consts::E => Some(consts::ONE),
        consts::ZERO => Some(consts::COMPLEX_INFINITY),
        consts::INFINITY => Some(consts::INFINITY),
        _ => None,
    }
}

fn log_exp(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let ExprNode::Apply {
        func: Func::Exp,
        args: inner,
    } = ctx.node(args[0]).clone()
    else {
        return None;
    };
    let &[w] = inner.as_slice() else {
        return None;
    };
    ctx.is(w, Predicate::Real).then_some(w)
}

/// Polar decomposition: `log(z) = log(Abs(z)) + I*arg(z)`.
///
/// Applied unasked to nonzero constants, so `re(log(2*I))` is `log(2)`.
fn log_real_imag(
    ctx: &mut Context,
    args: &[ExprHandle],
    forced: bool,
) -> Option<(ExprHandle, ExprHandle)> {
    let z = args[0];
    let constant = ctx.arena.is_constant(z) && ctx.is(z, Predicate::Nonzero);
    if !forced && !constant {
        return None;
    }
    let abs = ctx.abs(z);
    let re = ctx.log(abs);
    let im = ctx.arg(z);
    Some((re, im))
}

fn log_derivative(ctx: &mut Context, args: &[ExprHandle], var: ExprHandle) -> Option<ExprHandle> {
    let d = ctx.diff(args[0], var);
    Some(ctx.div(d, args[0]))
}

// === sin / cos ===

fn sin_pi_multiple(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let n = half_turns(&pi_multiple(ctx, args[0])?)?;
    Some(match quarter(&n)? {
        1 => consts::ONE,
        3 => consts::NEG_ONE,
        _ => consts::ZERO,
    })
}

fn sin_odd(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let positive = ctx.extract_minus_sign(args[0])?;
    let sin = ctx.sin(positive);
    Some(ctx.neg(sin))
}

fn sin_conjugate(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let conj = ctx.conjugate(args[0]);
    Some(ctx.sin(conj))
}

fn sin_derivative(ctx: &mut Context, args: &[ExprHandle], var: ExprHandle) -> Option<ExprHandle> {
    let d = ctx.diff(args[0], var);
    let cos = ctx.cos(args[0]);
    Some(ctx.mul(&[cos, d]))
}

fn cos_pi_multiple(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let n = half_turns(&pi_multiple(ctx, args[0])?)?;
    Some(match quarter(&n)? {
        0 => consts::ONE,
        2 => consts::NEG_ONE,
        _ => consts::ZERO,
    })
}

fn cos_even(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let positive = ctx.extract_minus_sign(args[0])?;
    Some(ctx.cos(positive))
}

fn cos_conjugate(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let conj = ctx.conjugate(args[0]);
    Some(ctx.cos(conj))
}

fn cos_derivative(ctx: &mut Context, args: &[ExprHandle], var: ExprHandle) -> Option<ExprHandle> {
    let d = ctx.diff(args[0], var);
    let sin = ctx.sin(args[0]);
    Some(ctx.mul(&[consts::NEG_ONE, sin, d]))
}

// === atan ===

fn atan_special(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let quarter_turns = match args[0] {
        consts::ZERO => return Some(consts::ZERO),
        consts::ONE => Rational::from_i64(1, 4),
        consts::INFINITY => Rational::from_i64(1, 2),
        _ => return None,
    };
    let c = ctx.number(quarter_turns);
    Some(ctx.mul(&[c, consts::PI]))
}

fn atan_odd(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let positive = ctx.extract_minus_sign(args[0])?;
    let atan = ctx.atan(positive);
    Some(ctx.neg(atan))
}

fn atan_conjugate(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let conj = ctx.conjugate(args[0]);
    Some(ctx.atan(conj))
}

fn atan_derivative(ctx: &mut Context, args: &[ExprHandle], var: ExprHandle) -> Option<ExprHandle> {
    let d = ctx.diff(args[0], var);
    let sq = ctx.powi(args[0], 2);
    let den = ctx.add(&[consts::ONE, sq]);
    Some(ctx.div(d, den))
}
