//! Rules for `re`, `im`, `sign`, `Abs`, `arg` and `conjugate`.
//!
//! Every rule decides from the shape of the argument and its derived facts
//! alone. A rule that cannot prove its precondition declines, and when no
//! rule accepts, the application is kept as an irreducible residue such as
//! `re(x)`.

use argand_core::{consts, ExprHandle, ExprNode, Func, Predicate};
use argand_integers::Rational;
use tracing::trace;

use crate::context::Context;
use crate::rules::{Rule, RuleTable};

/// Installs the complex-part rules and hooks into `table`.
pub fn register(table: &mut RuleTable) {
    for rule in [
        Rule::new("re-complex-infinity", parts_of_complex_infinity),
        Rule::new("re-real", re_real),
        Rule::new("re-imaginary-unit", re_imaginary_unit),
        Rule::new("re-sum", re_sum),
        Rule::new("re-product", re_product),
        Rule::new("re-conjugate", re_conjugate),
        Rule::new("re-function", re_function),
    ] {
        table.register(Func::Re, rule);
    }
    table.entry(Func::Re).derivative = Some(re_derivative);

    for rule in [
        Rule::new("im-complex-infinity", parts_of_complex_infinity),
        Rule::new("im-real", im_real),
        Rule::new("im-imaginary-unit", im_imaginary_unit),
        Rule::new("im-sum", im_sum),
        Rule::new("im-product", im_product),
        Rule::new("im-conjugate", im_conjugate),
        Rule::new("im-function", im_function),
    ] {
        table.register(Func::Im, rule);
    }
    table.entry(Func::Im).derivative = Some(im_derivative);

    for rule in [
        Rule::new("sign-number", sign_number),
        Rule::new("sign-known", sign_known),
        Rule::new("sign-imaginary-unit", sign_imaginary_unit),
        Rule::new("sign-product", sign_product),
        Rule::new("sign-sign", sign_sign),
    ] {
        table.register(Func::Sign, rule);
    }
    table.entry(Func::Sign).conjugate = Some(sign_conjugate);

    for rule in [
        Rule::new("abs-infinity", abs_infinity),
        Rule::new("abs-number", abs_number),
        Rule::new("abs-nonnegative", abs_nonnegative),
        Rule::new("abs-nonpositive", abs_nonpositive),
        Rule::new("abs-imaginary-unit", abs_imaginary_unit),
        Rule::new("abs-product", abs_product),
        Rule::new("abs-power", abs_power),
        Rule::new("abs-conjugate", abs_conjugate),
        Rule::new("abs-closed-form", abs_closed_form),
    ] {
        table.register(Func::Abs, rule);
    }
    let abs = table.entry(Func::Abs);
    abs.power = Some(abs_pow);
    abs.derivative = Some(abs_derivative);

    for rule in [
        Rule::new("arg-zero", arg_zero),
        Rule::new("arg-positive", arg_positive),
        Rule::new("arg-negative", arg_negative),
        Rule::new("arg-product", arg_product),
        Rule::new("arg-closed-form", arg_closed_form),
    ] {
        table.register(Func::Arg, rule);
    }
    table.entry(Func::Arg).derivative = Some(arg_derivative);

    for rule in [
        Rule::new("conjugate-real", conjugate_real),
        Rule::new("conjugate-imaginary-unit", conjugate_imaginary_unit),
        Rule::new("conjugate-sum", conjugate_sum),
        Rule::new("conjugate-product", conjugate_product),
        Rule::new("conjugate-power", conjugate_power),
        Rule::new("conjugate-conjugate", conjugate_conjugate),
        Rule::new("conjugate-function", conjugate_function),
    ] {
        table.register(Func::Conjugate, rule);
    }
    table.entry(Func::Conjugate).derivative = Some(conjugate_derivative);
}

/// Splits a function application through its real/imaginary hook.
pub(crate) fn function_parts(
    ctx: &mut Context,
    z: ExprHandle,
    forced: bool,
) -> Option<(ExprHandle, ExprHandle)> {
    let ExprNode::Apply { func, args } = ctx.node(z).clone() else {
        return None;
    };
    if args.len() != 1 {
        return None;
    }
    let hook = ctx.rules.real_imag_hook(func)?;
    let parts = hook(ctx, &args, forced)?;
    trace!(?func, forced, "real/imaginary hook used");
    Some(parts)
}

/// Real and imaginary parts of `z` when both are free of `re` and `im`.
fn closed_parts(ctx: &mut Context, z: ExprHandle) -> Option<(ExprHandle, ExprHandle)> {
    let re = ctx.re(z);
    let im = ctx.im(z);
    let closed = !ctx.has_complex_parts(re) && !ctx.has_complex_parts(im);
    closed.then_some((re, im))
}

fn factors(ctx: &Context, z: ExprHandle) -> Option<Vec<ExprHandle>> {
    match ctx.node(z) {
        ExprNode::Mul(factors) => Some(factors.to_vec()),
        _ => None,
    }
}

fn terms(ctx: &Context, z: ExprHandle) -> Option<Vec<ExprHandle>> {
    match ctx.node(z) {
        ExprNode::Add(terms) => Some(terms.to_vec()),
        _ => None,
    }
}

fn inner_of(ctx: &Context, z: ExprHandle, func: Func) -> Option<ExprHandle> {
    match ctx.node(z) {
        ExprNode::Apply { func: f, args } if *f == func && args.len() == 1 => Some(args[0]),
        _ => None,
    }
}

// === re / im ===

/// How a product splits for `re` and `im`.
enum ProductSplit {
    /// `I * rest`.
    Imaginary(ExprHandle),
    /// `real * other`, with `real` provably real.
    Scaled { real: ExprHandle, other: ExprHandle },
}

fn split_product(ctx: &mut Context, factors: &[ExprHandle]) -> Option<ProductSplit> {
    if let Some(pos) = factors.iter().position(|&f| f == consts::I) {
        let mut rest = factors.to_vec();
        rest.remove(pos);
        return Some(ProductSplit::Imaginary(ctx.mul(&rest)));
    }
    let (real, other): (Vec<ExprHandle>, Vec<ExprHandle>) =
        factors.iter().partition(|&&f| ctx.is(f, Predicate::Real));
    if real.is_empty() || other.is_empty() {
        return None;
    }
    Some(ProductSplit::Scaled {
        real: ctx.mul(&real),
        other: ctx.mul(&other),
    })
}

fn parts_of_complex_infinity(_: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    (args[0] == consts::COMPLEX_INFINITY).then_some(consts::NAN)
}

fn re_real(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    ctx.is(args[0], Predicate::Real).then_some(args[0])
}

fn re_imaginary_unit(_: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    (args[0] == consts::I).then_some(consts::ZERO)
}

fn re_sum(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let terms = terms(ctx, args[0])?;
    let parts: Vec<ExprHandle> = terms.iter().map(|&t| ctx.re(t)).collect();
    Some(ctx.add(&parts))
}

fn re_product(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let factors = factors(ctx, args[0])?;
    match split_product(ctx, &factors)? {
        // re(I*w) = -im(w)
        ProductSplit::Imaginary(rest) => {
            let im = ctx.im(rest);
            Some(ctx.neg(im))
        }
        ProductSplit::Scaled { real, other } => {
            let re = ctx.re(other);
            Some(ctx.mul(&[real, re]))
        }
    }
}

fn re_conjugate(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let w = inner_of(ctx, args[0], Func::Conjugate)?;
    Some(ctx.re(w))
}

fn re_function(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    function_parts(ctx, args[0], false).map(|(re, _)| re)
}

fn im_real(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    ctx.is(args[0], Predicate::Real).then_some(consts::ZERO)
}

fn im_imaginary_unit(_: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    (args[0] == consts::I).then_some(consts::ONE)
}

fn im_sum(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let terms = terms(ctx, args[0])?;
    let parts: Vec<ExprHandle> = terms.iter().map(|&t| ctx.im(t)).collect();
    Some(ctx.add(&parts))
}

fn im_product(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let factors = factors(ctx, args[0])?;
    match split_product(ctx, &factors)? {
        // im(I*w) = re(w)
        ProductSplit::Imaginary(rest) => Some(ctx.re(rest)),
        ProductSplit::Scaled { real, other } => {
            let im = ctx.im(other);
            Some(ctx.mul(&[real, im]))
        }
    }
}

fn im_conjugate(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let w = inner_of(ctx, args[0], Func::Conjugate)?;
    let im = ctx.im(w);
    Some(ctx.neg(im))
}

fn im_function(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    function_parts(ctx, args[0], false).map(|(_, im)| im)
}

/// Differentiation commutes with `re`, `im` and `conjugate` unless the
/// variable is known not to be real.
fn commutes_with_diff(ctx: &mut Context, var: ExprHandle) -> bool {
    !ctx.ask(var, Predicate::Real).is_false()
}

fn re_derivative(ctx: &mut Context, args: &[ExprHandle], var: ExprHandle) -> Option<ExprHandle> {
    if !commutes_with_diff(ctx, var) {
        return None;
    }
    let d = ctx.diff(args[0], var);
    Some(ctx.re(d))
}

fn im_derivative(ctx: &mut Context, args: &[ExprHandle], var: ExprHandle) -> Option<ExprHandle> {
    if !commutes_with_diff(ctx, var) {
        return None;
    }
    let d = ctx.diff(args[0], var);
    Some(ctx.im(d))
}

// === sign ===

fn sign_number(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let signum = ctx.arena.as_number(args[0])?.signum();
    Some(ctx.integer(i64::from(signum)))
}

fn sign_known(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let z = args[0];
    if ctx.is(z, Predicate::Zero) {
        Some(consts::ZERO)
    } else if ctx.is(z, Predicate::Positive) {
        Some(consts::ONE)
    } else if ctx.is(z, Predicate::Negative) {
        Some(consts::NEG_ONE)
    } else {
        None
    }
}

fn sign_imaginary_unit(_: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    (args[0] == consts::I).then_some(consts::I)
}

/// Positive factors drop out, negative ones flip the sign and `I` factors
/// are pulled out.
fn sign_product(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let factors = factors(ctx, args[0])?;
    let mut pulled: Vec<ExprHandle> = Vec::new();
    let mut kept: Vec<ExprHandle> = Vec::new();
    let mut changed = false;
    for f in factors {
        let factor = if f == consts::I {
            Some(consts::I)
        } else if ctx.is(f, Predicate::Positive) {
            None
        } else if ctx.is(f, Predicate::Negative) {
            Some(consts::NEG_ONE)
        } else {
            kept.push(f);
            continue;
        };
        pulled.extend(factor);
        changed = true;
    }
    if !changed {
        return None;
    }
    let rest = ctx.mul(&kept);
    pulled.push(ctx.sign(rest));
    Some(ctx.mul(&pulled))
}

fn sign_sign(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    ctx.arena.is_apply_of(args[0], Func::Sign).then_some(args[0])
}

fn sign_conjugate(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let conj = ctx.conjugate(args[0]);
    Some(ctx.sign(conj))
}

// === Abs ===

fn abs_infinity(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let infinite = matches!(ctx.node(args[0]), ExprNode::Constant(c) if c.is_infinite());
    infinite.then_some(consts::INFINITY)
}

fn abs_number(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let magnitude = ctx.arena.as_number(args[0])?.abs();
    Some(ctx.number(magnitude))
}

fn abs_nonnegative(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    ctx.is(args[0], Predicate::Nonnegative).then_some(args[0])
}

fn abs_nonpositive(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    ctx.is(args[0], Predicate::Nonpositive).then(|| ctx.neg(args[0]))
}

fn abs_imaginary_unit(_: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    (args[0] == consts::I).then_some(consts::ONE)
}

fn abs_product(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let factors = factors(ctx, args[0])?;
    let parts: Vec<ExprHandle> = factors.iter().map(|&f| ctx.abs(f)).collect();
    Some(ctx.mul(&parts))
}

/// `Abs(b**e) = Abs(b)**e` for real `e`.
fn abs_power(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let ExprNode::Pow { base, exp } = *ctx.node(args[0]) else {
        return None;
    };
    if !ctx.is(exp, Predicate::Real) {
        return None;
    }
    let magnitude = ctx.abs(base);
    Some(ctx.pow(magnitude, exp))
}

fn abs_conjugate(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let w = inner_of(ctx, args[0], Func::Conjugate)?;
    Some(ctx.abs(w))
}

/// `Abs(a + b*I) = sqrt(a**2 + b**2)`.
fn abs_closed_form(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let (re, im) = closed_parts(ctx, args[0])?;
    if im == consts::ZERO {
        return None;
    }
    let re2 = ctx.powi(re, 2);
    let im2 = ctx.powi(im, 2);
    let sum = ctx.add(&[re2, im2]);
    Some(ctx.sqrt(sum))
}

/// Powers of `Abs(x)` for real `x`: even exponents drop the bars, odd
/// numeric exponents keep a single `Abs(x)` factor.
fn abs_pow(ctx: &mut Context, args: &[ExprHandle], exp: ExprHandle) -> Option<ExprHandle> {
    let x = args[0];
    if !ctx.is(x, Predicate::Real) {
        return None;
    }
    if ctx.is(exp, Predicate::Even) {
        return Some(ctx.pow(x, exp));
    }
    let n = ctx.as_i64(exp)?;
    let abs = ctx.intern_apply(Func::Abs, &[x]);
    let (power, bars) = match n {
        n if n > 1 => (ctx.powi(x, n - 1), abs),
        n if n < -1 => {
            let inv = ctx.arena.intern(ExprNode::Pow {
                base: abs,
                exp: consts::NEG_ONE,
            });
            (ctx.powi(x, n + 1), inv)
        }
        _ => return None,
    };
    Some(ctx.mul(&[power, bars]))
}

fn abs_derivative(ctx: &mut Context, args: &[ExprHandle], var: ExprHandle) -> Option<ExprHandle> {
    let a = args[0];
    let da = ctx.diff(a, var);
    if ctx.is(a, Predicate::Real) {
        let sign = ctx.sign(a);
        return Some(ctx.mul(&[da, sign]));
    }
    if !ctx.is(var, Predicate::Real) {
        return None;
    }
    // (re(a)*re(a') + im(a)*im(a')) / Abs(a)
    let (re, im) = (ctx.re(a), ctx.im(a));
    let (dre, dim) = (ctx.re(da), ctx.im(da));
    let t1 = ctx.mul(&[re, dre]);
    let t2 = ctx.mul(&[im, dim]);
    let num = ctx.add(&[t1, t2]);
    let abs = ctx.abs(a);
    Some(ctx.div(num, abs))
}

// === arg ===

fn arg_zero(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    ctx.is(args[0], Predicate::Zero).then_some(consts::NAN)
}

fn arg_positive(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    ctx.is(args[0], Predicate::Positive).then_some(consts::ZERO)
}

fn arg_negative(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    ctx.is(args[0], Predicate::Negative).then_some(consts::PI)
}

fn arg_product(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let factors = factors(ctx, args[0])?;
    let kept: Vec<ExprHandle> = factors
        .iter()
        .copied()
        .filter(|&f| !ctx.is(f, Predicate::Positive))
        .collect();
    if kept.len() == factors.len() {
        return None;
    }
    let rest = ctx.mul(&kept);
    Some(ctx.arg(rest))
}

/// Four-quadrant angle of `a + b*I` with sign-known parts.
fn arg_closed_form(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let (re, im) = closed_parts(ctx, args[0])?;
    if re == consts::ZERO || ctx.is(re, Predicate::Zero) {
        let half = if ctx.is(im, Predicate::Positive) {
            consts::HALF
        } else if ctx.is(im, Predicate::Negative) {
            ctx.number(Rational::from_i64(-1, 2))
        } else {
            return None;
        };
        return Some(ctx.mul(&[half, consts::PI]));
    }

    let shift = if ctx.is(re, Predicate::Positive) {
        consts::ZERO
    } else if !ctx.is(re, Predicate::Negative) {
        return None;
    } else if ctx.is(im, Predicate::Nonnegative) {
        consts::PI
    } else if ctx.is(im, Predicate::Negative) {
        ctx.neg(consts::PI)
    } else {
        return None;
    };
    let ratio = ctx.div(im, re);
    let angle = ctx.atan(ratio);
    Some(ctx.add(&[angle, shift]))
}

fn arg_derivative(ctx: &mut Context, args: &[ExprHandle], var: ExprHandle) -> Option<ExprHandle> {
    if !ctx.is(var, Predicate::Real) {
        return None;
    }
    let a = args[0];
    let da = ctx.diff(a, var);
    // (re(a)*im(a') - im(a)*re(a')) / (re(a)**2 + im(a)**2)
    let (re, im) = (ctx.re(a), ctx.im(a));
    let (dre, dim) = (ctx.re(da), ctx.im(da));
    let t1 = ctx.mul(&[re, dim]);
    let t2 = ctx.mul(&[consts::NEG_ONE, im, dre]);
    let num = ctx.add(&[t1, t2]);
    let re2 = ctx.powi(re, 2);
    let im2 = ctx.powi(im, 2);
    let den = ctx.add(&[re2, im2]);
    Some(ctx.div(num, den))
}

// === conjugate ===

fn conjugate_real(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    ctx.is(args[0], Predicate::Real).then_some(args[0])
}

fn conjugate_imaginary_unit(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    (args[0] == consts::I).then(|| ctx.neg(consts::I))
}

fn conjugate_sum(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let terms = terms(ctx, args[0])?;
    let parts: Vec<ExprHandle> = terms.iter().map(|&t| ctx.conjugate(t)).collect();
    Some(ctx.add(&parts))
}

fn conjugate_product(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let factors = factors(ctx, args[0])?;
    let parts: Vec<ExprHandle> = factors.iter().map(|&f| ctx.conjugate(f)).collect();
    Some(ctx.mul(&parts))
}

fn conjugate_power(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let ExprNode::Pow { base, exp } = *ctx.node(args[0]) else {
        return None;
    };
    if !ctx.is(exp, Predicate::Integer) {
        return None;
    }
    let conj = ctx.conjugate(base);
    Some(ctx.pow(conj, exp))
}

fn conjugate_conjugate(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    inner_of(ctx, args[0], Func::Conjugate)
}

fn conjugate_function(ctx: &mut Context, args: &[ExprHandle]) -> Option<ExprHandle> {
    let ExprNode::Apply { func, args: inner } = ctx.node(args[0]).clone() else {
        return None;
    };
    if inner.len() != 1 {
        return None;
    }
    let hook = ctx.rules.conjugate_hook(func)?;
    trace!(?func, "conjugate hook used");
    hook(ctx, &inner)
}

fn conjugate_derivative(
    ctx: &mut Context,
    args: &[ExprHandle],
    var: ExprHandle,
) -> Option<ExprHandle> {
    if !commutes_with_diff(ctx, var) {
        return None;
    }
    let d = ctx.diff(args[0], var);
    Some(ctx.conjugate(d))
}
