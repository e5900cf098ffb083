//! End-to-end scenarios for the complex-part functions.

use argand_core::{consts, ExprHandle, ExprNode, Func, Predicate, Truth};

use crate::{Context, ExpandHints};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Symbols {
    x: ExprHandle,
    y: ExprHandle,
    r: ExprHandle,
}

fn symbols(ctx: &mut Context) -> Symbols {
    Symbols {
        x: ctx.symbol("x"),
        y: ctx.symbol("y"),
        r: ctx.symbol_with("r", [(Predicate::Real, true)]).unwrap(),
    }
}

fn times_i(ctx: &mut Context, a: ExprHandle) -> ExprHandle {
    ctx.mul(&[a, consts::I])
}

#[test]
fn test_re() {
    init_tracing();
    let mut ctx = Context::new();
    let Symbols { x, y, r } = symbols(&mut ctx);

    assert_eq!(ctx.re(consts::NAN), consts::NAN);
    assert_eq!(ctx.re(consts::INFINITY), consts::INFINITY);
    assert_eq!(ctx.re(consts::NEG_INFINITY), consts::NEG_INFINITY);
    assert_eq!(ctx.re(consts::ZERO), consts::ZERO);
    assert_eq!(ctx.re(consts::ONE), consts::ONE);
    assert_eq!(ctx.re(consts::NEG_ONE), consts::NEG_ONE);
    assert_eq!(ctx.re(consts::E), consts::E);
    let minus_e = ctx.neg(consts::E);
    assert_eq!(ctx.re(minus_e), minus_e);

    let re_x = ctx.re(x);
    assert_eq!(ctx.display(re_x).to_string(), "re(x)");

    let xi = times_i(&mut ctx, x);
    let im_x = ctx.im(x);
    let minus_im_x = ctx.neg(im_x);
    assert_eq!(ctx.re(xi), minus_im_x);

    let ri = times_i(&mut ctx, r);
    assert_eq!(ctx.re(ri), consts::ZERO);
    assert_eq!(ctx.re(r), r);

    let x_plus_y = ctx.add(&[x, y]);
    let re_y = ctx.re(y);
    let expected = ctx.add(&[re_x, re_y]);
    assert_eq!(ctx.re(x_plus_y), expected);

    let x_plus_r = ctx.add(&[x, r]);
    let expected = ctx.add(&[re_x, r]);
    assert_eq!(ctx.re(x_plus_r), expected);

    assert_eq!(ctx.re(re_x), re_x);

    let two_plus_i = ctx.add(&[consts::TWO, consts::I]);
    assert_eq!(ctx.re(two_plus_i), consts::TWO);

    let x_plus_i = ctx.add(&[x, consts::I]);
    assert_eq!(ctx.re(x_plus_i), re_x);

    let yi = times_i(&mut ctx, y);
    let x_plus_yi = ctx.add(&[x, yi]);
    let re = ctx.re(x_plus_yi);
    assert_eq!(ctx.display(re).to_string(), "re(x) - im(y)");

    let x_plus_ri = ctx.add(&[x, ri]);
    assert_eq!(ctx.re(x_plus_ri), re_x);
}

#[test]
fn test_re_of_log_uses_polar_form() {
    let mut ctx = Context::new();
    let two_i = ctx.mul(&[consts::TWO, consts::I]);
    let log = ctx.log(two_i);
    assert!(matches!(ctx.node(log), ExprNode::Apply { func: Func::Log, .. }));

    let log2 = ctx.log(consts::TWO);
    assert_eq!(ctx.re(log), log2);

    let half_pi = ctx.div(consts::PI, consts::TWO);
    assert_eq!(ctx.im(log), half_pi);
}

#[test]
fn test_parts_of_a_squared_gaussian_integer() {
    let mut ctx = Context::new();
    let two_plus_i = ctx.add(&[consts::TWO, consts::I]);
    let square = ctx.powi(two_plus_i, 2);
    let hints = ExpandHints::default().with_complex(true);

    let re = ctx.re(square);
    assert_eq!(ctx.expand(re, &hints), ctx.integer(3));
    let im = ctx.im(square);
    assert_eq!(ctx.expand(im, &hints), ctx.integer(4));
}

#[test]
fn test_im() {
    let mut ctx = Context::new();
    let Symbols { x, y, r } = symbols(&mut ctx);

    assert_eq!(ctx.im(consts::NAN), consts::NAN);

    let oo_i = times_i(&mut ctx, consts::INFINITY);
    assert_eq!(ctx.im(oo_i), consts::INFINITY);
    let minus_oo_i = ctx.neg(oo_i);
    assert_eq!(ctx.im(minus_oo_i), consts::NEG_INFINITY);

    assert_eq!(ctx.im(consts::ZERO), consts::ZERO);
    assert_eq!(ctx.im(consts::ONE), consts::ZERO);
    assert_eq!(ctx.im(consts::NEG_ONE), consts::ZERO);

    let e_i = times_i(&mut ctx, consts::E);
    assert_eq!(ctx.im(e_i), consts::E);
    let minus_e_i = ctx.neg(e_i);
    let minus_e = ctx.neg(consts::E);
    assert_eq!(ctx.im(minus_e_i), minus_e);

    let xi = times_i(&mut ctx, x);
    let re_x = ctx.re(x);
    assert_eq!(ctx.im(xi), re_x);

    let ri = times_i(&mut ctx, r);
    assert_eq!(ctx.im(ri), r);
    assert_eq!(ctx.im(r), consts::ZERO);

    let im_x = ctx.im(x);
    let x_plus_r = ctx.add(&[x, r]);
    assert_eq!(ctx.im(x_plus_r), im_x);

    let x_plus_ri = ctx.add(&[x, ri]);
    let expected = ctx.add(&[im_x, r]);
    assert_eq!(ctx.im(x_plus_ri), expected);

    let im_x_i = times_i(&mut ctx, im_x);
    assert_eq!(ctx.im(im_x_i), im_x);

    let two_plus_i = ctx.add(&[consts::TWO, consts::I]);
    assert_eq!(ctx.im(two_plus_i), consts::ONE);

    let x_plus_i = ctx.add(&[x, consts::I]);
    let expected = ctx.add(&[im_x, consts::ONE]);
    assert_eq!(ctx.im(x_plus_i), expected);

    let yi = times_i(&mut ctx, y);
    let x_plus_yi = ctx.add(&[x, yi]);
    let re_y = ctx.re(y);
    let expected = ctx.add(&[im_x, re_y]);
    assert_eq!(ctx.im(x_plus_yi), expected);
}

#[test]
fn test_sign() {
    let mut ctx = Context::new();
    let x = ctx.symbol("x");
    let p = ctx.symbol_with("p", [(Predicate::Positive, true)]).unwrap();
    let n = ctx.symbol_with("n", [(Predicate::Negative, true)]).unwrap();
    let m = ctx.symbol_with("m", [(Predicate::Negative, true)]).unwrap();

    let six_fifths = ctx.rational(6, 5);
    assert_eq!(ctx.sign(six_fifths), consts::ONE);
    let minus_six_fifths = ctx.rational(-6, 5);
    assert_eq!(ctx.sign(minus_six_fifths), consts::NEG_ONE);
    assert_eq!(ctx.sign(consts::ZERO), consts::ZERO);

    let sign_zero = ctx.sign(consts::ZERO);
    assert_eq!(ctx.ask(sign_zero, Predicate::Zero), Truth::True);
    let sign_x = ctx.sign(x);
    assert_eq!(ctx.ask(sign_x, Predicate::Zero), Truth::Unknown);

    let two_x = ctx.mul(&[consts::TWO, x]);
    assert_eq!(ctx.sign(two_x), sign_x);
    let two_p_x = ctx.mul(&[consts::TWO, p, x]);
    assert_eq!(ctx.sign(two_p_x), sign_x);

    let nx = ctx.mul(&[n, x]);
    let minus_sign_x = ctx.neg(sign_x);
    assert_eq!(ctx.sign(nx), minus_sign_x);
    let nmx = ctx.mul(&[n, m, x]);
    assert_eq!(ctx.sign(nmx), sign_x);

    assert_eq!(ctx.sign(p), consts::ONE);
    assert_eq!(ctx.sign(n), consts::NEG_ONE);
    assert_eq!(ctx.sign(consts::I), consts::I);
}

#[test]
fn test_abs_literals() {
    let mut ctx = Context::new();
    assert_eq!(ctx.abs(consts::ZERO), consts::ZERO);
    assert_eq!(ctx.abs(consts::ONE), consts::ONE);
    assert_eq!(ctx.abs(consts::NEG_ONE), consts::ONE);
    assert_eq!(ctx.abs(consts::I), consts::ONE);
    assert_eq!(ctx.abs(consts::NEG_INFINITY), consts::INFINITY);
    assert_eq!(ctx.abs(consts::COMPLEX_INFINITY), consts::INFINITY);
}

#[test]
fn test_abs_of_real_symbol() {
    let mut ctx = Context::new();
    let x = ctx.symbol_with("x", [(Predicate::Real, true)]).unwrap();
    let n = ctx.symbol_with("n", [(Predicate::Integer, true)]).unwrap();
    let abs_x = ctx.abs(x);

    // x**(2n) == Abs(x)**(2n)
    let two_n = ctx.mul(&[consts::TWO, n]);
    let lhs = ctx.pow(x, two_n);
    assert_eq!(ctx.pow(abs_x, two_n), lhs);

    let sign_x = ctx.sign(x);
    assert_eq!(ctx.diff(abs_x, x), sign_x);

    let cube = ctx.powi(abs_x, 3);
    let x2 = ctx.powi(x, 2);
    let x2_abs = ctx.mul(&[x2, abs_x]);
    assert_eq!(cube, x2_abs);

    let three = ctx.integer(3);
    let three_n = ctx.mul(&[three, n]);
    let unevaluated = ctx.pow(abs_x, three_n);
    assert_eq!(
        *ctx.node(unevaluated),
        ExprNode::Pow {
            base: abs_x,
            exp: three_n
        }
    );

    let reciprocal = ctx.div(consts::ONE, abs_x);
    assert_eq!(
        *ctx.node(reciprocal),
        ExprNode::Pow {
            base: abs_x,
            exp: consts::NEG_ONE
        }
    );

    let lhs = ctx.div(consts::ONE, cube);
    let rhs = ctx.div(consts::ONE, x2_abs);
    assert_eq!(lhs, rhs);
    assert_eq!(ctx.powi(abs_x, -3), lhs);
}

#[test]
fn test_abs_real() {
    let mut ctx = Context::new();
    let z = ctx.symbol_with("z", [(Predicate::Complex, true)]).unwrap();
    let z2 = ctx.powi(z, 2);
    let abs_z = ctx.abs(z);
    assert_ne!(ctx.sqrt(z2), abs_z);
    assert_ne!(ctx.abs(z2), z2);

    let x = ctx.symbol_with("x", [(Predicate::Real, true)]).unwrap();
    let x2 = ctx.powi(x, 2);
    let abs_x = ctx.abs(x);
    assert_eq!(ctx.sqrt(x2), abs_x);
    assert_eq!(ctx.abs(x2), x2);
}

#[test]
fn test_abs_properties() {
    let mut ctx = Context::new();
    let x = ctx.symbol("x");
    let abs_x = ctx.abs(x);
    assert_eq!(ctx.ask(abs_x, Predicate::Real), Truth::True);
    assert_eq!(ctx.ask(abs_x, Predicate::Positive), Truth::Unknown);
    assert_eq!(ctx.ask(abs_x, Predicate::Nonnegative), Truth::True);

    let w = ctx
        .symbol_with("w", [(Predicate::Complex, true), (Predicate::Zero, false)])
        .unwrap();
    let abs_w = ctx.abs(w);
    assert_eq!(ctx.ask(abs_w, Predicate::Real), Truth::True);
    assert_eq!(ctx.ask(abs_w, Predicate::Positive), Truth::True);
    assert_eq!(ctx.ask(abs_w, Predicate::Zero), Truth::False);

    let q = ctx.symbol_with("q", [(Predicate::Positive, true)]).unwrap();
    let abs_q = ctx.abs(q);
    assert_eq!(abs_q, q);
    assert_eq!(ctx.ask(abs_q, Predicate::Real), Truth::True);
    assert_eq!(ctx.ask(abs_q, Predicate::Positive), Truth::True);
    assert_eq!(ctx.ask(abs_q, Predicate::Zero), Truth::False);
}

#[test]
fn test_arg() {
    let mut ctx = Context::new();
    let p = ctx.symbol_with("p", [(Predicate::Positive, true)]).unwrap();
    let n = ctx.symbol_with("n", [(Predicate::Negative, true)]).unwrap();

    assert_eq!(ctx.arg(consts::ZERO), consts::NAN);
    assert_eq!(ctx.arg(consts::ONE), consts::ZERO);
    assert_eq!(ctx.arg(consts::NEG_ONE), consts::PI);

    let half_pi = ctx.div(consts::PI, consts::TWO);
    assert_eq!(ctx.arg(consts::I), half_pi);
    let minus_i = ctx.neg(consts::I);
    let minus_half_pi = ctx.neg(half_pi);
    assert_eq!(ctx.arg(minus_i), minus_half_pi);

    let quarter = ctx.rational(1, 4);
    let quarter_pi = ctx.mul(&[quarter, consts::PI]);
    let one_plus_i = ctx.add(&[consts::ONE, consts::I]);
    assert_eq!(ctx.arg(one_plus_i), quarter_pi);

    let three_quarters = ctx.rational(3, 4);
    let three_quarter_pi = ctx.mul(&[three_quarters, consts::PI]);
    let minus_one_plus_i = ctx.add(&[consts::NEG_ONE, consts::I]);
    assert_eq!(ctx.arg(minus_one_plus_i), three_quarter_pi);

    let one_minus_i = ctx.sub(consts::ONE, consts::I);
    let minus_quarter_pi = ctx.neg(quarter_pi);
    assert_eq!(ctx.arg(one_minus_i), minus_quarter_pi);

    assert_eq!(ctx.arg(p), consts::ZERO);
    assert_eq!(ctx.arg(n), consts::PI);
}

#[test]
fn test_conjugate() {
    let mut ctx = Context::new();
    let Symbols { x, y, r } = symbols(&mut ctx);

    assert_eq!(ctx.conjugate(r), r);
    let minus_i = ctx.neg(consts::I);
    assert_eq!(ctx.conjugate(consts::I), minus_i);

    let cx = ctx.conjugate(x);
    let cy = ctx.conjugate(y);

    let sum = ctx.add(&[x, y]);
    let expected = ctx.add(&[cx, cy]);
    assert_eq!(ctx.conjugate(sum), expected);

    let difference = ctx.sub(x, y);
    let expected = ctx.sub(cx, cy);
    assert_eq!(ctx.conjugate(difference), expected);

    let product = ctx.mul(&[x, y]);
    let expected = ctx.mul(&[cx, cy]);
    assert_eq!(ctx.conjugate(product), expected);

    let quotient = ctx.div(x, y);
    let expected = ctx.div(cx, cy);
    assert_eq!(ctx.conjugate(quotient), expected);

    assert_eq!(ctx.conjugate(cx), x);

    let re_x = ctx.re(x);
    let im_x = ctx.im(x);
    assert_eq!(ctx.re(cx), re_x);
    let minus_im_x = ctx.neg(im_x);
    assert_eq!(ctx.im(cx), minus_im_x);
}

#[test]
fn test_trig_expansion_leaves_complex_parts_alone() {
    let mut ctx = Context::new();
    let x = ctx.symbol("x");
    let hints = ExpandHints::default().with_trig(true);

    let abs_x = ctx.abs(x);
    assert_eq!(ctx.expand(abs_x, &hints), abs_x);
    let sign_x = ctx.sign(x);
    assert_eq!(ctx.expand(sign_x, &hints), sign_x);
    let arg_x = ctx.arg(x);
    assert_eq!(ctx.expand(arg_x, &hints), arg_x);
}

#[test]
fn test_trig_expansion() {
    init_tracing();
    let mut ctx = Context::new();
    let x = ctx.symbol("x");
    let y = ctx.symbol("y");
    let hints = ExpandHints::default().with_trig(true);

    let sum = ctx.add(&[x, y]);
    let s = ctx.sin(sum);
    let (sx, cx, sy, cy) = (ctx.sin(x), ctx.cos(x), ctx.sin(y), ctx.cos(y));
    let t1 = ctx.mul(&[sx, cy]);
    let t2 = ctx.mul(&[cx, sy]);
    let expected = ctx.add(&[t1, t2]);
    assert_eq!(ctx.expand(s, &hints), expected);

    let two_x = ctx.mul(&[consts::TWO, x]);
    let s2 = ctx.sin(two_x);
    let expected = ctx.mul(&[consts::TWO, sx, cx]);
    assert_eq!(ctx.expand(s2, &hints), expected);
}

#[test]
fn test_derivatives_commute_with_parts() {
    let mut ctx = Context::new();
    let x = ctx.symbol("x");
    let f = ctx.function("f", &[x]);
    let df = ctx.diff(f, x);

    let re_f = ctx.re(f);
    let expected = ctx.re(df);
    assert_eq!(ctx.diff(re_f, x), expected);

    let im_f = ctx.im(f);
    let expected = ctx.im(df);
    assert_eq!(ctx.diff(im_f, x), expected);

    let conj_f = ctx.conjugate(f);
    let expected = ctx.conjugate(df);
    assert_eq!(ctx.diff(conj_f, x), expected);
}

#[test]
fn test_abs_derivative_after_substitution() {
    init_tracing();
    let mut ctx = Context::new();
    let x = ctx.symbol_with("x", [(Predicate::Real, true)]).unwrap();
    let f = ctx.function("f", &[x]);
    let abs_f = ctx.abs(f);
    let d = ctx.diff(abs_f, x);

    let xi = times_i(&mut ctx, x);
    let line = ctx.add(&[consts::ONE, xi]);
    let replaced = ctx.subs(d, f, line);
    let done = ctx.doit(replaced);

    let x2 = ctx.powi(x, 2);
    let radicand = ctx.add(&[consts::ONE, x2]);
    let root = ctx.sqrt(radicand);
    assert_eq!(done, ctx.div(x, root));
}

#[test]
fn test_arg_derivative_after_substitution() {
    let mut ctx = Context::new();
    let x = ctx.symbol_with("x", [(Predicate::Real, true)]).unwrap();
    let f = ctx.function("f", &[x]);
    let arg_f = ctx.arg(f);
    let d = ctx.diff(arg_f, x);

    let x2 = ctx.powi(x, 2);
    let x2i = times_i(&mut ctx, x2);
    let parabola = ctx.add(&[consts::ONE, x2i]);
    let replaced = ctx.subs(d, f, parabola);
    let done = ctx.doit(replaced);

    let two_x = ctx.mul(&[consts::TWO, x]);
    let x4 = ctx.powi(x, 4);
    let denominator = ctx.add(&[consts::ONE, x4]);
    assert_eq!(done, ctx.div(two_x, denominator));
}

#[test]
fn test_complex_expansion_of_exp() {
    init_tracing();
    let mut ctx = Context::new();
    let x = ctx.symbol("x");
    let hints = ExpandHints::default().with_complex(true);

    let exp_x = ctx.exp(x);
    let e = ctx.expand(exp_x, &hints);

    // exp(re(x))*cos(im(x)) + I*exp(re(x))*sin(im(x))
    let (re_x, im_x) = (ctx.re(x), ctx.im(x));
    let scale = ctx.exp(re_x);
    let (cos, sin) = (ctx.cos(im_x), ctx.sin(im_x));
    let real = ctx.mul(&[scale, cos]);
    let imag = ctx.mul(&[scale, sin]);
    let imag = times_i(&mut ctx, imag);
    assert_eq!(e, ctx.add(&[real, imag]));
    assert_eq!(ctx.expand(e, &hints), e);
}

#[test]
fn test_complex_expansion_of_re_of_exp() {
    let mut ctx = Context::new();
    let x = ctx.symbol("x");
    let hints = ExpandHints::default().with_complex(true);

    let ix = times_i(&mut ctx, x);
    let exp_ix = ctx.exp(ix);
    let re = ctx.re(exp_ix);
    assert!(matches!(ctx.node(re), ExprNode::Apply { func: Func::Re, .. }));

    // exp(-im(x))*cos(re(x))
    let (re_x, im_x) = (ctx.re(x), ctx.im(x));
    let minus_im_x = ctx.neg(im_x);
    let scale = ctx.exp(minus_im_x);
    let cos = ctx.cos(re_x);
    let expected = ctx.mul(&[scale, cos]);
    assert_eq!(ctx.expand(re, &hints), expected);
}

#[test]
fn test_complex_expansion_without_a_rectangular_rule() {
    let mut ctx = Context::new();
    let x = ctx.symbol("x");
    let hints = ExpandHints::default().with_complex(true);
    let rect = ctx.expand(x, &hints);

    for func in [Func::Sin, Func::Cos] {
        let fx = ctx.apply(func, &[x]);
        let expected = ctx.apply(func, &[rect]);
        assert_eq!(ctx.expand(fx, &hints), expected);
    }

    let log_x = ctx.log(x);
    assert_ne!(ctx.expand(log_x, &hints), log_x);

    let sign_x = ctx.sign(x);
    assert_eq!(ctx.expand(sign_x, &hints), sign_x);
    let arg_x = ctx.arg(x);
    assert_eq!(ctx.expand(arg_x, &hints), arg_x);
}

#[test]
fn test_builtins_of_the_wrong_arity_stay_unevaluated() {
    let mut ctx = Context::new();
    let x = ctx.symbol("x");
    let y = ctx.symbol("y");
    let hints = ExpandHints::default().with_complex(true);

    let bare_log = ctx.apply(Func::Log, &[]);
    let re = ctx.re(bare_log);
    assert!(matches!(
        ctx.node(re),
        ExprNode::Apply { func: Func::Re, args } if args.len() == 1 && args[0] == bare_log
    ));

    let bare_exp = ctx.apply(Func::Exp, &[]);
    let conj = ctx.conjugate(bare_exp);
    assert!(matches!(
        ctx.node(conj),
        ExprNode::Apply { func: Func::Conjugate, args } if args.len() == 1 && args[0] == bare_exp
    ));

    let bare_abs = ctx.apply(Func::Abs, &[]);
    assert_eq!(ctx.expand(bare_abs, &hints), bare_abs);

    let exp_xy = ctx.apply(Func::Exp, &[x, y]);
    let conj = ctx.conjugate(exp_xy);
    assert!(matches!(
        ctx.node(conj),
        ExprNode::Apply { func: Func::Conjugate, args } if args.len() == 1 && args[0] == exp_xy
    ));
    let square = ctx.powi(exp_xy, 2);
    assert!(matches!(
        ctx.node(square),
        ExprNode::Pow { base, exp } if *base == exp_xy && *exp == consts::TWO
    ));

    let expanded = ctx.expand(exp_xy, &hints);
    assert!(matches!(
        ctx.node(expanded),
        ExprNode::Apply { func: Func::Exp, args } if args.len() == 2
    ));
}
