//! Textual rendering of expressions.
//!
//! Output follows the usual computer-algebra conventions: `x**2`,
//! `re(x) - im(y)`, `3*pi/4`, `sqrt(x**2 + 1)`.

use std::fmt;

use argand_integers::Rational;
use num_traits::One;

use crate::arena::ExprArena;
use crate::expr::{ExprNode, Func};
use crate::handle::ExprHandle;

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

/// A displayable view of an expression.
pub struct ExprDisplay<'a> {
    arena: &'a ExprArena,
    handle: ExprHandle,
}

impl ExprArena {
    /// Returns a value that renders `handle` with [`fmt::Display`].
    #[must_use]
    pub fn display(&self, handle: ExprHandle) -> ExprDisplay<'_> {
        ExprDisplay {
            arena: self,
            handle,
        }
    }
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(self.arena, self.handle, f, 0)
    }
}

impl fmt::Debug for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

fn precedence(arena: &ExprArena, h: ExprHandle) -> u8 {
    match arena.get(h) {
        ExprNode::Add(_) => PREC_ADD,
        ExprNode::Mul(_) => PREC_MUL,
        ExprNode::Number(n) if !n.is_integer() || n.is_negative() => PREC_MUL,
        ExprNode::Pow { exp, .. } => match arena.as_number(*exp) {
            Some(e) if *e == Rational::from_i64(1, 2) => PREC_ATOM,
            Some(e) if e.is_negative() => PREC_MUL,
            _ => PREC_POW,
        },
        _ => PREC_ATOM,
    }
}

fn write_expr(arena: &ExprArena, h: ExprHandle, f: &mut fmt::Formatter<'_>, outer: u8) -> fmt::Result {
    let own = precedence(arena, h);
    if own <= outer {
        f.write_str("(")?;
        write_bare(arena, h, f)?;
        f.write_str(")")
    } else {
        write_bare(arena, h, f)
    }
}

fn write_bare(arena: &ExprArena, h: ExprHandle, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match arena.get(h) {
        ExprNode::Number(n) => write!(f, "{n}"),
        ExprNode::Constant(c) => f.write_str(c.name()),
        ExprNode::Symbol(id) => match arena.symbol_entry(*id) {
            Some(entry) => f.write_str(&entry.name),
            None => write!(f, "_s{id}"),
        },
        ExprNode::Add(terms) => write_add(arena, terms, f),
        ExprNode::Mul(factors) => write_mul(arena, factors, f),
        ExprNode::Pow { base, exp } => write_pow(arena, *base, *exp, f),
        ExprNode::Apply { func, args } => {
            let name = match func {
                Func::Undefined(id) => arena.function_name(*id),
                builtin => builtin.builtin_name(),
            };
            f.write_str(name.unwrap_or("_f"))?;
            f.write_str("(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_expr(arena, *arg, f, 0)?;
            }
            f.write_str(")")
        }
        ExprNode::Derivative { expr, var } => {
            f.write_str("Derivative(")?;
            write_expr(arena, *expr, f, 0)?;
            f.write_str(", ")?;
            write_expr(arena, *var, f, 0)?;
            f.write_str(")")
        }
    }
}

/// Returns the magnitude of a negative leading coefficient, if any.
fn negated_coefficient(arena: &ExprArena, h: ExprHandle) -> Option<Rational> {
    match arena.get(h) {
        ExprNode::Number(n) if n.is_negative() => Some(-n),
        ExprNode::Mul(factors) => arena
            .as_number(factors[0])
            .filter(|c| c.is_negative())
            .map(|c| -c),
        _ => None,
    }
}

fn write_add(arena: &ExprArena, terms: &[ExprHandle], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Numeric term printed last: `x + 1` rather than `1 + x`.
    let mut ordered: Vec<ExprHandle> = terms.iter().copied().skip(1).collect();
    if arena.as_number(terms[0]).is_some() {
        ordered.push(terms[0]);
    } else {
        ordered.insert(0, terms[0]);
    }

    for (i, &term) in ordered.iter().enumerate() {
        match negated_coefficient(arena, term) {
            Some(magnitude) => {
                f.write_str(if i == 0 { "-" } else { " - " })?;
                match arena.get(term) {
                    ExprNode::Mul(factors) => write_product(arena, &magnitude, &factors[1..], f)?,
                    _ => write!(f, "{magnitude}")?,
                }
            }
            None => {
                if i > 0 {
                    f.write_str(" + ")?;
                }
                write_expr(arena, term, f, PREC_ADD)?;
            }
        }
    }
    Ok(())
}

fn write_mul(arena: &ExprArena, factors: &[ExprHandle], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match arena.as_number(factors[0]) {
        Some(c) if c.is_negative() => {
            f.write_str("-")?;
            write_product(arena, &-c, &factors[1..], f)
        }
        Some(c) => write_product(arena, c, &factors[1..], f),
        None => write_product(arena, &Rational::one(), factors, f),
    }
}

/// Writes `coeff * factors` with negative powers moved below a `/`.
fn write_product(
    arena: &ExprArena,
    coeff: &Rational,
    factors: &[ExprHandle],
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let mut numer: Vec<String> = Vec::new();
    let mut denom: Vec<String> = Vec::new();

    let num = coeff.numerator();
    let den = coeff.denominator();
    if !num.is_one() {
        numer.push(num.to_string());
    }
    if !den.is_one() {
        denom.push(den.to_string());
    }

    for &factor in factors {
        if let ExprNode::Pow { base, exp } = arena.get(factor) {
            if let Some(e) = arena.as_number(*exp).filter(|e| e.is_negative()) {
                let flipped = -e;
                let text = if flipped.is_one() {
                    format!("{}", Paren(arena, *base, PREC_MUL))
                } else if flipped == Rational::from_i64(1, 2) {
                    format!("sqrt({})", arena.display(*base))
                } else {
                    format!(
                        "{}**{}",
                        Paren(arena, *base, PREC_POW),
                        ParenNumber(&flipped)
                    )
                };
                denom.push(text);
                continue;
            }
        }
        numer.push(format!("{}", Paren(arena, factor, PREC_MUL)));
    }

    if numer.is_empty() {
        numer.push("1".to_string());
    }
    f.write_str(&numer.join("*"))?;
    match denom.len() {
        0 => Ok(()),
        1 => write!(f, "/{}", denom[0]),
        _ => write!(f, "/({})", denom.join("*")),
    }
}

fn write_pow(arena: &ExprArena, base: ExprHandle, exp: ExprHandle, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(e) = arena.as_number(exp) {
        if *e == Rational::from_i64(1, 2) {
            return write!(f, "sqrt({})", arena.display(base));
        }
        if e.is_negative() {
            let flipped = -e;
            f.write_str("1/")?;
            return if flipped.is_one() {
                write_expr(arena, base, f, PREC_MUL)
            } else if flipped == Rational::from_i64(1, 2) {
                write!(f, "sqrt({})", arena.display(base))
            } else {
                write!(f, "{}**{}", Paren(arena, base, PREC_POW), ParenNumber(&flipped))
            };
        }
    }
    write_expr(arena, base, f, PREC_POW)?;
    f.write_str("**")?;
    write_expr(arena, exp, f, PREC_POW)
}

struct Paren<'a>(&'a ExprArena, ExprHandle, u8);

impl fmt::Display for Paren<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(self.0, self.1, f, self.2)
    }
}

struct ParenNumber<'a>(&'a Rational);

impl fmt::Display for ParenNumber<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() && !self.0.is_negative() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}
