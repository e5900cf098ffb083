//! Expression node types.
//!
//! This module defines the node shapes stored in the arena. There is no
//! subtraction, negation or division node: `-x` is `Mul(-1, x)` and `a / b`
//! is `Mul(a, Pow(b, -1))`, so every rewrite rule only has to recognise
//! sums, products and powers.

use argand_integers::Rational;
use smallvec::SmallVec;

use crate::handle::ExprHandle;

/// Unique identifier for a symbol (name plus assumption set).
pub type SymbolId = u32;

/// Unique identifier for an undefined function name such as `f`.
pub type FunctionId = u32;

/// Argument list of a sum or product.
pub type Terms = SmallVec<[ExprHandle; 4]>;

/// Argument list of a function application.
pub type Args = SmallVec<[ExprHandle; 2]>;

/// Special constants, interned once per arena at fixed handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// The imaginary unit `I`.
    ImaginaryUnit,
    /// Archimedes' constant.
    Pi,
    /// Euler's number.
    E,
    /// Positive real infinity `oo`.
    Infinity,
    /// Negative real infinity `-oo`.
    NegativeInfinity,
    /// Unsigned complex infinity `zoo`.
    ComplexInfinity,
    /// Not-a-number; absorbs every operation it takes part in.
    NaN,
}

impl Constant {
    /// Returns the printed name of the constant.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Constant::ImaginaryUnit => "I",
            Constant::Pi => "pi",
            Constant::E => "E",
            Constant::Infinity => "oo",
            Constant::NegativeInfinity => "-oo",
            Constant::ComplexInfinity => "zoo",
            Constant::NaN => "nan",
        }
    }

    /// Returns true for `oo`, `-oo` and `zoo`.
    #[must_use]
    pub fn is_infinite(self) -> bool {
        matches!(
            self,
            Constant::Infinity | Constant::NegativeInfinity | Constant::ComplexInfinity
        )
    }
}

/// Function kinds that can be applied to arguments.
///
/// The set is closed; per-kind behaviour is looked up in the rule table of
/// the simplifier rather than dispatched through trait objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    /// Real part.
    Re,
    /// Imaginary part.
    Im,
    /// Argument (phase angle) in `(-pi, pi]`.
    Arg,
    /// Complex conjugate.
    Conjugate,
    /// Complex sign `z/|z|`.
    Sign,
    /// Absolute value.
    Abs,
    /// Natural exponential.
    Exp,
    /// Principal natural logarithm.
    Log,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Arctangent.
    Atan,
    /// A user-declared function with no known rules.
    Undefined(FunctionId),
}

impl Func {
    /// Returns the printed name for built-in kinds, `None` for undefined ones.
    #[must_use]
    pub fn builtin_name(self) -> Option<&'static str> {
        let name = match self {
            Func::Re => "re",
            Func::Im => "im",
            Func::Arg => "arg",
            Func::Conjugate => "conjugate",
            Func::Sign => "sign",
            Func::Abs => "Abs",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Atan => "atan",
            Func::Undefined(_) => return None,
        };
        Some(name)
    }

    /// Returns true for the derived complex operations.
    #[must_use]
    pub fn is_complex_part(self) -> bool {
        matches!(
            self,
            Func::Re | Func::Im | Func::Arg | Func::Conjugate | Func::Sign | Func::Abs
        )
    }
}

/// An expression node stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    // === Atoms ===
    /// An exact rational number (integers included).
    Number(Rational),

    /// A special constant.
    Constant(Constant),

    /// A symbolic variable.
    Symbol(SymbolId),

    // === Compound Expressions ===
    /// Sum of expressions.
    ///
    /// Invariant: at least 2 arguments, numeric term first, the rest sorted.
    Add(Terms),

    /// Product of expressions.
    ///
    /// Invariant: at least 2 arguments, numeric coefficient first, the rest
    /// sorted.
    Mul(Terms),

    /// Power expression: base^exp.
    Pow {
        /// The base of the power.
        base: ExprHandle,
        /// The exponent.
        exp: ExprHandle,
    },

    /// A function application: f(arg1, arg2, ...).
    Apply {
        /// The function kind.
        func: Func,
        /// The arguments.
        args: Args,
    },

    /// An unevaluated derivative `d expr / d var`.
    Derivative {
        /// The differentiated expression.
        expr: ExprHandle,
        /// The differentiation variable (a symbol).
        var: ExprHandle,
    },
}

impl ExprNode {
    /// Returns true if this node is an atom (no children).
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            ExprNode::Number(_) | ExprNode::Constant(_) | ExprNode::Symbol(_)
        )
    }

    /// Returns the rational value if this node is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            ExprNode::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the function kind and arguments of an application.
    #[must_use]
    pub fn as_apply(&self) -> Option<(Func, &[ExprHandle])> {
        match self {
            ExprNode::Apply { func, args } => Some((*func, args.as_slice())),
            _ => None,
        }
    }

    /// Returns the children of this node.
    #[must_use]
    pub fn children(&self) -> Terms {
        match self {
            ExprNode::Number(_) | ExprNode::Constant(_) | ExprNode::Symbol(_) => Terms::new(),
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![*base, *exp],
            ExprNode::Apply { args, .. } => args.iter().copied().collect(),
            ExprNode::Derivative { expr, var } => smallvec::smallvec![*expr, *var],
        }
    }
}
