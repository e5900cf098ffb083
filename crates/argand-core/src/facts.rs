//! Three-valued predicates and closed assumption sets.
//!
//! A [`FactSet`] records, for every [`Predicate`], whether it is known true,
//! known false or unknown. Sets are always closed under [`IMPLICATIONS`]:
//! declaring `positive` also records `real`, `nonzero`, `complex`, and so
//! on. A set that would have to hold a predicate both true and false cannot
//! be built.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A three-valued truth value (Kleene logic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Truth {
    /// Provably true.
    True,
    /// Provably false.
    False,
    /// Not decidable from the available facts.
    #[default]
    Unknown,
}

impl Truth {
    /// Lifts a boolean.
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        if value {
            Truth::True
        } else {
            Truth::False
        }
    }

    /// Converts to `Some(bool)` when known.
    #[must_use]
    pub fn to_option(self) -> Option<bool> {
        match self {
            Truth::True => Some(true),
            Truth::False => Some(false),
            Truth::Unknown => None,
        }
    }

    /// Returns true only for [`Truth::True`].
    #[must_use]
    pub fn is_true(self) -> bool {
        self == Truth::True
    }

    /// Returns true only for [`Truth::False`].
    #[must_use]
    pub fn is_false(self) -> bool {
        self == Truth::False
    }

    /// Kleene conjunction.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    /// Kleene disjunction.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    /// Kleene negation.
    #[must_use]
    pub fn not(self) -> Self {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }
}

impl From<Option<bool>> for Truth {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Truth::Unknown, Truth::from_bool)
    }
}

/// The predicates tracked by the assumptions engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Predicate {
    /// A finite or infinite complex number.
    Complex,
    /// Lies on the (extended) real line.
    Real,
    /// An integer.
    Integer,
    /// An even integer.
    Even,
    /// An odd integer.
    Odd,
    /// Strictly greater than zero.
    Positive,
    /// Strictly less than zero.
    Negative,
    /// Equal to zero.
    Zero,
    /// Different from zero (not necessarily real).
    Nonzero,
    /// Real and not negative.
    Nonnegative,
    /// Real and not positive.
    Nonpositive,
}

impl Predicate {
    /// Every predicate, in bit order.
    pub const ALL: [Predicate; 11] = [
        Predicate::Complex,
        Predicate::Real,
        Predicate::Integer,
        Predicate::Even,
        Predicate::Odd,
        Predicate::Positive,
        Predicate::Negative,
        Predicate::Zero,
        Predicate::Nonzero,
        Predicate::Nonnegative,
        Predicate::Nonpositive,
    ];

    /// Returns the lower-case name used when parsing assumption pairs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Predicate::Complex => "complex",
            Predicate::Real => "real",
            Predicate::Integer => "integer",
            Predicate::Even => "even",
            Predicate::Odd => "odd",
            Predicate::Positive => "positive",
            Predicate::Negative => "negative",
            Predicate::Zero => "zero",
            Predicate::Nonzero => "nonzero",
            Predicate::Nonnegative => "nonnegative",
            Predicate::Nonpositive => "nonpositive",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Predicate {
    type Err = FactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Predicate::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| FactError::UnknownPredicate(s.to_string()))
    }
}

/// Errors raised while building an assumption set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FactError {
    /// The declared facts force a predicate to be both true and false.
    #[error("contradictory assumptions: `{predicate}` would be both true and false")]
    Contradiction {
        /// The predicate that received both values.
        predicate: Predicate,
    },

    /// A predicate name that the engine does not know.
    #[error("unknown predicate `{0}`")]
    UnknownPredicate(String),
}

type Literal = (Predicate, bool);

/// An implication: when every premise holds, the conclusion holds.
#[derive(Debug, Clone, Copy)]
pub struct Implication {
    /// Conjunction of premises.
    pub premises: &'static [Literal],
    /// The derived literal.
    pub conclusion: Literal,
}

const fn imp(premises: &'static [Literal], conclusion: Literal) -> Implication {
    Implication {
        premises,
        conclusion,
    }
}

use Predicate::{
    Complex, Even, Integer, Negative, Nonnegative, Nonpositive, Nonzero, Odd, Positive, Real,
    Zero,
};

/// The implication graph over predicates.
pub const IMPLICATIONS: &[Implication] = &[
    imp(&[(Integer, true)], (Real, true)),
    imp(&[(Even, true)], (Integer, true)),
    imp(&[(Even, true)], (Odd, false)),
    imp(&[(Odd, true)], (Integer, true)),
    imp(&[(Odd, true)], (Even, false)),
    imp(&[(Odd, true)], (Zero, false)),
    imp(&[(Real, true)], (Complex, true)),
    imp(&[(Complex, false)], (Real, false)),
    imp(&[(Real, false)], (Integer, false)),
    imp(&[(Real, false)], (Positive, false)),
    imp(&[(Real, false)], (Negative, false)),
    imp(&[(Real, false)], (Zero, false)),
    imp(&[(Real, false)], (Nonnegative, false)),
    imp(&[(Real, false)], (Nonpositive, false)),
    imp(&[(Integer, false)], (Even, false)),
    imp(&[(Integer, false)], (Odd, false)),
    imp(&[(Positive, true)], (Real, true)),
    imp(&[(Positive, true)], (Nonnegative, true)),
    imp(&[(Positive, true)], (Nonzero, true)),
    imp(&[(Positive, true)], (Negative, false)),
    imp(&[(Positive, true)], (Nonpositive, false)),
    imp(&[(Negative, true)], (Real, true)),
    imp(&[(Negative, true)], (Nonpositive, true)),
    imp(&[(Negative, true)], (Nonzero, true)),
    imp(&[(Negative, true)], (Positive, false)),
    imp(&[(Negative, true)], (Nonnegative, false)),
    imp(&[(Zero, true)], (Real, true)),
    imp(&[(Zero, true)], (Even, true)),
    imp(&[(Zero, true)], (Nonnegative, true)),
    imp(&[(Zero, true)], (Nonpositive, true)),
    imp(&[(Zero, true)], (Nonzero, false)),
    imp(&[(Zero, false)], (Nonzero, true)),
    imp(&[(Nonzero, true)], (Zero, false)),
    imp(&[(Nonzero, false)], (Zero, true)),
    imp(&[(Nonnegative, true)], (Real, true)),
    imp(&[(Nonnegative, true)], (Negative, false)),
    imp(&[(Nonpositive, true)], (Real, true)),
    imp(&[(Nonpositive, true)], (Positive, false)),
    imp(&[(Real, true), (Negative, false)], (Nonnegative, true)),
    imp(&[(Real, true), (Positive, false)], (Nonpositive, true)),
    imp(&[(Real, true), (Nonnegative, false)], (Negative, true)),
    imp(&[(Real, true), (Nonpositive, false)], (Positive, true)),
    imp(&[(Nonnegative, true), (Zero, false)], (Positive, true)),
    imp(&[(Nonpositive, true), (Zero, false)], (Negative, true)),
    imp(&[(Nonnegative, true), (Positive, false)], (Zero, true)),
    imp(&[(Nonpositive, true), (Negative, false)], (Zero, true)),
    imp(&[(Integer, true), (Even, false)], (Odd, true)),
    imp(&[(Integer, true), (Odd, false)], (Even, true)),
];

/// A closed set of known predicate values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FactSet {
    known: u16,
    values: u16,
}

impl FactSet {
    /// The empty set: every predicate unknown.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            known: 0,
            values: 0,
        }
    }

    /// Builds a closed set from declared predicate values.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::Contradiction`] if the declarations, after
    /// closure under the implication graph, disagree with each other.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Predicate, bool)>) -> Result<Self, FactError> {
        let mut set = Self::new();
        for (predicate, value) in pairs {
            set.assign(predicate, value)?;
        }
        set.close()
    }

    /// Builds a closed set from `(name, value)` pairs such as `("real", true)`.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::UnknownPredicate`] for an unknown name, or
    /// [`FactError::Contradiction`] for inconsistent declarations.
    pub fn parse_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, bool)>,
    ) -> Result<Self, FactError> {
        let parsed = pairs
            .into_iter()
            .map(|(name, value)| name.parse::<Predicate>().map(|p| (p, value)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_pairs(parsed)
    }

    /// Shorthand for a single declared predicate.
    ///
    /// # Errors
    ///
    /// Never fails for a single literal; the `Result` mirrors
    /// [`FactSet::from_pairs`].
    pub fn with(predicate: Predicate, value: bool) -> Result<Self, FactError> {
        Self::from_pairs([(predicate, value)])
    }

    /// Looks up a predicate.
    #[must_use]
    pub fn get(&self, predicate: Predicate) -> Truth {
        let bit = predicate.bit();
        if self.known & bit == 0 {
            Truth::Unknown
        } else {
            Truth::from_bool(self.values & bit != 0)
        }
    }

    /// Returns true if no predicate is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known == 0
    }

    /// Returns the known literals.
    pub fn iter(&self) -> impl Iterator<Item = (Predicate, bool)> + '_ {
        Predicate::ALL
            .into_iter()
            .filter_map(|p| self.get(p).to_option().map(|v| (p, v)))
    }

    /// Records a value without closing the set.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::Contradiction`] if the opposite value is known.
    pub fn assign(&mut self, predicate: Predicate, value: bool) -> Result<bool, FactError> {
        match self.get(predicate).to_option() {
            Some(existing) if existing == value => Ok(false),
            Some(_) => Err(FactError::Contradiction { predicate }),
            None => {
                let bit = predicate.bit();
                self.known |= bit;
                if value {
                    self.values |= bit;
                }
                Ok(true)
            }
        }
    }

    /// Applies the implication graph until no new literal is derived.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::Contradiction`] when a derived literal clashes
    /// with a known one.
    pub fn close(mut self) -> Result<Self, FactError> {
        loop {
            let mut changed = false;
            for rule in IMPLICATIONS {
                let fires = rule
                    .premises
                    .iter()
                    .all(|&(p, v)| self.get(p) == Truth::from_bool(v));
                if fires {
                    let (p, v) = rule.conclusion;
                    changed |= self.assign(p, v)?;
                }
            }
            if !changed {
                return Ok(self);
            }
        }
    }
}

impl fmt::Debug for FactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(p, v)| (p.name(), v))).finish()
    }
}
