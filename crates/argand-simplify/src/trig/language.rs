//! The expression language for the trigonometric e-graph.

use egg::{define_language, Id, Symbol};

define_language! {
    /// Sums and products of sines and cosines over opaque leaves.
    pub enum TrigLang {
        // Integer literals
        Num(i64),
        // Placeholders for anything that is not a sum, product or sin/cos
        Symbol(Symbol),

        "+" = Add([Id; 2]),
        "*" = Mul([Id; 2]),

        "sin" = Sin(Id),
        "cos" = Cos(Id),
    }
}

impl TrigLang {
    /// Returns true for `sin` and `cos` nodes.
    #[must_use]
    pub fn is_trig(&self) -> bool {
        matches!(self, TrigLang::Sin(_) | TrigLang::Cos(_))
    }
}
