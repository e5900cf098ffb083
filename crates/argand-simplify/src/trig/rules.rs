//! Angle-addition identities.

use egg::{rewrite, Rewrite};

use crate::trig::language::TrigLang;

/// Returns the expansion rules.
#[must_use]
pub fn rules() -> Vec<Rewrite<TrigLang, ()>> {
    vec![
        // sin(a + b) = sin(a)*cos(b) + cos(a)*sin(b)
        rewrite!("sin-sum"; "(sin (+ ?a ?b))" => "(+ (* (sin ?a) (cos ?b)) (* (cos ?a) (sin ?b)))"),
        // cos(a + b) = cos(a)*cos(b) - sin(a)*sin(b)
        rewrite!("cos-sum"; "(cos (+ ?a ?b))" => "(+ (* (cos ?a) (cos ?b)) (* -1 (* (sin ?a) (sin ?b))))"),
        rewrite!("sin-zero"; "(sin 0)" => "0"),
        rewrite!("cos-zero"; "(cos 0)" => "1"),
    ]
}
