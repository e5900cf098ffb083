//! Property-based tests for exact arithmetic.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::{Integer, Rational};

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn rational_add_commutative(
            num_a in small_int(),
            den_a in non_zero_int(),
            num_b in small_int(),
            den_b in non_zero_int()
        ) {
            let a = Rational::from_i64(num_a, den_a);
            let b = Rational::from_i64(num_b, den_b);
            prop_assert_eq!(a.clone() + b.clone(), b + a);
        }

        #[test]
        fn rational_distributive(
            num_a in small_int(),
            den_a in non_zero_int(),
            num_b in small_int(),
            den_b in non_zero_int(),
            num_c in small_int(),
            den_c in non_zero_int()
        ) {
            let a = Rational::from_i64(num_a, den_a);
            let b = Rational::from_i64(num_b, den_b);
            let c = Rational::from_i64(num_c, den_c);
            prop_assert_eq!(
                a.clone() * (b.clone() + c.clone()),
                a.clone() * b + a * c
            );
        }

        #[test]
        fn rational_multiplicative_inverse(num in non_zero_int(), den in non_zero_int()) {
            let a = Rational::from_i64(num, den);
            let product = a.clone() * a.recip();
            prop_assert!(product.is_one());
        }

        #[test]
        fn powi_negative_is_reciprocal(num in non_zero_int(), exp in 1i64..6) {
            let a = Rational::from(num);
            let pos = a.powi(exp).unwrap();
            let neg = a.powi(-exp).unwrap();
            prop_assert!((pos * neg).is_one());
        }

        #[test]
        fn exact_root_of_square(n in 0i64..10_000) {
            let square = Integer::new(n * n);
            prop_assert_eq!(square.exact_root(2), Some(Integer::new(n)));
        }

        #[test]
        fn signum_matches_sign(num in small_int(), den in non_zero_int()) {
            let a = Rational::from_i64(num, den);
            let expected = (num.signum() * den.signum()) as i8;
            prop_assert_eq!(a.signum(), expected);
            prop_assert_eq!(a.is_zero(), num == 0);
        }
    }
}
