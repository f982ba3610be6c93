//! Exact big-integer reference.
//!
//! Every finite product of two binary floats is an integer multiple of
//! `2^(2 * MIN_LSB_EXP)`, so a fixed-point big integer anchored below that
//! holds any sum of products without error. Rounding back to a float happens
//! once, to nearest with ties to even.

use crate::float::ExactFloat;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};

/// Exponent of the fixed-point unit, below the lowest product bit of `f64`.
const UNIT_EXP: i32 = 2 * -1074;

/// Exact running sum of floats and float products.
#[derive(Clone, Debug, Default)]
pub struct ExactSum {
    units: BigInt,
}

impl ExactSum {
    pub fn new() -> Self {
        Self {
            units: BigInt::zero(),
        }
    }

    fn accumulate(&mut self, negative: bool, magnitude: BigUint, exp: i32) {
        if magnitude.is_zero() {
            return;
        }
        debug_assert!(exp >= UNIT_EXP, "exponent {exp} below the fixed-point unit");
        let shifted = BigInt::from(magnitude) << (exp - UNIT_EXP) as usize;
        if negative {
            self.units -= shifted;
        } else {
            self.units += shifted;
        }
    }

    /// Add `value` exactly.
    pub fn add<F: ExactFloat>(&mut self, value: F) {
        let (negative, significand, exp) = value.decompose();
        self.accumulate(negative, BigUint::from(significand), exp);
    }

    /// Add `a * b` exactly.
    pub fn add_product<F: ExactFloat>(&mut self, a: F, b: F) {
        let (neg_a, sig_a, exp_a) = a.decompose();
        let (neg_b, sig_b, exp_b) = b.decompose();
        let magnitude = BigUint::from(sig_a as u128 * sig_b as u128);
        self.accumulate(neg_a != neg_b, magnitude, exp_a + exp_b);
    }

    pub fn is_zero(&self) -> bool {
        self.units.is_zero()
    }

    /// `|value - self|`, computed exactly and rounded once to `f64`.
    pub fn abs_error<F: ExactFloat>(&self, value: F) -> f64 {
        if !value.is_finite() {
            return f64::INFINITY;
        }
        let mut diff = self.clone();
        diff.add(-value);
        diff.round::<f64>().abs()
    }

    /// Round to the nearest `F`, ties to even. Overflows to infinity.
    pub fn round<F: ExactFloat>(&self) -> F {
        let (sign, magnitude) = (self.units.sign(), self.units.magnitude());
        if sign == Sign::NoSign {
            return F::zero();
        }
        let negative = sign == Sign::Minus;

        let bits = magnitude.bits() as i64;
        let precision = F::precision() as i64;
        let unit = UNIT_EXP as i64;
        // Exponent of the last kept bit: full precision, or the subnormal floor.
        let lsb_exp = (bits + unit - precision).max(F::MIN_LSB_EXP as i64);
        let shift = (lsb_exp - unit) as usize;

        let mut kept = magnitude >> shift;
        let dropped = magnitude - (&kept << shift);
        let half = BigUint::from(1u8) << (shift - 1);
        if dropped > half || (dropped == half && kept.bit(0)) {
            kept += 1u8;
        }

        if lsb_exp > i32::MAX as i64 {
            return if negative { F::neg_infinity() } else { F::infinity() };
        }
        match kept.to_u64() {
            Some(significand) => F::from_parts(negative, significand, lsb_exp as i32),
            None if negative => F::neg_infinity(),
            None => F::infinity(),
        }
    }
}

/// Exact dot product rounded once to `F`.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_exact<F: ExactFloat>(a: &[F], b: &[F]) -> F {
    exact_sum_of_products(a, b).round()
}

/// Exact unrounded dot product.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn exact_sum_of_products<F: ExactFloat>(a: &[F], b: &[F]) -> ExactSum {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    let mut sum = ExactSum::new();
    for (&x, &y) in a.iter().zip(b) {
        sum.add_product(x, y);
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_empty_is_zero() {
        let sum = exact_sum_of_products::<f64>(&[], &[]);
        assert!(sum.is_zero());
        assert_eq!(sum.round::<f64>(), 0.0);
    }

    #[test]
    fn test_exact_cancellation() {
        let a = [1e16, 1.0, -1e16];
        let b = [1.0, 1.0, 1.0];
        assert_eq!(dot_product_exact(&a, &b), 1.0);
    }

    #[test]
    fn test_round_ties_to_even() {
        // 1e16 + 3 sits halfway between 1e16 + 2 and 1e16 + 4
        let mut sum = ExactSum::new();
        sum.add(1e16f64);
        sum.add(3.0f64);
        assert_eq!(sum.round::<f64>(), 1e16 + 4.0);

        let mut sum = ExactSum::new();
        sum.add(1.0f64);
        sum.add(f64::EPSILON / 2.0);
        assert_eq!(sum.round::<f64>(), 1.0);
    }

    #[test]
    fn test_round_to_nearest() {
        let mut sum = ExactSum::new();
        sum.add(1.0f64);
        sum.add(f64::EPSILON * 0.75);
        assert_eq!(sum.round::<f64>(), 1.0 + f64::EPSILON);

        let mut sum = ExactSum::new();
        sum.add(-1.0f32);
        sum.add(-f32::EPSILON * 0.25);
        assert_eq!(sum.round::<f32>(), -1.0);
    }

    #[test]
    fn test_round_into_wider_type() {
        // 0.1f32 is exact in f64
        let mut sum = ExactSum::new();
        sum.add(0.1f32);
        assert_eq!(sum.round::<f64>(), 0.1f32 as f64);
    }

    #[test]
    fn test_products_below_subnormal_range() {
        let tiny = f64::from_bits(1);
        let mut sum = ExactSum::new();
        sum.add_product(tiny, tiny);
        assert!(!sum.is_zero());
        assert_eq!(sum.round::<f64>(), 0.0);

        // Sticky bits still decide rounding above them
        sum.add(tiny);
        assert_eq!(sum.round::<f64>(), tiny);
    }

    #[test]
    fn test_subnormal_result() {
        let mut sum = ExactSum::new();
        sum.add(f64::MIN_POSITIVE);
        sum.add(-f64::MIN_POSITIVE / 2.0);
        assert_eq!(sum.round::<f64>(), f64::MIN_POSITIVE / 2.0);
    }

    #[test]
    fn test_overflow_rounds_to_infinity() {
        let mut sum = ExactSum::new();
        sum.add(f64::MAX);
        sum.add(f64::MAX);
        assert_eq!(sum.round::<f64>(), f64::INFINITY);
        assert_eq!(sum.round::<f32>(), f32::INFINITY);
    }

    #[test]
    fn test_abs_error_is_measured_exactly() {
        let sum = exact_sum_of_products(&[1e16f64, 1.0, -1e16], &[1.0, 1.0, 1.0]);
        assert_eq!(sum.abs_error(0.0f64), 1.0);
        assert_eq!(sum.abs_error(1.0f64), 0.0);
        assert_eq!(sum.abs_error(f64::NAN), f64::INFINITY);

        // Unrounded value 1 + 2^-30 is not an f32
        let mut sum = ExactSum::new();
        sum.add(1.0f64);
        sum.add(2f64.powi(-30));
        assert_eq!(sum.abs_error(1.0f32), 2f64.powi(-30));
    }

    #[test]
    fn test_f32_products_are_exact() {
        let a = [16777215.0f32, -16777215.0];
        let b = [16777215.0f32, 16777213.0];
        // 16777215 * (16777215 - 16777213) = 33554430
        assert_eq!(dot_product_exact(&a, &b), 33554430.0f32);
    }
}
