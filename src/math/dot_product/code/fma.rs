//! Fused multiply-add accumulation.
//!
//! Each step rounds once instead of twice, which removes product rounding but
//! keeps the accumulation error of the naive loop.

use crate::float::ExactFloat;

/// Compute the dot product as a chain of fused multiply-adds.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_fma<F: ExactFloat>(a: &[F], b: &[F]) -> F {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    a.iter()
        .zip(b.iter())
        .fold(F::zero(), |total, (&x, &y)| x.mul_add(y, total))
}
