//! Naive sequential accumulation.
//!
//! Rounds every product and every partial sum. This is the speed baseline the
//! other variants are compared against, and the accuracy floor.

use crate::float::ExactFloat;

/// Compute the dot product of two vectors by plain accumulation.
///
/// # Panics
/// Panics if the vectors have different lengths.
///
/// # Example
/// ```
/// use kobbelt_dot::math::dot_product::dot_product_original;
///
/// let a = [1.0f32, 2.0, 3.0];
/// let b = [4.0f32, 5.0, 6.0];
/// assert_eq!(dot_product_original(&a, &b), 32.0);
/// ```
pub fn dot_product_original<F: ExactFloat>(a: &[F], b: &[F]) -> F {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    a.iter()
        .zip(b.iter())
        .fold(F::zero(), |total, (&x, &y)| total + x * y)
}
