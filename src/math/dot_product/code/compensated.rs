//! Kahan compensated accumulation of rounded products.
//!
//! The running correction recovers the bits lost by each addition, but the
//! rounding of each product is not recovered.

use crate::float::ExactFloat;

/// Running Kahan sum.
#[derive(Clone, Copy, Debug, Default)]
pub struct KahanSum<F: ExactFloat> {
    sum: F,
    compensation: F,
}

impl<F: ExactFloat> KahanSum<F> {
    pub fn new() -> Self {
        Self {
            sum: F::zero(),
            compensation: F::zero(),
        }
    }

    #[inline]
    pub fn add(&mut self, value: F) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    #[inline]
    pub fn value(&self) -> F {
        self.sum
    }
}

/// Compute the dot product with Kahan summation of the products.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_kahan<F: ExactFloat>(a: &[F], b: &[F]) -> F {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    let mut kahan = KahanSum::new();
    for (&x, &y) in a.iter().zip(b) {
        kahan.add(x * y);
    }
    kahan.value()
}
