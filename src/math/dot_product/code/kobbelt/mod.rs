//! Kobbelt's exact-accumulation dot product.
//!
//! Every product is split into two exactly representable parts with an
//! error-free transform. The parts are merged into a genus-bucket table where
//! every merge is exact, then a cancellation guard spreads large terms down
//! before they meet smaller terms of opposite sign, and the survivors are
//! summed in ascending genus order.
//!
//! The method improves accuracy substantially over sequential accumulation;
//! it does not promise a correctly rounded result for every input.

mod genus;
mod sweep;
mod table;

pub use genus::Genus;
pub use sweep::{sweep, SweepLimit, SweepReport, DEFAULT_EVENTS_PER_SLOT};
pub use table::BucketTable;

use crate::float::ExactFloat;

/// Streaming accumulator over one table.
///
/// One accumulator per dot product; nothing is shared between instances.
pub struct KobbeltAccumulator<F: ExactFloat> {
    table: BucketTable<F>,
    limit: SweepLimit,
}

impl<F: ExactFloat> KobbeltAccumulator<F> {
    pub fn new() -> Self {
        Self::with_limit(SweepLimit::for_type::<F>())
    }

    pub fn with_limit(limit: SweepLimit) -> Self {
        Self {
            table: BucketTable::new(),
            limit,
        }
    }

    /// Add `a * b` exactly.
    #[inline]
    pub fn add_product(&mut self, a: F, b: F) {
        let (hi, lo) = a.two_product(b);
        self.table.insert(hi);
        // `lo` carries no information once the product overflowed.
        if hi.is_finite() {
            self.table.insert(lo);
        }
    }

    /// Add a single term exactly.
    #[inline]
    pub fn add(&mut self, value: F) {
        self.table.insert(value);
    }

    pub fn table(&self) -> &BucketTable<F> {
        &self.table
    }

    /// Run the cancellation guard and reduce.
    pub fn finish(self) -> F {
        self.finish_with_report().0
    }

    pub fn finish_with_report(mut self) -> (F, SweepReport) {
        let report = sweep(&mut self.table, self.limit);
        (self.table.reduce(), report)
    }
}

impl<F: ExactFloat> Default for KobbeltAccumulator<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Accurate dot product of two equally long vectors.
///
/// Zero-length input returns `0` without building a table. A product or
/// partial sum that overflows makes the result infinite, as with plain
/// accumulation.
///
/// # Panics
/// Panics if the vectors have different lengths.
///
/// # Example
/// ```
/// use kobbelt_dot::math::dot_product::dot_product_kobbelt;
///
/// let a = [1e16, 1.0, -1e16];
/// let b = [1.0, 1.0, 1.0];
/// assert_eq!(dot_product_kobbelt(&a, &b), 1.0);
/// ```
pub fn dot_product_kobbelt<F: ExactFloat>(a: &[F], b: &[F]) -> F {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");
    if a.is_empty() {
        return F::zero();
    }

    let mut acc = KobbeltAccumulator::new();
    for (&x, &y) in a.iter().zip(b) {
        acc.add_product(x, y);
    }
    acc.finish()
}

/// Accurate sum of a sequence with the same bucket machinery.
pub fn sum_kobbelt<F: ExactFloat, I: IntoIterator<Item = F>>(values: I) -> F {
    let mut acc = KobbeltAccumulator::new();
    for value in values {
        acc.add(value);
    }
    acc.finish()
}
