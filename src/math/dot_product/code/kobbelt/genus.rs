//! Genus classification.
//!
//! A genus folds the exponent field and the lowest fraction bit into one id:
//! `2 * exponent_field + mantissa_low_bit`. Two values of the same genus share
//! exponent and parity, so their sum is exact. Two values of paired genus
//! (`g` and `g ^ 1`) share the exponent, so their difference is exact.

use crate::float::ExactFloat;

/// Magnitude/parity bucket of a finite non-zero value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Genus(i32);

impl Genus {
    /// Classify `value`. Zero, NaN and infinities are outside the contract.
    #[inline(always)]
    pub fn of<F: ExactFloat>(value: F) -> Self {
        debug_assert!(
            value.is_finite() && value != F::zero(),
            "genus of {value:e} is undefined"
        );
        Genus((value.exponent_field() * 2 + (value.mantissa_low_bit() & 1)) as i32)
    }

    /// The other genus of the same exponent.
    #[inline(always)]
    pub fn paired(self) -> Self {
        Genus(self.0 ^ 1)
    }

    /// Exponent class shared by a genus and its pair.
    #[inline(always)]
    pub fn class(self) -> i32 {
        self.0 & !1
    }

    #[inline(always)]
    pub fn id(self) -> i32 {
        self.0
    }

    /// Slot of this genus in a table arena.
    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub(crate) fn from_index(index: usize) -> Self {
        Genus(index as i32)
    }
}
