//! IEEE binary floating-point layout access.
//!
//! [`ExactFloat`] is the one abstraction the accumulation code is generic over.
//! It exposes the raw bit fields the genus classifier reads, the error-free
//! product transform, and lossless conversion to and from an integer
//! significand/exponent pair for the big-integer reference.

use num_traits::Float;
use rand::distr::uniform::SampleUniform;
use std::fmt::{Debug, Display, LowerExp};

/// A binary IEEE 754 type whose bit layout can be read and rebuilt exactly.
pub trait ExactFloat:
    Float + Default + Debug + Display + LowerExp + SampleUniform + Send + Sync + 'static
{
    /// Short type name used in algorithm and variant names.
    const NAME: &'static str;

    /// Width of the stored fraction field (precision minus the hidden bit).
    const FRACTION_BITS: u32;

    /// Width of the biased exponent field.
    const EXPONENT_BITS: u32;

    /// Exponent of the least significant bit of the smallest subnormal.
    const MIN_LSB_EXP: i32;

    /// Largest unbiased exponent of a finite value.
    const MAX_FINITE_EXP: i32;

    /// Number of distinct genus ids a finite value can produce.
    const GENUS_SLOTS: usize = 1usize << (Self::EXPONENT_BITS + 1);

    /// Biased exponent field, `0` for zero and subnormals.
    fn exponent_field(self) -> u32;

    /// Least significant bit of the stored fraction.
    fn mantissa_low_bit(self) -> u32;

    /// Sign, integer significand and exponent such that
    /// `self == (-1)^sign * significand * 2^exponent` exactly.
    fn decompose(self) -> (bool, u64, i32);

    /// Exact power of two, saturating to `0` below the subnormal range and to
    /// infinity above the finite range.
    fn pow2(exp: i32) -> Self;

    /// Rebuild `significand * 2^exp`. Exact whenever the value is
    /// representable, which holds for `significand <= 2^(FRACTION_BITS + 1)`
    /// and `exp >= MIN_LSB_EXP`.
    fn from_parts(negative: bool, significand: u64, exp: i32) -> Self {
        let significand =
            <Self as num_traits::NumCast>::from(significand).unwrap_or_else(Self::infinity);
        let magnitude = significand * Self::pow2(exp);
        if negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Error-free product: `hi` is the rounded product and `hi + lo` equals
    /// `self * rhs` exactly, barring underflow of `lo`.
    #[inline(always)]
    fn two_product(self, rhs: Self) -> (Self, Self) {
        let hi = self * rhs;
        let lo = self.mul_add(rhs, -hi);
        (hi, lo)
    }

    /// Precision of the type in bits, hidden bit included.
    fn precision() -> u32 {
        Self::FRACTION_BITS + 1
    }
}

macro_rules! impl_exact_float {
    ($float:ty, $bits:ty, $name:literal, $fraction:literal, $exponent:literal) => {
        impl ExactFloat for $float {
            const NAME: &'static str = $name;
            const FRACTION_BITS: u32 = $fraction;
            const EXPONENT_BITS: u32 = $exponent;
            const MIN_LSB_EXP: i32 = 2 - (1 << ($exponent - 1)) - $fraction;
            const MAX_FINITE_EXP: i32 = (1 << ($exponent - 1)) - 1;

            #[inline(always)]
            fn exponent_field(self) -> u32 {
                ((self.to_bits() >> $fraction) & ((1 << $exponent) - 1)) as u32
            }

            #[inline(always)]
            fn mantissa_low_bit(self) -> u32 {
                (self.to_bits() & 1) as u32
            }

            fn decompose(self) -> (bool, u64, i32) {
                let bits = self.to_bits();
                let negative = self.is_sign_negative();
                let field = self.exponent_field() as i32;
                let fraction = (bits & ((1 << $fraction) - 1)) as u64;
                if field == 0 {
                    (negative, fraction, Self::MIN_LSB_EXP)
                } else {
                    (
                        negative,
                        fraction | (1u64 << $fraction),
                        field - 1 + Self::MIN_LSB_EXP,
                    )
                }
            }

            fn pow2(exp: i32) -> Self {
                let min_normal = Self::MIN_LSB_EXP + $fraction;
                if exp > Self::MAX_FINITE_EXP {
                    <$float>::INFINITY
                } else if exp >= min_normal {
                    let field = (exp + Self::MAX_FINITE_EXP) as $bits;
                    <$float>::from_bits(field << $fraction)
                } else if exp >= Self::MIN_LSB_EXP {
                    <$float>::from_bits((1 as $bits) << (exp - Self::MIN_LSB_EXP))
                } else {
                    0.0
                }
            }
        }
    };
}

impl_exact_float!(f32, u32, "f32", 23, 8);
impl_exact_float!(f64, u64, "f64", 52, 11);
