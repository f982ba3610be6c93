//! Implementation variants of the dot product.

pub mod c_impl;
mod compensated;
mod fma;
pub mod kobbelt;
mod original;

pub use c_impl::{CBaselines, C_IMPL_AVAILABLE};
pub use compensated::{dot_product_kahan, KahanSum};
pub use fma::dot_product_fma;
pub use kobbelt::{dot_product_kobbelt, sum_kobbelt, KobbeltAccumulator};
pub use original::dot_product_original;

use super::reference::dot_product_exact;
use crate::registry::{BASELINE_VARIANT, REFERENCE_VARIANT};
use crate::utils::VariantInfo;

/// Type alias for dot product function signature
pub type DotProductFn<F> = fn(&[F], &[F]) -> F;

/// Get all available variants for `F`
pub fn available_variants<F: CBaselines>() -> Vec<VariantInfo<DotProductFn<F>>> {
    let mut variants: Vec<VariantInfo<DotProductFn<F>>> = vec![
        VariantInfo {
            name: BASELINE_VARIANT,
            description: "Naive sequential accumulation",
            function: dot_product_original::<F>,
        },
        VariantInfo {
            name: "kahan",
            description: "Kahan compensated summation of rounded products",
            function: dot_product_kahan::<F>,
        },
        VariantInfo {
            name: "fma",
            description: "Fused multiply-add accumulation",
            function: dot_product_fma::<F>,
        },
        VariantInfo {
            name: "kobbelt",
            description: "Exact genus-bucket accumulation with cancellation guard",
            function: dot_product_kobbelt::<F>,
        },
        VariantInfo {
            name: REFERENCE_VARIANT,
            description: "Big-integer exact sum, correctly rounded",
            function: dot_product_exact::<F>,
        },
    ];

    if C_IMPL_AVAILABLE {
        variants.push(VariantInfo {
            name: "c-naive",
            description: "C naive accumulation loop",
            function: F::c_naive,
        });
        variants.push(VariantInfo {
            name: "c-kahan",
            description: "C Kahan accumulation loop",
            function: F::c_kahan,
        });
    }

    variants
}
