//! FFI bindings for the C baselines.

use crate::float::ExactFloat;

#[cfg(c_implementation_active)]
mod ffi {
    use libc::size_t;
    use std::os::raw::{c_double, c_float};

    extern "C" {
        pub fn dot_product_c_naive_f32(a: *const c_float, b: *const c_float, len: size_t) -> c_float;
        pub fn dot_product_c_naive_f64(a: *const c_double, b: *const c_double, len: size_t) -> c_double;
        pub fn dot_product_c_kahan_f32(a: *const c_float, b: *const c_float, len: size_t) -> c_float;
        pub fn dot_product_c_kahan_f64(a: *const c_double, b: *const c_double, len: size_t) -> c_double;
    }
}

/// Check if C implementations are available
#[cfg(c_implementation_active)]
pub const C_IMPL_AVAILABLE: bool = true;

#[cfg(not(c_implementation_active))]
pub const C_IMPL_AVAILABLE: bool = false;

/// Float types with C baseline kernels.
pub trait CBaselines: ExactFloat {
    /// C naive accumulation loop.
    fn c_naive(a: &[Self], b: &[Self]) -> Self;

    /// C Kahan accumulation loop.
    fn c_kahan(a: &[Self], b: &[Self]) -> Self;
}

macro_rules! impl_c_baselines {
    ($float:ty, $naive:ident, $kahan:ident) => {
        impl CBaselines for $float {
            #[cfg(c_implementation_active)]
            fn c_naive(a: &[Self], b: &[Self]) -> Self {
                assert_eq!(a.len(), b.len(), "Vectors must have the same length");
                // SAFETY: both pointers cover `a.len()` readable elements.
                unsafe { ffi::$naive(a.as_ptr(), b.as_ptr(), a.len()) }
            }

            #[cfg(c_implementation_active)]
            fn c_kahan(a: &[Self], b: &[Self]) -> Self {
                assert_eq!(a.len(), b.len(), "Vectors must have the same length");
                // SAFETY: both pointers cover `a.len()` readable elements.
                unsafe { ffi::$kahan(a.as_ptr(), b.as_ptr(), a.len()) }
            }

            #[cfg(not(c_implementation_active))]
            fn c_naive(_a: &[Self], _b: &[Self]) -> Self {
                panic!("C implementation not compiled (requires a C compiler)")
            }

            #[cfg(not(c_implementation_active))]
            fn c_kahan(_a: &[Self], _b: &[Self]) -> Self {
                panic!("C implementation not compiled (requires a C compiler)")
            }
        }
    };
}

impl_c_baselines!(f32, dot_product_c_naive_f32, dot_product_c_kahan_f32);
impl_c_baselines!(f64, dot_product_c_naive_f64, dot_product_c_kahan_f64);
