//! # Dot Product Algorithm
//!
//! The dot product computes the sum of products of corresponding elements in
//! two vectors:
//!
//! `dot(a, b) = Σ(a[i] * b[i])`
//!
//! ## Accuracy Strategies
//!
//! - **Compensation**: carry the rounding error of each addition (Kahan)
//! - **FMA**: fold each product into the sum with a single rounding
//! - **Exact accumulation**: split each product with an error-free transform
//!   and merge the parts into genus buckets without any rounding (Kobbelt)
//! - **Exact reference**: big-integer fixed point, rounded once at the end

pub mod bench;
pub mod code;
pub mod reference;
pub mod test;

pub use code::*;

use std::marker::PhantomData;

use crate::float::ExactFloat;
use crate::registry::AlgorithmRunner;
use crate::utils::accuracy::{AccuracyResult, TrialConfig};
use crate::utils::bench::InputSpec;
use crate::utils::error::BenchError;
use crate::utils::timer::{Clock, Variant};
use reference::exact_sum_of_products;

/// Validate the inputs, then compute the accurate dot product.
///
/// Returns an error instead of panicking on mismatched lengths or on
/// non-finite elements.
pub fn checked_dot_product<F: ExactFloat>(a: &[F], b: &[F]) -> Result<F, BenchError> {
    if a.len() != b.len() {
        return Err(BenchError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    for (side, values) in [("first", a), ("second", b)] {
        if let Some((index, value)) = values.iter().enumerate().find(|(_, x)| !x.is_finite()) {
            return Err(BenchError::NonFinite {
                side,
                index,
                value: value.to_f64().unwrap_or(f64::NAN),
            });
        }
    }
    Ok(dot_product_kobbelt(a, b))
}

/// Runner for one floating-point width of the dot product
pub struct DotProductRunner<F> {
    name: &'static str,
    _float: PhantomData<fn() -> F>,
}

impl<F: CBaselines> DotProductRunner<F> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            _float: PhantomData,
        }
    }
}

/// Error bound for `variant` on an input of `len` products, where
/// `magnitude` is `Σ|a[i] * b[i]|` and `exact` is the true sum.
fn tolerance<F: ExactFloat>(variant: &str, len: usize, magnitude: f64, exact: f64) -> f64 {
    let eps = F::epsilon().to_f64().unwrap_or(f64::EPSILON);
    match variant {
        // Correctly rounded: at most half an ulp
        "exact" => 0.5 * eps * exact.abs(),
        // Same-sign survivors summed once each
        "kobbelt" => F::GENUS_SLOTS as f64 * eps * exact.abs(),
        "kahan" | "c-kahan" => 3.0 * eps * magnitude,
        _ => (len + 1) as f64 * eps * magnitude,
    }
}

impl<F: CBaselines> AlgorithmRunner for DotProductRunner<F> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "Accurate sum of products of corresponding vector elements"
    }

    fn category(&self) -> &'static str {
        "math"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        code::available_variants::<F>().iter().map(|v| v.name).collect()
    }

    fn get_variant_closures<'a>(&'a self, input: &InputSpec, clock: Clock) -> Vec<Variant<'a>> {
        bench::timing_closures::<F>(input, clock)
    }

    fn run_accuracy(&self, input: &InputSpec, config: &TrialConfig) -> Vec<AccuracyResult> {
        bench::run_accuracy_trials::<F>(input, config)
    }

    fn verify(&self) -> Result<(), BenchError> {
        // Non-aligned size to exercise remainders
        let (a, b) = InputSpec::new(1023, 0x5eed).pair::<F>();
        let exact = exact_sum_of_products(&a, &b);
        let exact_value = exact.round::<f64>();
        let magnitude: f64 = a
            .iter()
            .zip(&b)
            .map(|(&x, &y)| (x.to_f64().unwrap_or(0.0) * y.to_f64().unwrap_or(0.0)).abs())
            .sum();

        for variant in code::available_variants::<F>() {
            let result = (variant.function)(&a, &b);
            let error = exact.abs_error(result);
            let bound = tolerance::<F>(variant.name, a.len(), magnitude, exact_value);
            log::debug!("{} {}: error {:e} (bound {:e})", self.name, variant.name, error, bound);
            if error > bound {
                return Err(BenchError::Verification {
                    variant: variant.name.to_string(),
                    reason: format!(
                        "expected {exact_value:e}, got {result:e}, error {error:e} exceeds {bound:e}"
                    ),
                });
            }
        }

        // `2/eps + 1 - 2/eps`: the middle term is lost by sequential accumulation
        let big = F::pow2(F::FRACTION_BITS as i32 + 1);
        let cancel_a = [big, F::one(), -big];
        let cancel_b = [F::one(); 3];
        let recovered = dot_product_kobbelt(&cancel_a, &cancel_b);
        if recovered != F::one() {
            return Err(BenchError::Verification {
                variant: "kobbelt".to_string(),
                reason: format!("cancellation case returned {recovered:e}, expected 1"),
            });
        }

        Ok(())
    }
}
