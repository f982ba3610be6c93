//! Test utilities for dot product implementations.

#[cfg(test)]
mod tests {
    use crate::float::ExactFloat;
    use crate::math::dot_product::code::*;
    use crate::math::dot_product::reference::{dot_product_exact, exact_sum_of_products};
    use crate::math::dot_product::checked_dot_product;
    use crate::utils::bench::InputSpec;
    use crate::utils::error::BenchError;
    use proptest::prelude::*;

    /// Per-call bound for the accumulator: same-sign survivors in distinct
    /// genera, summed smallest first.
    fn kobbelt_bound<F: ExactFloat>(exact: f64) -> f64 {
        8.0 * F::epsilon().to_f64().unwrap() * exact.abs()
    }

    #[test]
    fn test_original_basic() {
        let a = [1.0f32, 2.0, 3.0, 4.0];
        let b = [5.0f32, 6.0, 7.0, 8.0];
        // 1*5 + 2*6 + 3*7 + 4*8 = 70
        for variant in available_variants::<f32>() {
            assert_eq!((variant.function)(&a, &b), 70.0, "variant {}", variant.name);
        }
    }

    #[test]
    fn test_zero_length() {
        let empty: [f64; 0] = [];
        for variant in available_variants::<f64>() {
            assert_eq!((variant.function)(&empty, &empty), 0.0, "variant {}", variant.name);
        }
    }

    #[test]
    fn test_single() {
        assert_eq!(dot_product_kobbelt(&[3.0f64], &[4.0]), 12.0);
        assert_eq!(dot_product_kobbelt(&[-0.0f64], &[4.0]), 0.0);
    }

    #[test]
    fn test_cancellation_is_recovered() {
        let a = [1e16f64, 1.0, -1e16];
        let b = [1.0f64, 1.0, 1.0];
        assert_eq!(dot_product_original(&a, &b), 0.0);
        assert_eq!(dot_product_kobbelt(&a, &b), 1.0);
        assert_eq!(dot_product_exact(&a, &b), 1.0);

        let a = [16777216.0f32, 1.0, -16777216.0];
        let b = [1.0f32; 3];
        assert_eq!(dot_product_original(&a, &b), 0.0);
        assert_eq!(dot_product_kobbelt(&a, &b), 1.0);
    }

    #[test]
    fn test_rounds_like_exact_on_tie() {
        // 1e16 + 3 is not representable; both round to the even neighbour
        let a = [1e16f64, 3.0];
        let b = [1.0f64, 1.0];
        assert_eq!(dot_product_kobbelt(&a, &b), 1e16 + 4.0);
        assert_eq!(dot_product_kobbelt(&a, &b), dot_product_exact(&a, &b));
    }

    #[test]
    fn test_product_error_is_kept() {
        // (1 + eps) * (1 - eps) = 1 - eps^2, whose rounding loses eps^2
        let eps = f64::EPSILON;
        let a = [1.0 + eps, -1.0];
        let b = [1.0 - eps, 1.0];
        assert_eq!(dot_product_original(&a, &b), 0.0);
        assert_eq!(dot_product_kobbelt(&a, &b), -eps * eps);
        assert_eq!(dot_product_exact(&a, &b), -eps * eps);
    }

    #[test]
    fn test_idempotent() {
        let (a, b) = InputSpec::new(777, 11).pair::<f64>();
        let first = dot_product_kobbelt(&a, &b);
        let second = dot_product_kobbelt(&a, &b);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_length_mismatch_panics() {
        dot_product_kobbelt(&[1.0f64, 2.0], &[1.0]);
    }

    #[test]
    fn test_checked_dot_product() {
        assert_eq!(checked_dot_product(&[2.0f64, 3.0], &[4.0, 5.0]).unwrap(), 23.0);

        match checked_dot_product(&[1.0f64, 2.0], &[1.0]) {
            Err(BenchError::LengthMismatch { left: 2, right: 1 }) => {}
            other => panic!("unexpected {other:?}"),
        }

        match checked_dot_product(&[1.0f32, 2.0], &[1.0, f32::INFINITY]) {
            Err(BenchError::NonFinite { side, index, value }) => {
                assert_eq!(side, "second");
                assert_eq!(index, 1);
                assert_eq!(value, f64::INFINITY);
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            checked_dot_product(&[f64::NAN], &[1.0]),
            Err(BenchError::NonFinite { side: "first", index: 0, .. })
        ));
    }

    #[test]
    fn test_overflow_matches_plain_accumulation() {
        let cases: [(&[f64], &[f64]); 4] = [
            (&[f64::MAX, f64::MAX], &[1.0, 1.0]),
            (&[1e200], &[1e200]),
            (&[1e200, 3.0], &[-1e200, 2.0]),
            (&[1e200, 1.0], &[1e200, -1.0]),
        ];
        for (a, b) in cases {
            let naive = dot_product_original(a, b);
            assert!(naive.is_infinite());
            assert_eq!(dot_product_kobbelt(a, b), naive, "{a:?} . {b:?}");
            assert_eq!(checked_dot_product(a, b).unwrap(), naive);
        }

        assert_eq!(dot_product_kobbelt(&[1e20f32], &[1e20]), f32::INFINITY);
        assert_eq!(dot_product_kobbelt(&[f32::MAX, 2.0], &[-2.0, 1.0]), f32::NEG_INFINITY);
    }

    fn random_trials<F: CBaselines>() {
        let input = InputSpec::new(1024, 0xACC);
        let mut naive_error = 0.0;
        let mut kahan_error = 0.0;
        let mut kobbelt_error = 0.0;

        for trial in 0..64 {
            let (a, b) = input.reseeded(trial).pair::<F>();
            let exact = exact_sum_of_products(&a, &b);
            let exact_value = exact.round::<f64>();

            let result = dot_product_kobbelt(&a, &b);
            let error = exact.abs_error(result);
            assert!(
                error <= kobbelt_bound::<F>(exact_value),
                "{} trial {trial}: error {error:e} against {exact_value:e}",
                F::NAME
            );

            kobbelt_error += error;
            naive_error += exact.abs_error(dot_product_original(&a, &b));
            kahan_error += exact.abs_error(dot_product_kahan(&a, &b));
        }

        assert!(
            kobbelt_error < naive_error,
            "{}: kobbelt {kobbelt_error:e} vs naive {naive_error:e}",
            F::NAME
        );
        assert!(
            kobbelt_error <= kahan_error,
            "{}: kobbelt {kobbelt_error:e} vs kahan {kahan_error:e}",
            F::NAME
        );
    }

    #[test]
    fn test_random_trials_f32() {
        random_trials::<f32>();
    }

    #[test]
    fn test_random_trials_f64() {
        random_trials::<f64>();
    }

    proptest! {
        #[test]
        fn prop_kobbelt_close_to_exact(
            pairs in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..64)
        ) {
            let (a, b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let exact = exact_sum_of_products(&a, &b);
            let error = exact.abs_error(dot_product_kobbelt(&a, &b));
            prop_assert!(error <= kobbelt_bound::<f64>(exact.round::<f64>()));
        }

        #[test]
        fn prop_kobbelt_exact_on_integers(
            pairs in prop::collection::vec((-500i32..500, -500i32..500), 0..64)
        ) {
            let a: Vec<f32> = pairs.iter().map(|&(x, _)| x as f32).collect();
            let b: Vec<f32> = pairs.iter().map(|&(_, y)| y as f32).collect();
            let expected: i64 = pairs.iter().map(|&(x, y)| x as i64 * y as i64).sum();
            prop_assert_eq!(dot_product_kobbelt(&a, &b), expected as f32);
        }
    }
}
