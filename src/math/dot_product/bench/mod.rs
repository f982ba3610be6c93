//! Benchmark utilities for dot product.

use std::rc::Rc;

use super::code::{available_variants, CBaselines};
use super::reference::exact_sum_of_products;
use crate::measure;
use crate::utils::accuracy::{AccuracyResult, AccuracyTally, TrialConfig};
use crate::utils::bench::InputSpec;
use crate::utils::timer::{Clock, Variant};

/// One timed closure per variant, all sharing the same generated input.
pub fn timing_closures<'a, F: CBaselines>(input: &InputSpec, clock: Clock) -> Vec<Variant<'a>> {
    let (a, b) = input.pair::<F>();
    let a = Rc::new(a);
    let b = Rc::new(b);

    available_variants::<F>()
        .into_iter()
        .map(|v| {
            let a = Rc::clone(&a);
            let b = Rc::clone(&b);
            let func = v.function;

            Variant {
                name: v.name,
                description: v.description,
                run: Box::new(move || {
                    let (elapsed, result) = measure!(clock, func(&a, &b));
                    (elapsed, result.to_f64())
                }),
            }
        })
        .collect()
}

/// Accuracy trials over fresh inputs derived from `input`.
///
/// Trial `t` uses `input.reseeded(t)`, so every variant sees the same vectors.
pub fn run_accuracy_trials<F: CBaselines>(
    input: &InputSpec,
    config: &TrialConfig,
) -> Vec<AccuracyResult> {
    let variants = available_variants::<F>();
    let mut tallies = vec![AccuracyTally::new(); variants.len()];

    for trial in 0..config.trials {
        let (a, b) = input.reseeded(trial as u64).pair::<F>();
        let exact = exact_sum_of_products(&a, &b);

        for (variant, tally) in variants.iter().zip(&mut tallies) {
            let (elapsed, result) = measure!(config.clock, (variant.function)(&a, &b));
            tally.record(elapsed, exact.abs_error(result));
        }

        if (trial + 1) % 10 == 0 {
            log::debug!(
                "{} size {}: {}/{} trials",
                F::NAME,
                input.size,
                trial + 1,
                config.trials
            );
        }
    }

    variants
        .iter()
        .zip(&tallies)
        .map(|(v, tally)| tally.finish(v.name, v.description))
        .collect()
}
