//! # Kobbelt Dot
//!
//! Accurate dot products through exact genus-bucket accumulation, plus a
//! harness that measures their speed and error against an exact big-integer
//! reference.

pub mod float;
pub mod math;
pub mod registry;
pub mod utils;

pub use utils::tui;

pub use math::dot_product::{checked_dot_product, dot_product_kobbelt};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::float::ExactFloat;
    pub use crate::math::dot_product;
    pub use crate::math::dot_product::{checked_dot_product, dot_product_kobbelt, KobbeltAccumulator};
    pub use crate::registry::{build_registry, AlgorithmRegistry, AlgorithmRunner};
    pub use crate::utils::BenchError;
}

#[cfg(test)]
mod tests {
    use crate::registry::build_registry;

    #[test]
    fn test_all_algorithms_registry_verify() {
        let registry = build_registry();
        let algorithms = registry.all();

        println!("Verifying {} algorithms...", algorithms.len());

        for algo in algorithms {
            println!("Verifying algorithm: {}", algo.name());
            match algo.verify() {
                Ok(_) => println!("  ✅ Algorithm '{}' passed verification", algo.name()),
                Err(e) => panic!(
                    "  ❌ Algorithm '{}' failed verification: {}",
                    algo.name(),
                    e
                ),
            }
        }
    }
}
