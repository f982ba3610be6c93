//! Algorithm registry for dynamic algorithm discovery and execution.
//!
//! Each registered family exposes its variants as ready-to-measure closures
//! plus an accuracy-trial entry point, so the binary drives every family the
//! same way.

use crate::math::dot_product::DotProductRunner;
use crate::utils::accuracy::{AccuracyResult, TrialConfig};
use crate::utils::bench::InputSpec;
use crate::utils::error::BenchError;
use crate::utils::timer::{Clock, Variant, VariantResult};

/// Result from running a variant benchmark (alias for VariantResult)
pub type BenchmarkResult = VariantResult;

/// Name of the speed baseline every family provides.
pub const BASELINE_VARIANT: &str = "original";

/// Name of the correctly rounded reference every family provides.
pub const REFERENCE_VARIANT: &str = "exact";

/// Trait that all algorithm benchmarkers must implement
pub trait AlgorithmRunner: Send + Sync {
    /// Name of the algorithm (e.g., "dot_product_f64")
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Category (e.g., "math")
    fn category(&self) -> &'static str;

    /// Get list of available variant names
    fn available_variants(&self) -> Vec<&'static str>;

    /// Get closures for each variant, ready to be measured.
    /// Each closure does ONE timed execution on inputs generated from `input`.
    fn get_variant_closures<'a>(&'a self, input: &InputSpec, clock: Clock) -> Vec<Variant<'a>>;

    /// Run `config.trials` fresh inputs through every variant, timing each
    /// call and measuring its error against the exact sum.
    fn run_accuracy(&self, input: &InputSpec, config: &TrialConfig) -> Vec<AccuracyResult>;

    /// Verify correctness of all variants against the exact reference
    fn verify(&self) -> Result<(), BenchError>;
}

/// Global registry of all algorithms
pub struct AlgorithmRegistry {
    algorithms: Vec<Box<dyn AlgorithmRunner>>,
}

impl AlgorithmRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            algorithms: Vec::new(),
        }
    }

    /// Register an algorithm
    pub fn register<A: AlgorithmRunner + 'static>(&mut self, algo: A) {
        self.algorithms.push(Box::new(algo));
    }

    /// Get all registered algorithms
    pub fn all(&self) -> &[Box<dyn AlgorithmRunner>] {
        &self.algorithms
    }

    /// Find algorithm by name
    pub fn find(&self, name: &str) -> Option<&dyn AlgorithmRunner> {
        self.algorithms
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
    }

    /// Find algorithm by name, or report the available ones
    pub fn get(&self, name: &str) -> Result<&dyn AlgorithmRunner, BenchError> {
        self.find(name).ok_or_else(|| BenchError::UnknownAlgorithm {
            name: name.to_string(),
            available: self.list_names().join(", "),
        })
    }

    /// List algorithm names
    pub fn list_names(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(|a| a.name()).collect()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the default registry with all algorithms
pub fn build_registry() -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::new();

    registry.register(DotProductRunner::<f32>::new("dot_product_f32"));
    registry.register(DotProductRunner::<f64>::new("dot_product_f64"));

    registry
}
