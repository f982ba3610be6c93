//! Utility modules for benchmarking and execution.

pub mod accuracy;
pub mod bench;
pub mod cpu_affinity;
pub mod error;
pub mod logging;
pub mod runner;
pub mod timer;
pub mod tui;

// Re-export commonly used items
pub use accuracy::{AccuracyResult, TrialConfig};
pub use bench::{compute_stats, time_seed, InputSpec};
pub use cpu_affinity::CorePin;
pub use error::BenchError;
pub use runner::{BenchConfig, Mode};
pub use timer::{measure_variants, Clock, PinStrategy, TimingConfig, Variant, VariantResult};

/// C compiler name detected at build time
pub const C_COMPILER_NAME: Option<&str> = option_env!("C_COMPILER_NAME");

/// Information about an algorithm implementation variant.
/// Generic over F which is the function signature.
pub struct VariantInfo<F> {
    /// Unique identifier for this variant (e.g., "original", "kobbelt")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// The specific implementation function
    pub function: F,
}
