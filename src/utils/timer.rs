//! Timing infrastructure.
//!
//! - Wall-clock or process CPU time, selected at runtime
//! - Core pinning during measurements
//! - Randomized interleaving of variant samples to avoid ordering bias

use std::hint::black_box;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::bench::compute_stats;
use super::cpu_affinity::CorePin;
use super::error::BenchError;

// ============================================================================
// Clocks
// ============================================================================

/// Which clock a measurement reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Clock {
    /// Monotonic wall clock.
    #[default]
    Wall,
    /// CPU time consumed by the whole process.
    ProcessCpu,
}

impl Clock {
    pub fn name(self) -> &'static str {
        match self {
            Clock::Wall => "wall",
            Clock::ProcessCpu => "cpu",
        }
    }
}

impl FromStr for Clock {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wall" => Ok(Clock::Wall),
            "cpu" => Ok(Clock::ProcessCpu),
            other => Err(BenchError::Config(format!("unknown clock '{other}'"))),
        }
    }
}

/// Process CPU time from `clock_gettime(CLOCK_PROCESS_CPUTIME_ID)`.
#[cfg(unix)]
pub fn process_cpu_time() -> Option<Duration> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
    if rc != 0 {
        return None;
    }
    Some(Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32))
}

#[cfg(not(unix))]
pub fn process_cpu_time() -> Option<Duration> {
    None
}

/// A started measurement.
#[derive(Clone, Copy, Debug)]
pub enum Stopwatch {
    Wall(Instant),
    Cpu(Duration),
}

impl Stopwatch {
    /// Start reading `clock`. Falls back to the wall clock when CPU time is
    /// unavailable on this platform.
    #[inline(always)]
    pub fn start(clock: Clock) -> Self {
        match clock {
            Clock::ProcessCpu => match process_cpu_time() {
                Some(now) => Stopwatch::Cpu(now),
                None => Stopwatch::Wall(Instant::now()),
            },
            Clock::Wall => Stopwatch::Wall(Instant::now()),
        }
    }

    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        match self {
            Stopwatch::Wall(start) => start.elapsed(),
            Stopwatch::Cpu(start) => process_cpu_time()
                .map(|now| now.saturating_sub(*start))
                .unwrap_or_default(),
        }
    }
}

/// Time one expression: `let (elapsed, value) = measure!(clock, expr);`
#[macro_export]
macro_rules! measure {
    ($clock:expr, $body:expr) => {{
        let stopwatch = $crate::utils::timer::Stopwatch::start($clock);
        let value = ::std::hint::black_box($body);
        (stopwatch.elapsed(), value)
    }};
}

// ============================================================================
// Configuration
// ============================================================================

/// CPU pinning strategy during measurements
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinStrategy {
    /// Pin once before all measurements
    Global,
    /// Pin/unpin around each execution
    #[default]
    PerExecution,
    /// Never pin
    Off,
}

impl FromStr for PinStrategy {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(PinStrategy::Global),
            "per-exec" => Ok(PinStrategy::PerExecution),
            "off" => Ok(PinStrategy::Off),
            other => Err(BenchError::Config(format!("unknown pin strategy '{other}'"))),
        }
    }
}

/// Configuration for timing measurements
#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Number of samples to collect per variant (default: 30)
    pub runs_per_variant: usize,
    /// Number of warmup iterations before measurement (default: 10)
    pub warmup_iterations: usize,
    /// CPU pinning strategy (default: PerExecution)
    pub pin_strategy: PinStrategy,
    /// Clock read by the variants (default: wall)
    pub clock: Clock,
    /// Seed for the schedule shuffle and the input vectors
    pub seed: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            runs_per_variant: 30,
            warmup_iterations: 10,
            pin_strategy: PinStrategy::default(),
            clock: Clock::default(),
            seed: 0x5eed,
        }
    }
}

/// A variant to be measured
pub struct Variant<'a> {
    /// Unique name of the variant
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Runs once and returns (elapsed, result value).
    /// Timing happens inside the closure to keep dispatch out of the measurement.
    pub run: Box<dyn FnMut() -> (Duration, Option<f64>) + 'a>,
}

/// Result from measuring a single variant
#[derive(Clone, Debug)]
pub struct VariantResult {
    pub name: String,
    pub description: String,
    pub avg_time: Duration,
    pub median_time: Duration,
    pub min_time: Duration,
    pub max_time: Duration,
    pub std_dev: Duration,
    /// Number of samples collected
    pub runs: usize,
    /// Result value from the last sample
    pub result_sample: Option<f64>,
}

/// Measure variants with a randomized execution order.
///
/// Warms every variant up, shuffles the (variant, sample) schedule, then
/// measures each task under the configured pinning strategy.
pub fn measure_variants(mut variants: Vec<Variant>, config: &TimingConfig) -> Vec<VariantResult> {
    if variants.is_empty() {
        return Vec::new();
    }

    let samples = config.runs_per_variant;

    for variant in &mut variants {
        for _ in 0..config.warmup_iterations {
            black_box((variant.run)());
        }
    }

    let mut tasks: Vec<usize> = (0..variants.len())
        .flat_map(|v| std::iter::repeat(v).take(samples))
        .collect();
    tasks.shuffle(&mut StdRng::seed_from_u64(config.seed));
    log::trace!("measuring {} tasks over {} variants", tasks.len(), variants.len());

    let mut measurements: Vec<Vec<Duration>> = (0..variants.len())
        .map(|_| Vec::with_capacity(samples))
        .collect();
    let mut result_samples: Vec<Option<f64>> = vec![None; variants.len()];

    let _global_pin = (config.pin_strategy == PinStrategy::Global).then(CorePin::current);

    for variant_idx in tasks {
        let variant = &mut variants[variant_idx];
        let _exec_pin = (config.pin_strategy == PinStrategy::PerExecution).then(CorePin::current);
        let (elapsed, result) = (variant.run)();

        measurements[variant_idx].push(elapsed);
        result_samples[variant_idx] = result;
    }

    variants
        .into_iter()
        .zip(measurements)
        .zip(result_samples)
        .map(|((variant, times), result_sample)| {
            let stats = compute_stats(&times);
            VariantResult {
                name: variant.name.to_string(),
                description: variant.description.to_string(),
                avg_time: stats.avg,
                median_time: stats.median,
                min_time: stats.min,
                max_time: stats.max,
                std_dev: stats.std_dev,
                runs: times.len(),
                result_sample,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_variants_empty() {
        let results = measure_variants(vec![], &TimingConfig::default());
        assert!(results.is_empty());
    }

    #[test]
    fn test_measure_variants_multiple() {
        let variants = vec![
            Variant {
                name: "fast",
                description: "Fast variant",
                run: Box::new(|| {
                    let (elapsed, _) = crate::measure!(Clock::Wall, 1);
                    (elapsed, Some(1.0))
                }),
            },
            Variant {
                name: "slow",
                description: "Slow variant",
                run: Box::new(|| {
                    let (elapsed, _) = crate::measure!(Clock::ProcessCpu, vec![0u8; 1000]);
                    (elapsed, Some(2.0))
                }),
            },
        ];

        let config = TimingConfig {
            runs_per_variant: 5,
            warmup_iterations: 2,
            pin_strategy: PinStrategy::Off,
            ..TimingConfig::default()
        };

        let results = measure_variants(variants, &config);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "fast");
        assert_eq!(results[0].runs, 5);
        assert_eq!(results[0].result_sample, Some(1.0));
        assert_eq!(results[1].result_sample, Some(2.0));
        assert!(results[1].min_time <= results[1].max_time);
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("cpu".parse::<Clock>().unwrap(), Clock::ProcessCpu);
        assert_eq!("off".parse::<PinStrategy>().unwrap(), PinStrategy::Off);
        assert!("sundial".parse::<Clock>().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_cpu_time_advances() {
        let start = process_cpu_time().unwrap();
        let mut x = 0u64;
        for i in 0..1_000_000u64 {
            x = black_box(x.wrapping_add(i));
        }
        black_box(x);
        assert!(process_cpu_time().unwrap() >= start);
    }
}
