//! Benchmark orchestration and CSV export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::accuracy::{AccuracyResult, TrialConfig};
use super::bench::{InputSpec, DEFAULT_MAGNITUDE};
use super::error::BenchError;
use super::timer::{measure_variants, TimingConfig};
use crate::registry::{AlgorithmRunner, BenchmarkResult};

/// Which measurements to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    Timing,
    Accuracy,
    #[default]
    Both,
}

impl Mode {
    pub fn timing(self) -> bool {
        matches!(self, Mode::Timing | Mode::Both)
    }

    pub fn accuracy(self) -> bool {
        matches!(self, Mode::Accuracy | Mode::Both)
    }
}

impl FromStr for Mode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timing" => Ok(Mode::Timing),
            "accuracy" => Ok(Mode::Accuracy),
            "both" => Ok(Mode::Both),
            other => Err(BenchError::Config(format!("unknown mode '{other}'"))),
        }
    }
}

/// Everything one benchmark session needs.
#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub sizes: Vec<usize>,
    pub magnitude: f64,
    pub mode: Mode,
    pub timing: TimingConfig,
    pub trials: TrialConfig,
    pub csv_path: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: vec![64, 256, 1024, 4096, 16384],
            magnitude: DEFAULT_MAGNITUDE,
            mode: Mode::default(),
            timing: TimingConfig::default(),
            trials: TrialConfig::default(),
            csv_path: None,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.sizes.is_empty() {
            return Err(BenchError::Config("no input sizes given".into()));
        }
        if !self.magnitude.is_finite() || self.magnitude <= 0.0 {
            return Err(BenchError::Config(format!(
                "magnitude must be finite and positive, got {}",
                self.magnitude
            )));
        }
        if self.mode.timing() && self.timing.runs_per_variant == 0 {
            return Err(BenchError::Config("runs must be at least 1".into()));
        }
        if self.mode.accuracy() && self.trials.trials == 0 {
            return Err(BenchError::Config("trials must be at least 1".into()));
        }
        Ok(())
    }

    /// Input for `size`, seeded so each size draws different vectors.
    pub fn input(&self, size: usize) -> InputSpec {
        InputSpec {
            size,
            magnitude: self.magnitude,
            seed: self.timing.seed ^ (size as u64).rotate_left(32),
        }
    }
}

/// Results of one algorithm at one size.
#[derive(Clone, Debug)]
pub struct SizeReport {
    pub size: usize,
    pub timing: Vec<BenchmarkResult>,
    pub accuracy: Vec<AccuracyResult>,
}

/// Results of one algorithm over all sizes.
#[derive(Clone, Debug)]
pub struct AlgorithmReport {
    pub algorithm: &'static str,
    pub sizes: Vec<SizeReport>,
}

/// Run the configured measurements for every algorithm and size.
pub fn run_benchmarks(
    algorithms: &[&dyn AlgorithmRunner],
    config: &BenchConfig,
) -> Vec<AlgorithmReport> {
    algorithms
        .iter()
        .map(|algo| {
            let sizes = config
                .sizes
                .iter()
                .map(|&size| {
                    let input = config.input(size);
                    log::info!("{} size {}", algo.name(), size);

                    let timing = if config.mode.timing() {
                        let variants = algo.get_variant_closures(&input, config.timing.clock);
                        measure_variants(variants, &config.timing)
                    } else {
                        Vec::new()
                    };

                    let accuracy = if config.mode.accuracy() {
                        algo.run_accuracy(&input, &config.trials)
                    } else {
                        Vec::new()
                    };

                    SizeReport {
                        size,
                        timing,
                        accuracy,
                    }
                })
                .collect();

            AlgorithmReport {
                algorithm: algo.name(),
                sizes,
            }
        })
        .collect()
}

/// Export every row to one CSV file.
///
/// Timing rows leave the error columns empty and accuracy rows leave the
/// timing columns empty.
pub fn export_csv(path: &Path, reports: &[AlgorithmReport]) -> Result<(), BenchError> {
    let csv_error = |source| BenchError::Csv {
        path: path.display().to_string(),
        source,
    };
    let file = File::create(path).map_err(csv_error)?;
    write_csv(BufWriter::new(file), reports).map_err(csv_error)
}

fn compiler_for(variant: &str) -> &'static str {
    if variant.starts_with("c-") {
        super::C_COMPILER_NAME.unwrap_or("Unknown")
    } else {
        ""
    }
}

pub fn write_csv<W: Write>(mut out: W, reports: &[AlgorithmReport]) -> std::io::Result<()> {
    writeln!(
        out,
        "algorithm,variant,compiler,input_size,kind,avg_time_ns,median_time_ns,result,trials,total_time_ns,mean_abs_error,max_abs_error"
    )?;

    for report in reports {
        for size in &report.sizes {
            for row in &size.timing {
                writeln!(
                    out,
                    "{},{},{},{},timing,{},{},{},,,,",
                    report.algorithm,
                    row.name,
                    compiler_for(&row.name),
                    size.size,
                    row.avg_time.as_nanos(),
                    row.median_time.as_nanos(),
                    row.result_sample.map(|v| v.to_string()).unwrap_or_default()
                )?;
            }
            for row in &size.accuracy {
                writeln!(
                    out,
                    "{},{},{},{},accuracy,,,,{},{},{:e},{:e}",
                    report.algorithm,
                    row.name,
                    compiler_for(&row.name),
                    size.size,
                    row.trials,
                    row.total_time.as_nanos(),
                    row.mean_abs_error,
                    row.max_abs_error
                )?;
            }
        }
    }

    out.flush()
}
