//! Benchmark CLI for the dot product families.
//!
//! Usage:
//!   kobbelt-bench                         # Timing and accuracy for all families
//!   kobbelt-bench --list                  # List available algorithms
//!   kobbelt-bench dot_product_f64         # Run one family
//!   kobbelt-bench --mode accuracy --trials 500 --sizes 1024
//!   kobbelt-bench --verify                # Check every variant against the exact sum

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use kobbelt_dot::registry::build_registry;
use kobbelt_dot::tui;
use kobbelt_dot::utils::bench::{time_seed, DEFAULT_MAGNITUDE};
use kobbelt_dot::utils::logging::setup_logging;
use kobbelt_dot::utils::runner::{export_csv, run_benchmarks};
use kobbelt_dot::utils::{BenchConfig, Clock, Mode, PinStrategy, TimingConfig, TrialConfig};

#[derive(Parser, Debug)]
#[command(name = "kobbelt-bench")]
#[command(about = "Speed and accuracy benchmarks for exact-accumulation dot products")]
struct Cli {
    /// Algorithm to run (omit for all)
    algorithm: Option<String>,

    /// List available algorithms and exit
    #[arg(short, long)]
    list: bool,

    /// Verify every variant against the exact reference and exit
    #[arg(long)]
    verify: bool,

    /// Comma-separated vector sizes
    #[arg(long, value_delimiter = ',', default_value = "64,256,1024,4096,16384")]
    sizes: Vec<usize>,

    /// Timing samples per variant
    #[arg(short = 'r', long, default_value = "30")]
    runs: usize,

    /// Warmup calls per variant before timing
    #[arg(long, default_value = "10")]
    warmup: usize,

    /// Accuracy trials per size
    #[arg(short = 't', long, default_value = "100")]
    trials: usize,

    /// Random seed for inputs and schedule (default: time-based)
    #[arg(long)]
    seed: Option<u64>,

    /// Elements are drawn uniformly from [-MAGNITUDE, MAGNITUDE]
    #[arg(long, default_value_t = DEFAULT_MAGNITUDE)]
    magnitude: f64,

    #[arg(long, value_enum, default_value = "wall")]
    clock: ClockArg,

    #[arg(long, value_enum, default_value = "per-exec")]
    pin: PinArg,

    #[arg(long, value_enum, default_value = "both")]
    mode: ModeArg,

    /// Export raw rows to CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write logs to rotating files in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClockArg {
    Wall,
    Cpu,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PinArg {
    Global,
    PerExec,
    Off,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Timing,
    Accuracy,
    Both,
}

impl Cli {
    fn config(&self) -> BenchConfig {
        let clock = match self.clock {
            ClockArg::Wall => Clock::Wall,
            ClockArg::Cpu => Clock::ProcessCpu,
        };
        BenchConfig {
            sizes: self.sizes.clone(),
            magnitude: self.magnitude,
            mode: match self.mode {
                ModeArg::Timing => Mode::Timing,
                ModeArg::Accuracy => Mode::Accuracy,
                ModeArg::Both => Mode::Both,
            },
            timing: TimingConfig {
                runs_per_variant: self.runs,
                warmup_iterations: self.warmup,
                pin_strategy: match self.pin {
                    PinArg::Global => PinStrategy::Global,
                    PinArg::PerExec => PinStrategy::PerExecution,
                    PinArg::Off => PinStrategy::Off,
                },
                clock,
                seed: self.seed.unwrap_or_else(time_seed),
            },
            trials: TrialConfig {
                trials: self.trials,
                clock,
            },
            csv_path: self.csv.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level, cli.log_dir.as_deref())?;
    let registry = build_registry();

    if cli.list {
        tui::print_available_algorithms(&registry);
        return Ok(());
    }

    let algorithms = match &cli.algorithm {
        Some(name) => vec![registry.get(name)?],
        None => registry.all().iter().map(|a| a.as_ref()).collect(),
    };

    if cli.verify {
        for algo in &algorithms {
            algo.verify()
                .with_context(|| format!("verifying {}", algo.name()))?;
            println!("  {} passed verification", algo.name());
        }
        return Ok(());
    }

    let config = cli.config();
    config.validate()?;
    log::info!(
        "seed {} over sizes {:?} ({:?} mode, {} clock)",
        config.timing.seed,
        config.sizes,
        config.mode,
        config.timing.clock.name()
    );

    tui::print_header();
    let reports = run_benchmarks(&algorithms, &config);

    if let Some(path) = &config.csv_path {
        export_csv(path, &reports)?;
        println!("  Raw data exported to: {}", path.display());
        println!();
    }

    tui::print_reports(&algorithms, &reports, config.timing.runs_per_variant);
    println!("Note: speedup is relative to 'original', timing error relative to 'exact'.");
    Ok(())
}
