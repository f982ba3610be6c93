//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use std::time::Duration;

use terminal_size::{terminal_size, Width};

use super::accuracy::AccuracyResult;
use super::runner::AlgorithmReport;
use crate::registry::{AlgorithmRegistry, AlgorithmRunner, BenchmarkResult, BASELINE_VARIANT, REFERENCE_VARIANT};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

fn is_c_variant(name: &str) -> bool {
    name.starts_with("c-") || name.starts_with("c_")
}

/// Sort key: baseline first, then Rust variants, then C by compiler and name.
fn variant_sort_key(name: &str) -> (u8, String, String) {
    let name = name.to_lowercase();
    if name == BASELINE_VARIANT {
        (0, String::new(), String::new())
    } else if is_c_variant(&name) {
        let compiler = super::C_COMPILER_NAME.unwrap_or("unknown").to_lowercase();
        (2, compiler, name)
    } else {
        (1, name, String::new())
    }
}

/// Sort timing rows: baseline first, then grouped by language
pub fn sort_variants(results: &mut [BenchmarkResult]) {
    results.sort_by_key(|r| variant_sort_key(&r.name));
}

/// Sort accuracy rows the same way
pub fn sort_accuracy(results: &mut [AccuracyResult]) {
    results.sort_by_key(|r| variant_sort_key(&r.name));
}

fn display_name(name: &str) -> String {
    match super::C_COMPILER_NAME {
        Some(c) if is_c_variant(name) => format!("{} ({})", name, c),
        _ => name.to_string(),
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// Compact duration with an adaptive unit.
pub fn format_duration(d: Duration) -> String {
    let ns = d.as_nanos();
    if ns < 1_000 {
        format!("{} ns", ns)
    } else if ns < 1_000_000 {
        format!("{:.2} µs", ns as f64 / 1e3)
    } else if ns < 1_000_000_000 {
        format!("{:.2} ms", ns as f64 / 1e6)
    } else {
        format!("{:.2} s", d.as_secs_f64())
    }
}

/// Print algorithm info box
pub fn print_algo_info_box(algo: &dyn AlgorithmRunner) {
    let term_width = get_term_width();
    let max_content_width = term_width.saturating_sub(4).max(40);

    let name_line = format!("Algorithm: {}", algo.name());
    let cat_line = format!("Category:  {}", algo.category());
    let desc_line = algo.description();
    let var_line = format!("Variants: {}", algo.available_variants().join(", "));

    let content_width = [
        name_line.chars().count(),
        cat_line.chars().count(),
        desc_line.chars().count(),
        var_line.chars().count(),
    ]
    .into_iter()
    .max()
    .unwrap_or(60)
    .min(max_content_width);

    let border = "─".repeat(content_width + 2);
    let row = |text: &str| {
        println!(
            "│ {:<width$} │",
            truncate(text, content_width),
            width = content_width
        )
    };

    println!("┌{}┐", border);
    row(&name_line);
    row(&cat_line);
    row(desc_line);
    println!("├{}┤", border);
    row(&var_line);
    println!("└{}┘", border);
    println!();
}

/// Print the timing table for a single size.
///
/// Speedup is relative to the baseline row; the error column is relative to
/// the exact reference row.
pub fn print_timing_table(results: &[BenchmarkResult], size: usize, runs: usize) {
    if results.is_empty() {
        return;
    }

    let term_width = get_term_width();
    let fixed_width = 72;
    let variant_col_width = term_width.saturating_sub(fixed_width).max(15);
    let table_width = variant_col_width + 64 + 6;

    let baseline_time = results
        .iter()
        .find(|r| r.name == BASELINE_VARIANT)
        .or(results.first())
        .map(|r| r.avg_time.as_nanos() as f64)
        .unwrap_or(1.0);
    let reference = results
        .iter()
        .find(|r| r.name == REFERENCE_VARIANT)
        .and_then(|r| r.result_sample);

    println!("  Timing, size {} ({} runs)", size, runs);
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:<v_width$} {:>12} {:>12} {:>12} {:>9} {:>9} {:>10}",
        "Variant",
        "Average",
        "Min",
        "Max",
        "Speedup",
        "CV",
        "Rel. Error",
        v_width = variant_col_width
    );
    println!("  {}", "─".repeat(table_width));

    for result in results {
        let avg_ns = result.avg_time.as_nanos() as f64;
        let speedup = if avg_ns > 0.0 { baseline_time / avg_ns } else { 0.0 };
        let cv = if avg_ns > 0.0 {
            result.std_dev.as_nanos() as f64 / avg_ns
        } else {
            0.0
        };

        let relative_error = match (result.result_sample, reference) {
            (Some(res), Some(exact)) if exact != 0.0 => (res - exact).abs() / exact.abs(),
            (Some(res), Some(exact)) => (res - exact).abs(),
            _ => 0.0,
        };

        println!(
            "  {:<v_width$} {:>12} {:>12} {:>12} {:>8.2}x {:>8.2}% {:>10.2e}",
            truncate(&display_name(&result.name), variant_col_width),
            format_duration(result.avg_time),
            format_duration(result.min_time),
            format_duration(result.max_time),
            speedup,
            cv * 100.0,
            relative_error,
            v_width = variant_col_width
        );
    }
    println!();
}

/// Print the accuracy table for a single size.
pub fn print_accuracy_table(results: &[AccuracyResult], size: usize) {
    let Some(first) = results.first() else {
        return;
    };

    let term_width = get_term_width();
    let fixed_width = 56;
    let variant_col_width = term_width.saturating_sub(fixed_width).max(15);
    let table_width = variant_col_width + 50 + 4;

    let baseline_error = results
        .iter()
        .find(|r| r.name == BASELINE_VARIANT)
        .map(|r| r.mean_abs_error);

    println!("  Accuracy, size {} ({} trials)", size, first.trials);
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:<v_width$} {:>12} {:>12} {:>12} {:>12}",
        "Variant",
        "Total",
        "Mean Error",
        "Max Error",
        "vs Baseline",
        v_width = variant_col_width
    );
    println!("  {}", "─".repeat(table_width));

    for result in results {
        let ratio = match baseline_error {
            Some(base) if base > 0.0 => format!("{:.2e}", result.mean_abs_error / base),
            _ => "-".to_string(),
        };
        println!(
            "  {:<v_width$} {:>12} {:>12.3e} {:>12.3e} {:>12}",
            truncate(&display_name(&result.name), variant_col_width),
            format_duration(result.total_time),
            result.mean_abs_error,
            result.max_abs_error,
            ratio,
            v_width = variant_col_width
        );
    }
    println!();
}

/// Print every table of a finished run
pub fn print_reports(algorithms: &[&dyn AlgorithmRunner], reports: &[AlgorithmReport], runs: usize) {
    for (algo, report) in algorithms.iter().zip(reports) {
        print_algo_info_box(*algo);
        for size in &report.sizes {
            let mut timing = size.timing.clone();
            sort_variants(&mut timing);
            print_timing_table(&timing, size.size, runs);

            let mut accuracy = size.accuracy.clone();
            sort_accuracy(&mut accuracy);
            print_accuracy_table(&accuracy, size.size);
        }
    }
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80);
    let title = " Kobbelt Dot Product Benchmarks ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
}

/// Print the list of available algorithms
pub fn print_available_algorithms(registry: &AlgorithmRegistry) {
    println!("Available algorithms:");
    println!();
    for algo in registry.all() {
        println!(
            "  {:<20} [{}] - {}",
            algo.name(),
            algo.category(),
            algo.description()
        );
        println!("  {:<20} variants: {}", "", algo.available_variants().join(", "));
    }
}
