//! Accuracy trials: per-variant running time and error totals.

use std::time::Duration;

use super::timer::Clock;

/// Configuration for accuracy trials
#[derive(Clone, Debug)]
pub struct TrialConfig {
    /// Number of fresh inputs per size (default: 100)
    pub trials: usize,
    /// Clock read around every call (default: wall)
    pub clock: Clock,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            clock: Clock::default(),
        }
    }
}

/// Totals for one variant over all trials.
#[derive(Clone, Debug, PartialEq)]
pub struct AccuracyResult {
    pub name: String,
    pub description: String,
    pub trials: usize,
    pub total_time: Duration,
    pub mean_abs_error: f64,
    pub max_abs_error: f64,
}

/// Running totals while trials are in progress.
#[derive(Clone, Debug, Default)]
pub struct AccuracyTally {
    trials: usize,
    total_time: Duration,
    error_sum: f64,
    max_error: f64,
}

impl AccuracyTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed: Duration, abs_error: f64) {
        self.trials += 1;
        self.total_time += elapsed;
        self.error_sum += abs_error;
        self.max_error = self.max_error.max(abs_error);
    }

    pub fn finish(&self, name: &str, description: &str) -> AccuracyResult {
        let mean = if self.trials == 0 {
            0.0
        } else {
            self.error_sum / self.trials as f64
        };
        AccuracyResult {
            name: name.to_string(),
            description: description.to_string(),
            trials: self.trials,
            total_time: self.total_time,
            mean_abs_error: mean,
            max_abs_error: self.max_error,
        }
    }
}
