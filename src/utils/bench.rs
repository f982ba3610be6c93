//! Shared benchmark utilities.
//!
//! Seeded input generation and timing statistics used by every runner.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::float::ExactFloat;

/// Default half-width of the input range: elements are drawn from
/// `[-2^20, 2^20]`.
pub const DEFAULT_MAGNITUDE: f64 = (1u64 << 20) as f64;

/// Shape and seed of one generated input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSpec {
    pub size: usize,
    /// Half-width of the uniform element range.
    pub magnitude: f64,
    pub seed: u64,
}

impl InputSpec {
    pub fn new(size: usize, seed: u64) -> Self {
        Self {
            size,
            magnitude: DEFAULT_MAGNITUDE,
            seed,
        }
    }

    /// Same shape, `offset` steps along the seed sequence.
    pub fn reseeded(&self, offset: u64) -> Self {
        Self {
            seed: self.seed.wrapping_add(offset),
            ..*self
        }
    }

    pub fn pair<F: ExactFloat>(&self) -> (Vec<F>, Vec<F>) {
        random_pair(self.seed, self.size, self.magnitude)
    }
}

/// Summary statistics of a set of timing samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimingStats {
    pub avg: Duration,
    pub median: Duration,
    pub min: Duration,
    pub max: Duration,
    pub std_dev: Duration,
}

/// Calculate standard deviation from a list of durations
pub fn calculate_std_dev(times: &[Duration], mean: Duration) -> Duration {
    if times.len() < 2 {
        return Duration::ZERO;
    }

    let mean_ns = mean.as_nanos() as f64;
    let variance: f64 = times
        .iter()
        .map(|t| {
            let diff = t.as_nanos() as f64 - mean_ns;
            diff * diff
        })
        .sum::<f64>()
        / (times.len() - 1) as f64;

    Duration::from_nanos(variance.sqrt() as u64)
}

/// Median of a list of durations (mean of the two middle samples for even counts)
pub fn calculate_median(times: &[Duration]) -> Duration {
    if times.is_empty() {
        return Duration::ZERO;
    }
    let mut sorted = times.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2
    } else {
        sorted[mid]
    }
}

/// Compute timing statistics from a list of durations
pub fn compute_stats(times: &[Duration]) -> TimingStats {
    let (Some(&min), Some(&max)) = (times.iter().min(), times.iter().max()) else {
        return TimingStats::default();
    };
    let total: Duration = times.iter().sum();
    let avg = total / times.len() as u32;

    TimingStats {
        avg,
        median: calculate_median(times),
        min,
        max,
        std_dev: calculate_std_dev(times, avg),
    }
}

/// Get a seed from current time for randomization
pub fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x12345678)
}

/// Uniform vector of `len` elements in `[-magnitude, magnitude]`.
pub fn random_vector<F: ExactFloat>(rng: &mut impl Rng, len: usize, magnitude: F) -> Vec<F> {
    let magnitude = magnitude.abs();
    if magnitude == F::zero() {
        return vec![F::zero(); len];
    }
    (0..len)
        .map(|_| rng.random_range(-magnitude..=magnitude))
        .collect()
}

/// A pair of input vectors drawn from one seeded generator.
pub fn random_pair<F: ExactFloat>(seed: u64, len: usize, magnitude: f64) -> (Vec<F>, Vec<F>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let magnitude = <F as num_traits::NumCast>::from(magnitude)
        .filter(|m: &F| m.is_finite())
        .unwrap_or_else(F::max_value);
    let a = random_vector(&mut rng, len, magnitude);
    let b = random_vector(&mut rng, len, magnitude);
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_stats() {
        let times = [
            Duration::from_nanos(40),
            Duration::from_nanos(10),
            Duration::from_nanos(30),
            Duration::from_nanos(20),
        ];
        let stats = compute_stats(&times);
        assert_eq!(stats.min, Duration::from_nanos(10));
        assert_eq!(stats.max, Duration::from_nanos(40));
        assert_eq!(stats.avg, Duration::from_nanos(25));
        assert_eq!(stats.median, Duration::from_nanos(25));
        assert!(stats.std_dev > Duration::ZERO);
    }

    #[test]
    fn test_compute_stats_empty() {
        assert_eq!(compute_stats(&[]), TimingStats::default());
    }

    #[test]
    fn test_random_pair_is_seeded_and_bounded() {
        let (a1, b1) = random_pair::<f64>(7, 256, DEFAULT_MAGNITUDE);
        let (a2, b2) = random_pair::<f64>(7, 256, DEFAULT_MAGNITUDE);
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
        assert_ne!(a1, b1);
        assert!(a1
            .iter()
            .chain(&b1)
            .all(|x| x.abs() <= DEFAULT_MAGNITUDE));

        let (a, _) = random_pair::<f32>(7, 64, 1.0);
        assert!(a.iter().all(|x| x.abs() <= 1.0));
    }

    #[test]
    fn test_random_vector_zero_magnitude() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_vector(&mut rng, 3, 0.0f32), vec![0.0; 3]);
    }
}
