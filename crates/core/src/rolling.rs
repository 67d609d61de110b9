//! Fixed-window rolling statistics.
//!
//! Provides trailing-window mean/standard-deviation/z-score over a series
//! that may contain undefined samples. Statistics are emitted only once the
//! trailing window holds exactly `window` defined samples; a partial window
//! never produces an estimate. Standard deviation is the sample flavor
//! (n - 1 denominator).

use std::collections::VecDeque;

/// Mean and sample standard deviation of one full trailing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    /// Arithmetic mean of the window
    pub mean: f64,
    /// Sample standard deviation of the window
    pub std_dev: f64,
}

/// Sliding accumulator over the last `window` samples.
///
/// Maintains running sum and sum-of-squares so each push is O(1), keeping a
/// full rolling pass linear in the input length.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    window: usize,
    samples: VecDeque<Option<f64>>,
    sum: f64,
    sum_sq: f64,
    defined: usize,
}

impl RollingWindow {
    /// Creates a new accumulator over `window` trailing samples.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            samples: VecDeque::with_capacity(window + 1),
            sum: 0.0,
            sum_sq: 0.0,
            defined: 0,
        }
    }

    /// Pushes the next sample and returns the trailing-window statistics.
    ///
    /// Returns `None` until the window is full, whenever any sample inside
    /// the window is undefined, or when `window < 2` (sample standard
    /// deviation needs at least two observations).
    pub fn push(&mut self, sample: Option<f64>) -> Option<WindowStats> {
        self.samples.push_back(sample);
        if let Some(v) = sample {
            self.sum += v;
            self.sum_sq += v * v;
            self.defined += 1;
        }

        if self.samples.len() > self.window {
            if let Some(Some(old)) = self.samples.pop_front() {
                self.sum -= old;
                self.sum_sq -= old * old;
                self.defined -= 1;
            }
        }

        self.stats()
    }

    fn stats(&self) -> Option<WindowStats> {
        if self.window < 2 || self.samples.len() < self.window || self.defined < self.window {
            return None;
        }

        let n = self.window as f64;
        let mean = self.sum / n;
        // Guard against tiny negative variance from floating-point cancellation.
        let variance = ((self.sum_sq - self.sum * self.sum / n) / (n - 1.0)).max(0.0);

        Some(WindowStats {
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

/// Runs one rolling pass over `values`, returning per-index window statistics.
///
/// Entry `i` holds the statistics of the trailing window ending at `i`
/// (inclusive), or `None` under the insufficient-sample rule.
#[must_use]
pub fn rolling_stats(values: &[Option<f64>], window: usize) -> Vec<Option<WindowStats>> {
    let mut acc = RollingWindow::new(window);
    values.iter().map(|v| acc.push(*v)).collect()
}

/// Z-score of `value` against one window's statistics.
///
/// Returns `None` when the window's standard deviation is effectively zero.
#[must_use]
pub fn zscore(value: f64, stats: &WindowStats) -> Option<f64> {
    if stats.std_dev > f64::EPSILON {
        Some((value - stats.mean) / stats.std_dev)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn stats_match_sample_standard_deviation() {
        // 1..5: mean 3.0, sample variance 10/4 = 2.5
        let out = rolling_stats(&some(&[1.0, 2.0, 3.0, 4.0, 5.0]), 5);

        assert!(out[..4].iter().all(Option::is_none));
        let stats = out[4].unwrap();
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.5f64.sqrt()).abs() < 1e-12, "std was {}", stats.std_dev);
    }

    #[test]
    fn window_slides_over_the_series() {
        let out = rolling_stats(&some(&[1.0, 2.0, 3.0, 4.0]), 2);

        assert!(out[0].is_none());
        assert!((out[1].unwrap().mean - 1.5).abs() < 1e-12);
        assert!((out[2].unwrap().mean - 2.5).abs() < 1e-12);
        assert!((out[3].unwrap().mean - 3.5).abs() < 1e-12);
    }

    #[test]
    fn undefined_sample_suppresses_windows_containing_it() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let out = rolling_stats(&values, 2);

        assert!(out[0].is_none()); // partial window
        assert!(out[1].is_none()); // contains the gap
        assert!(out[2].is_none()); // contains the gap
        assert!(out[3].is_some());
        assert!(out[4].is_some());
    }

    #[test]
    fn window_below_two_never_emits() {
        let out = rolling_stats(&some(&[1.0, 2.0, 3.0]), 1);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn zscore_at_the_mean_is_zero() {
        let stats = WindowStats {
            mean: 3.0,
            std_dev: 1.5,
        };
        assert!(zscore(3.0, &stats).unwrap().abs() < 1e-12);
        assert!((zscore(6.0, &stats).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zscore_is_undefined_for_flat_window() {
        let out = rolling_stats(&some(&[5.0, 5.0, 5.0]), 3);
        let stats = out[2].unwrap();
        assert!(zscore(5.0, &stats).is_none());
    }
}
