//! Threshold filters over precomputed bar z-scores.

use market_sentry_core::bar::Bar;

/// Returns the bars whose volume z-score exceeds `threshold`.
///
/// Bars without a defined z-score never qualify.
#[must_use]
pub fn volume_spikes(bars: &[Bar], threshold: f64) -> Vec<Bar> {
    bars.iter()
        .filter(|bar| bar.volume_zscore.is_some_and(|z| z > threshold))
        .cloned()
        .collect()
}

/// Returns the bars whose absolute return z-score exceeds `threshold`.
///
/// Bars without a defined z-score never qualify.
#[must_use]
pub fn return_outliers(bars: &[Bar], threshold: f64) -> Vec<Bar> {
    bars.iter()
        .filter(|bar| bar.return_zscore.is_some_and(|z| z.abs() > threshold))
        .cloned()
        .collect()
}
