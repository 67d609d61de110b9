//! Imbalance vs. future-return correlation study.
//!
//! Aligns each order-book metric to the nearest bar by timestamp (a
//! nearest-neighbor join, not interpolation), reads the bar price, shifts it
//! `horizon` positions forward in the metric sequence's own order, and
//! correlates top-N imbalance against the resulting forward return.

use rust_decimal::Decimal;
use tracing::debug;

use market_sentry_core::bar::Bar;
use market_sentry_core::metrics::OrderBookMetric;
use market_sentry_core::summary::ImbalanceCorrelation;

use crate::bars::price_ratio;

/// Pearson correlation coefficient between two equally long series.
///
/// Returns `None` for fewer than two points or when either series has
/// effectively zero variance.
fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator < f64::EPSILON {
        return None;
    }

    Some(covariance / denominator)
}

/// Price of the bar nearest to `timestamp`; equidistant ties resolve to the
/// earlier bar.
fn nearest_bar_price(bars: &[Bar], timestamp: chrono::DateTime<chrono::Utc>) -> Option<Decimal> {
    if bars.is_empty() {
        return None;
    }

    let idx = bars.partition_point(|b| b.bucket_start <= timestamp);
    let chosen = if idx == 0 {
        &bars[0]
    } else if idx == bars.len() {
        &bars[bars.len() - 1]
    } else {
        let before = &bars[idx - 1];
        let after = &bars[idx];
        let gap_before = timestamp.signed_duration_since(before.bucket_start);
        let gap_after = after.bucket_start.signed_duration_since(timestamp);
        if gap_before <= gap_after {
            before
        } else {
            after
        }
    };

    chosen.last_price
}

/// Correlates each metric's imbalance with the `horizon`-rows-forward return
/// of its aligned bar price.
///
/// Rows where the imbalance, the aligned price, or the future price is
/// undefined are excluded; the coefficient is `None` when fewer than two
/// rows survive or a series is degenerate.
#[must_use]
pub fn imbalance_future_return_correlation(
    metrics: &[OrderBookMetric],
    bars: &[Bar],
    horizon: usize,
) -> ImbalanceCorrelation {
    let aligned: Vec<Option<Decimal>> = metrics
        .iter()
        .map(|m| nearest_bar_price(bars, m.timestamp))
        .collect();

    let mut imbalances = Vec::new();
    let mut future_returns = Vec::new();
    for (j, metric) in metrics.iter().enumerate() {
        let Some(imbalance) = metric.imbalance else {
            continue;
        };
        let price = aligned[j];
        let future_price = aligned.get(j + horizon).copied().flatten();
        let future_return = match (price, future_price) {
            (Some(current), Some(future)) => price_ratio(future, current),
            _ => None,
        };
        if let Some(future_return) = future_return {
            imbalances.push(imbalance);
            future_returns.push(future_return);
        }
    }

    let coefficient = pearson_correlation(&imbalances, &future_returns);
    debug!(
        samples = imbalances.len(),
        horizon,
        coefficient = coefficient.unwrap_or(f64::NAN),
        "imbalance/future-return correlation"
    );

    ImbalanceCorrelation {
        coefficient,
        sample_size: imbalances.len(),
    }
}
