//! Fixed-interval aggregation bars.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One fixed-width time bucket of trade activity.
///
/// Buckets with no trades are retained (after the first priced bucket) with a
/// null last price and zero volume fields. Returns and rolling statistics are
/// `None` until enough defined history exists; a partial window is never used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Start of the bucket (inclusive)
    pub bucket_start: DateTime<Utc>,
    /// Price of the last trade in the bucket, if any traded
    pub last_price: Option<Decimal>,
    /// Total traded size
    pub volume: Decimal,
    /// Traded size on the buy side
    pub buy_volume: Decimal,
    /// Traded size on the sell side
    pub sell_volume: Decimal,
    /// Number of trades in the bucket
    pub trade_count: u64,
    /// Relative price change vs. the immediately prior bucket
    pub pct_return: Option<f64>,
    /// Rolling mean of volume over the trailing window
    pub volume_mean: Option<f64>,
    /// Rolling standard deviation of volume over the trailing window
    pub volume_std: Option<f64>,
    /// Volume z-score against the trailing window
    pub volume_zscore: Option<f64>,
    /// Rolling mean of returns over the trailing window
    pub return_mean: Option<f64>,
    /// Rolling standard deviation of returns over the trailing window
    pub return_std: Option<f64>,
    /// Return z-score against the trailing window
    pub return_zscore: Option<f64>,
}

impl Bar {
    /// Creates an empty bar for a bucket with no trades.
    #[must_use]
    pub fn empty(bucket_start: DateTime<Utc>) -> Self {
        Self {
            bucket_start,
            last_price: None,
            volume: Decimal::ZERO,
            buy_volume: Decimal::ZERO,
            sell_volume: Decimal::ZERO,
            trade_count: 0,
            pct_return: None,
            volume_mean: None,
            volume_std: None,
            volume_zscore: None,
            return_mean: None,
            return_std: None,
            return_zscore: None,
        }
    }

    /// Returns true when at least one trade priced this bucket.
    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.last_price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_bar_has_zero_volume_and_no_price() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let bar = Bar::empty(ts);

        assert!(!bar.is_priced());
        assert_eq!(bar.volume, Decimal::ZERO);
        assert_eq!(bar.trade_count, 0);
        assert!(bar.pct_return.is_none());
        assert!(bar.volume_zscore.is_none());
    }
}
