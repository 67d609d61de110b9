//! Per-snapshot order-book microstructure metrics.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Microstructure metrics derived from one usable order-book snapshot.
///
/// `imbalance` is `None` when the top-N volume on both sides sums to zero;
/// otherwise it lies in [-1, 1], positive when bid depth dominates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookMetric {
    /// Snapshot timestamp
    pub timestamp: DateTime<Utc>,
    /// Highest bid price
    pub best_bid: Decimal,
    /// Lowest ask price
    pub best_ask: Decimal,
    /// best_ask - best_bid
    pub spread: Decimal,
    /// Midpoint of the best levels
    pub mid: Decimal,
    /// Summed size over the top-N ask levels nearest the best ask
    pub ask_vol_top: Decimal,
    /// Summed size over the top-N bid levels nearest the best bid
    pub bid_vol_top: Decimal,
    /// (bid_vol_top - ask_vol_top) / (bid_vol_top + ask_vol_top)
    pub imbalance: Option<f64>,
    /// True when one top-N ask level dwarfs the median of that set
    pub ask_wall: bool,
    /// True when one top-N bid level dwarfs the median of that set
    pub bid_wall: bool,
}

impl OrderBookMetric {
    /// Returns true when either side shows a wall within the top-N levels.
    #[must_use]
    pub fn has_wall(&self) -> bool {
        self.ask_wall || self.bid_wall
    }
}
