//! Detector output records.
//!
//! Each detector reports its findings as plain value records. Findings are
//! computed once per run and never mutated; they are indicative heuristics,
//! not proof of manipulation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::events::TradeSide;

/// A burst of repeated tiny prints at one exact price within one sub-bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroBurst {
    /// Start of the sub-bucket (second-resolution by default)
    pub bucket_start: DateTime<Utc>,
    /// Exact price shared by every trade in the burst
    pub price: Decimal,
    /// Number of qualifying trades in the group
    pub trade_count: usize,
}

/// A back-to-back pair of offsetting trades suspected of self-matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WashTradePair {
    /// Timestamp of the earlier trade
    pub t0: DateTime<Utc>,
    /// Timestamp of the later trade
    pub t1: DateTime<Utc>,
    /// Shared execution price
    pub price: Decimal,
    /// Size of the earlier trade
    pub size_a: Decimal,
    /// Size of the later trade
    pub size_b: Decimal,
    /// Side of the earlier trade
    pub side_a: TradeSide,
    /// Side of the later trade
    pub side_b: TradeSide,
}

/// A run-up followed by a reversal under elevated volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpDumpEvent {
    /// Start of the pre-window
    pub start: DateTime<Utc>,
    /// Last bucket of the pre-window
    pub mid: DateTime<Utc>,
    /// Last bucket of the post-window
    pub end: DateTime<Utc>,
    /// Price ratio change over the pre-window
    pub r_pre: f64,
    /// Price ratio change over the post-window
    pub r_post: f64,
    /// Volume summed over the pre-window
    pub vol_pre: Decimal,
    /// Volume summed over the post-window
    pub vol_post: Decimal,
}
