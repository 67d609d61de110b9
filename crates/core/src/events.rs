//! Input event types for the surveillance pipeline.
//!
//! A run consumes two time-sorted streams for a single trading pair:
//! executed trades and order-book snapshots. Both are produced by the
//! loading collaborator and are immutable once ingested.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    /// Buyer was the aggressor
    Buy,
    /// Seller was the aggressor
    Sell,
}

impl TradeSide {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl FromStr for TradeSide {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(anyhow!("invalid trade side: '{other}'")),
        }
    }
}

/// A single executed trade.
///
/// The input contract guarantees a positive price and a non-negative size;
/// the stream is sorted by timestamp with ties kept in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Execution timestamp
    pub timestamp: DateTime<Utc>,
    /// Execution price
    pub price: Decimal,
    /// Executed size in base units
    pub size: Decimal,
    /// Aggressor side
    pub side: TradeSide,
}

impl TradeEvent {
    /// Creates a new trade event.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, price: Decimal, size: Decimal, side: TradeSide) -> Self {
        Self {
            timestamp,
            price,
            size,
            side,
        }
    }

    /// Returns true if this is a buy trade.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side == TradeSide::Buy
    }
}

/// One price level of an order book side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Level price
    pub price: Decimal,
    /// Resting size at this price
    pub size: Decimal,
}

/// A point-in-time order-book snapshot.
///
/// Either side may be empty; a snapshot missing a side is unusable for
/// metrics and is skipped, never defaulted to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Snapshot timestamp
    pub timestamp: DateTime<Utc>,
    /// Ask levels (sell interest), in no particular order
    pub asks: Vec<PriceLevel>,
    /// Bid levels (buy interest), in no particular order
    pub bids: Vec<PriceLevel>,
}

impl OrderBookSnapshot {
    /// Returns true when both sides carry at least one level.
    #[must_use]
    pub fn has_both_sides(&self) -> bool {
        !self.asks.is_empty() && !self.bids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn trade_side_as_str() {
        assert_eq!(TradeSide::Buy.as_str(), "BUY");
        assert_eq!(TradeSide::Sell.as_str(), "SELL");
    }

    #[test]
    fn trade_side_opposite() {
        assert_eq!(TradeSide::Buy.opposite(), TradeSide::Sell);
        assert_eq!(TradeSide::Sell.opposite(), TradeSide::Buy);
    }

    #[test]
    fn trade_side_parses_case_insensitively() {
        assert_eq!("BUY".parse::<TradeSide>().unwrap(), TradeSide::Buy);
        assert_eq!(" sell ".parse::<TradeSide>().unwrap(), TradeSide::Sell);
        assert!("HOLD".parse::<TradeSide>().is_err());
    }

    #[test]
    fn snapshot_usability_requires_both_sides() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let level = PriceLevel {
            price: dec!(100),
            size: dec!(1),
        };

        let both = OrderBookSnapshot {
            timestamp: ts,
            asks: vec![level],
            bids: vec![level],
        };
        assert!(both.has_both_sides());

        let no_bids = OrderBookSnapshot {
            timestamp: ts,
            asks: vec![level],
            bids: vec![],
        };
        assert!(!no_bids.has_both_sides());
    }
}
