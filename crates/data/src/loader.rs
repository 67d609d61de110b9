//! CSV ingestion for the two input streams.
//!
//! The pipeline core assumes validated, time-sorted in-memory sequences;
//! this loader is the collaborator that produces them. A missing required
//! column is fatal and aborts before detection begins. Individual malformed
//! rows (unparseable timestamp, non-positive price, unknown side) are
//! dropped and counted, matching the upstream-drops input contract.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use market_sentry_core::events::{OrderBookSnapshot, PriceLevel, TradeEvent, TradeSide};

/// Errors raised while turning raw files into event streams.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file lacks a column the schema requires.
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses a UTC timestamp from the formats the archives actually use:
/// RFC 3339, offset-suffixed, or naive (assumed UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%z") {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f %z") {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    None
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

fn parse_trade_row(
    record: &StringRecord,
    ts_idx: usize,
    price_idx: usize,
    size_idx: usize,
    side_idx: usize,
) -> Option<TradeEvent> {
    let timestamp = parse_timestamp(record.get(ts_idx)?)?;
    let price = Decimal::from_str(record.get(price_idx)?.trim()).ok()?;
    let size = Decimal::from_str(record.get(size_idx)?.trim()).ok()?;
    if price <= Decimal::ZERO || size < Decimal::ZERO {
        return None;
    }
    let side = record.get(side_idx)?.parse::<TradeSide>().ok()?;
    Some(TradeEvent::new(timestamp, price, size, side))
}

/// Loads the trade stream from a CSV with columns
/// `timestamp,price,size,side` (any order, case-insensitive headers).
///
/// The result is sorted by timestamp; the sort is stable, so trades sharing
/// a timestamp keep their arrival order.
///
/// # Errors
///
/// Returns [`DataError::MissingColumn`] when a required column is absent,
/// or an I/O / CSV error when the file cannot be read.
pub fn load_trades(path: &Path) -> Result<Vec<TradeEvent>, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let ts_idx = column_index(&headers, "timestamp")?;
    let price_idx = column_index(&headers, "price")?;
    let size_idx = column_index(&headers, "size")?;
    let side_idx = column_index(&headers, "side")?;

    let mut trades = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        match parse_trade_row(&record, ts_idx, price_idx, size_idx, side_idx) {
            Some(trade) => trades.push(trade),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(dropped, file = %path.display(), "dropped malformed trade rows");
    }

    trades.sort_by_key(|t| t.timestamp);
    Ok(trades)
}

#[derive(Debug, Deserialize)]
struct RawLevel {
    price: Decimal,
    size: Decimal,
}

/// Parses one asks/bids cell: a JSON array of `{"price": .., "size": ..}`
/// objects. Python-repr dumps (single-quoted) are normalized before the
/// retry. `None` means the cell was present but unparseable.
fn parse_levels(cell: &str) -> Option<Vec<PriceLevel>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(Vec::new());
    }

    let levels: Vec<RawLevel> = serde_json::from_str(cell)
        .or_else(|_| serde_json::from_str(&cell.replace('\'', "\"")))
        .ok()?;

    Some(
        levels
            .into_iter()
            .map(|l| PriceLevel {
                price: l.price,
                size: l.size,
            })
            .collect(),
    )
}

/// Loads the order-book stream from a CSV with columns
/// `timestamp,asks,bids`.
///
/// A snapshot row with an unparseable timestamp is dropped; an unparseable
/// side cell degrades to an empty side, which the metrics engine then
/// skips as unusable.
///
/// # Errors
///
/// Returns [`DataError::MissingColumn`] when a required column is absent,
/// or an I/O / CSV error when the file cannot be read.
pub fn load_order_books(path: &Path) -> Result<Vec<OrderBookSnapshot>, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let ts_idx = column_index(&headers, "timestamp")?;
    let asks_idx = column_index(&headers, "asks")?;
    let bids_idx = column_index(&headers, "bids")?;

    let mut snapshots = Vec::new();
    let mut dropped_rows = 0usize;
    let mut unparseable_sides = 0usize;
    for record in reader.records() {
        let record = record?;
        let Some(timestamp) = record.get(ts_idx).and_then(parse_timestamp) else {
            dropped_rows += 1;
            continue;
        };
        let asks = record.get(asks_idx).and_then(parse_levels).unwrap_or_else(|| {
            unparseable_sides += 1;
            Vec::new()
        });
        let bids = record.get(bids_idx).and_then(parse_levels).unwrap_or_else(|| {
            unparseable_sides += 1;
            Vec::new()
        });
        snapshots.push(OrderBookSnapshot {
            timestamp,
            asks,
            bids,
        });
    }
    if dropped_rows > 0 || unparseable_sides > 0 {
        warn!(
            dropped_rows,
            unparseable_sides,
            file = %path.display(),
            "order-book input had malformed entries"
        );
    }

    snapshots.sort_by_key(|s| s.timestamp);
    Ok(snapshots)
}
