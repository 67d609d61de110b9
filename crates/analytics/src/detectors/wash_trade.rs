//! Wash-trade pair detection.
//!
//! Scans adjacent trades only: trade `i` is compared with trade `i + 1` and
//! nothing else, a single O(n) pass. A matching opposite-side trade two or
//! more positions away is never paired, even when every other criterion
//! holds. That adjacency limit is part of the detector's definition: a
//! windowed all-pairs variant would be a different detector with its own
//! name and tests, not a widening of this one.

use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use market_sentry_core::config::WashTradeConfig;
use market_sentry_core::events::TradeEvent;
use market_sentry_core::findings::WashTradePair;

/// Flags back-to-back opposite-side trades at an identical price and similar
/// size within the configured time gap.
///
/// Size similarity is `|size_a - size_b| / max(size_a, size_b) <
/// size_tolerance`; a pair where the larger size is zero is skipped. The
/// time gap comparison is inclusive.
#[must_use]
pub fn detect_wash_pairs(trades: &[TradeEvent], config: &WashTradeConfig) -> Vec<WashTradePair> {
    let max_gap = chrono::Duration::seconds(config.max_gap_secs);

    let mut pairs = Vec::new();
    for pair in trades.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);

        if a.side == b.side || a.price != b.price {
            continue;
        }

        let larger = a.size.max(b.size);
        if larger.is_zero() {
            continue;
        }
        let diff_ratio = ((a.size - b.size).abs() / larger).to_f64().unwrap_or(f64::MAX);
        if diff_ratio >= config.size_tolerance {
            continue;
        }

        if b.timestamp.signed_duration_since(a.timestamp) > max_gap {
            continue;
        }

        pairs.push(WashTradePair {
            t0: a.timestamp,
            t1: b.timestamp,
            price: a.price,
            size_a: a.size,
            size_b: b.size,
            side_a: a.side,
            side_b: b.side,
        });
    }

    debug!(pairs = pairs.len(), trades = trades.len(), "wash-trade scan complete");
    pairs
}
