//! Micro-trade burst detection.
//!
//! Flags clusters of tiny prints repeating at one exact price inside one
//! sub-second-resolution bucket. Price equality is exact decimal equality,
//! with no tolerance: near-identical prices are two different groups. That
//! strictness is deliberate; it targets algorithmic pinging, which reprints
//! at the same tick.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use market_sentry_core::config::MicroBurstConfig;
use market_sentry_core::events::TradeEvent;
use market_sentry_core::findings::MicroBurst;

use crate::bars::floor_to_interval;

/// Groups small trades by (sub-bucket, exact price) and reports groups with
/// at least `min_trades` members.
///
/// Only trades with `size <= size_ceiling` participate. Results are ordered
/// by bucket start, then price.
#[must_use]
pub fn detect_micro_bursts(trades: &[TradeEvent], config: &MicroBurstConfig) -> Vec<MicroBurst> {
    let width = config.window_secs.max(1) as i64;

    let mut groups: HashMap<(DateTime<Utc>, Decimal), usize> = HashMap::new();
    for trade in trades {
        if trade.size > config.size_ceiling {
            continue;
        }
        let bucket = floor_to_interval(trade.timestamp, width);
        *groups.entry((bucket, trade.price)).or_insert(0) += 1;
    }

    let mut bursts: Vec<MicroBurst> = groups
        .into_iter()
        .filter(|(_, count)| *count >= config.min_trades)
        .map(|((bucket_start, price), trade_count)| MicroBurst {
            bucket_start,
            price,
            trade_count,
        })
        .collect();

    bursts.sort_by(|a, b| (a.bucket_start, a.price).cmp(&(b.bucket_start, b.price)));
    bursts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use market_sentry_core::events::TradeSide;
    use rust_decimal_macros::dec;

    fn trade(sec: u32, milli: u32, price: Decimal, size: Decimal) -> TradeEvent {
        let ts = Utc
            .with_ymd_and_hms(2025, 3, 1, 12, 0, sec)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(i64::from(milli)))
            .unwrap();
        TradeEvent::new(ts, price, size, TradeSide::Buy)
    }

    fn default_config() -> MicroBurstConfig {
        MicroBurstConfig::default()
    }

    #[test]
    fn four_small_prints_in_one_second_form_a_burst() {
        let trades = vec![
            trade(0, 100, dec!(1.0), dec!(0.005)),
            trade(0, 300, dec!(1.0), dec!(0.004)),
            trade(0, 600, dec!(1.0), dec!(0.01)),
            trade(0, 900, dec!(1.0), dec!(0.002)),
        ];

        let bursts = detect_micro_bursts(&trades, &default_config());

        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].price, dec!(1.0));
        assert_eq!(bursts[0].trade_count, 4);
        assert_eq!(
            bursts[0].bucket_start,
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn three_prints_stay_below_the_minimum() {
        let trades = vec![
            trade(0, 100, dec!(1.0), dec!(0.005)),
            trade(0, 300, dec!(1.0), dec!(0.005)),
            trade(0, 600, dec!(1.0), dec!(0.005)),
        ];

        assert!(detect_micro_bursts(&trades, &default_config()).is_empty());
    }

    #[test]
    fn trades_above_the_size_ceiling_never_participate() {
        let trades = vec![
            trade(0, 100, dec!(1.0), dec!(0.005)),
            trade(0, 200, dec!(1.0), dec!(0.005)),
            trade(0, 300, dec!(1.0), dec!(0.005)),
            trade(0, 400, dec!(1.0), dec!(0.5)), // too large to count
        ];

        assert!(detect_micro_bursts(&trades, &default_config()).is_empty());
    }

    #[test]
    fn price_equality_is_exact() {
        let trades = vec![
            trade(0, 100, dec!(1.0000), dec!(0.005)),
            trade(0, 200, dec!(1.0000), dec!(0.005)),
            trade(0, 300, dec!(1.0001), dec!(0.005)),
            trade(0, 400, dec!(1.0001), dec!(0.005)),
        ];

        // Two groups of two: neither reaches the minimum of four.
        assert!(detect_micro_bursts(&trades, &default_config()).is_empty());
    }

    #[test]
    fn prints_split_across_seconds_do_not_merge() {
        let trades = vec![
            trade(0, 800, dec!(1.0), dec!(0.005)),
            trade(0, 900, dec!(1.0), dec!(0.005)),
            trade(1, 0, dec!(1.0), dec!(0.005)),
            trade(1, 100, dec!(1.0), dec!(0.005)),
        ];

        assert!(detect_micro_bursts(&trades, &default_config()).is_empty());
    }
}
