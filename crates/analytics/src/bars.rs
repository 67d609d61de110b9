//! Bar aggregation.
//!
//! Partitions the trade stream into fixed-width buckets and derives per-bar
//! returns plus rolling volume/return z-scores. Buckets before the first
//! trade are never materialized; buckets inside the covered range with no
//! trades are retained as unpriced bars so that gaps stay visible downstream.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use market_sentry_core::bar::Bar;
use market_sentry_core::config::BarConfig;
use market_sentry_core::events::TradeEvent;
use market_sentry_core::rolling::{rolling_stats, zscore};

/// Floors a timestamp to the start of its `width_secs`-wide bucket.
pub(crate) fn floor_to_interval(ts: DateTime<Utc>, width_secs: i64) -> DateTime<Utc> {
    let rem = ts.timestamp().rem_euclid(width_secs);
    let floored = ts - Duration::seconds(rem);
    floored - Duration::nanoseconds(i64::from(floored.timestamp_subsec_nanos()))
}

/// Relative price change `current / previous - 1`, `None` on a degenerate base.
pub(crate) fn price_ratio(current: Decimal, previous: Decimal) -> Option<f64> {
    if previous.is_zero() {
        return None;
    }
    (current / previous).to_f64().map(|r| r - 1.0)
}

/// Aggregates a time-sorted trade stream into fixed-interval bars.
///
/// The returned sequence covers every bucket from the first trade's bucket
/// through the last trade's bucket, one `Bar` per bucket. Returns are
/// computed against the immediately prior bucket in the retained sequence,
/// so the first bar and any bar following an unpriced bucket carry no
/// return. Rolling statistics follow the insufficient-sample rule of
/// [`market_sentry_core::rolling`].
#[must_use]
pub fn aggregate_trades(trades: &[TradeEvent], config: &BarConfig) -> Vec<Bar> {
    if trades.is_empty() {
        return Vec::new();
    }

    let width = config.interval_secs.max(1) as i64;
    let first_bucket = trades[0].timestamp.timestamp().div_euclid(width);
    let last_bucket = trades[trades.len() - 1].timestamp.timestamp().div_euclid(width);

    let mut bars: Vec<Bar> = Vec::with_capacity((last_bucket - first_bucket + 1) as usize);
    let mut bucket_start = floor_to_interval(trades[0].timestamp, width);
    let step = Duration::seconds(width);
    let mut cursor = 0usize;

    for bucket in first_bucket..=last_bucket {
        let mut bar = Bar::empty(bucket_start);
        while cursor < trades.len()
            && trades[cursor].timestamp.timestamp().div_euclid(width) == bucket
        {
            let trade = &trades[cursor];
            bar.last_price = Some(trade.price);
            bar.volume += trade.size;
            if trade.is_buy() {
                bar.buy_volume += trade.size;
            } else {
                bar.sell_volume += trade.size;
            }
            bar.trade_count += 1;
            cursor += 1;
        }
        bars.push(bar);
        bucket_start += step;
    }

    for i in 1..bars.len() {
        bars[i].pct_return = match (bars[i - 1].last_price, bars[i].last_price) {
            (Some(prev), Some(current)) => price_ratio(current, prev),
            _ => None,
        };
    }

    let volumes: Vec<Option<f64>> = bars.iter().map(|b| b.volume.to_f64()).collect();
    let returns: Vec<Option<f64>> = bars.iter().map(|b| b.pct_return).collect();
    let volume_roll = rolling_stats(&volumes, config.rolling_window);
    let return_roll = rolling_stats(&returns, config.rolling_window);

    for (i, bar) in bars.iter_mut().enumerate() {
        if let Some(stats) = volume_roll[i] {
            bar.volume_mean = Some(stats.mean);
            bar.volume_std = Some(stats.std_dev);
            bar.volume_zscore = volumes[i].and_then(|v| zscore(v, &stats));
        }
        if let Some(stats) = return_roll[i] {
            bar.return_mean = Some(stats.mean);
            bar.return_std = Some(stats.std_dev);
            bar.return_zscore = bar.pct_return.and_then(|r| zscore(r, &stats));
        }
    }

    debug!(
        bars = bars.len(),
        trades = trades.len(),
        interval_secs = config.interval_secs,
        "aggregated trades into bars"
    );

    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use market_sentry_core::events::TradeSide;
    use rust_decimal_macros::dec;

    fn ts(min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12 + min / 60, min % 60, sec).unwrap()
    }

    fn trade(min: u32, sec: u32, price: Decimal, size: Decimal, side: TradeSide) -> TradeEvent {
        TradeEvent::new(ts(min, sec), price, size, side)
    }

    fn minute_bars() -> BarConfig {
        BarConfig {
            interval_secs: 60,
            rolling_window: 30,
        }
    }

    #[test]
    fn single_trade_produces_one_bar_with_no_statistics() {
        let trades = vec![trade(0, 0, dec!(1.00), dec!(10), TradeSide::Buy)];

        let bars = aggregate_trades(&trades, &minute_bars());

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].last_price, Some(dec!(1.00)));
        assert_eq!(bars[0].volume, dec!(10));
        assert_eq!(bars[0].buy_volume, dec!(10));
        assert_eq!(bars[0].sell_volume, Decimal::ZERO);
        assert_eq!(bars[0].trade_count, 1);
        assert!(bars[0].pct_return.is_none());
        assert!(bars[0].volume_zscore.is_none());
        assert!(bars[0].return_zscore.is_none());
    }

    #[test]
    fn last_price_follows_time_order_within_a_bucket() {
        let trades = vec![
            trade(0, 5, dec!(1.00), dec!(1), TradeSide::Buy),
            trade(0, 30, dec!(1.10), dec!(2), TradeSide::Sell),
            trade(0, 59, dec!(1.05), dec!(3), TradeSide::Buy),
        ];

        let bars = aggregate_trades(&trades, &minute_bars());

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].last_price, Some(dec!(1.05)));
        assert_eq!(bars[0].volume, dec!(6));
        assert_eq!(bars[0].buy_volume, dec!(4));
        assert_eq!(bars[0].sell_volume, dec!(2));
        assert_eq!(bars[0].trade_count, 3);
    }

    #[test]
    fn bucket_boundary_starts_a_new_bar() {
        let trades = vec![
            trade(0, 59, dec!(1.00), dec!(1), TradeSide::Buy),
            trade(1, 0, dec!(2.00), dec!(1), TradeSide::Buy),
        ];

        let bars = aggregate_trades(&trades, &minute_bars());

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].bucket_start, ts(0, 0));
        assert_eq!(bars[1].bucket_start, ts(1, 0));
        assert_eq!(bars[1].last_price, Some(dec!(2.00)));
        // 2.00 / 1.00 - 1
        assert!((bars[1].pct_return.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gap_buckets_are_retained_and_suppress_the_next_return() {
        let trades = vec![
            trade(0, 0, dec!(1.00), dec!(1), TradeSide::Buy),
            trade(2, 0, dec!(1.10), dec!(1), TradeSide::Sell),
            trade(3, 0, dec!(1.21), dec!(1), TradeSide::Buy),
        ];

        let bars = aggregate_trades(&trades, &minute_bars());

        assert_eq!(bars.len(), 4);
        assert!(bars[1].last_price.is_none());
        assert_eq!(bars[1].volume, Decimal::ZERO);

        // First bar, gap bar, and first priced bar after the gap all have no
        // return; only the fully-connected bar does.
        assert!(bars[0].pct_return.is_none());
        assert!(bars[1].pct_return.is_none());
        assert!(bars[2].pct_return.is_none());
        let r = bars[3].pct_return.unwrap();
        assert!((r - 0.1).abs() < 1e-9, "return was {r}");
    }

    #[test]
    fn volume_zscore_flags_only_the_spike_bar() {
        let mut trades: Vec<TradeEvent> = (0..30)
            .map(|i| trade(i, 0, dec!(1.00), dec!(1), TradeSide::Buy))
            .collect();
        trades.push(trade(30, 0, dec!(1.00), dec!(1000), TradeSide::Buy));

        let bars = aggregate_trades(&trades, &minute_bars());

        assert_eq!(bars.len(), 31);
        // Indices below window - 1 have no window at all.
        assert!(bars[..29].iter().all(|b| b.volume_zscore.is_none()));
        // Index 29: full window of identical volumes, zero deviation.
        assert!(bars[29].volume_mean.is_some());
        assert!(bars[29].volume_zscore.is_none());
        // The spike bar stands far above its trailing window.
        let z = bars[30].volume_zscore.unwrap();
        assert!(z > 3.0, "zscore was {z}");
    }

    #[test]
    fn empty_stream_produces_no_bars() {
        let bars = aggregate_trades(&[], &minute_bars());
        assert!(bars.is_empty());
    }
}
