//! Order-book microstructure metrics.
//!
//! Converts the snapshot stream into per-snapshot best levels, spread, mid,
//! top-N depth volumes, imbalance, and wall flags. A snapshot missing either
//! side carries no usable best level and is skipped outright rather than
//! defaulted to zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use market_sentry_core::config::OrderBookConfig;
use market_sentry_core::events::{OrderBookSnapshot, PriceLevel};
use market_sentry_core::metrics::OrderBookMetric;

/// Median of a set of decimal values, `None` when empty.
///
/// Even-sized sets take the mean of the two middle values.
pub(crate) fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / Decimal::TWO)
    }
}

/// True when the largest size in a top-N level set exceeds ten times the
/// median size of that same set. An empty set never flags.
fn wall_flag(sizes: &[Decimal]) -> bool {
    match (sizes.iter().max(), median(sizes)) {
        (Some(max), Some(med)) => *max > Decimal::TEN * med,
        _ => false,
    }
}

/// The `depth` levels nearest the best, best first.
fn top_levels(levels: &[PriceLevel], depth: usize, ascending: bool) -> Vec<PriceLevel> {
    let mut sorted = levels.to_vec();
    if ascending {
        sorted.sort_by(|a, b| a.price.cmp(&b.price));
    } else {
        sorted.sort_by(|a, b| b.price.cmp(&a.price));
    }
    sorted.truncate(depth);
    sorted
}

/// Computes one `OrderBookMetric` per usable snapshot, ordered by timestamp.
#[must_use]
pub fn compute_metrics(
    snapshots: &[OrderBookSnapshot],
    config: &OrderBookConfig,
) -> Vec<OrderBookMetric> {
    let mut metrics = Vec::with_capacity(snapshots.len());
    let mut skipped = 0usize;

    for snapshot in snapshots {
        if !snapshot.has_both_sides() {
            skipped += 1;
            continue;
        }
        let Some(best_ask) = snapshot.asks.iter().map(|l| l.price).min() else {
            continue;
        };
        let Some(best_bid) = snapshot.bids.iter().map(|l| l.price).max() else {
            continue;
        };

        let top_asks = top_levels(&snapshot.asks, config.depth, true);
        let top_bids = top_levels(&snapshot.bids, config.depth, false);
        let ask_sizes: Vec<Decimal> = top_asks.iter().map(|l| l.size).collect();
        let bid_sizes: Vec<Decimal> = top_bids.iter().map(|l| l.size).collect();

        let ask_vol_top: Decimal = ask_sizes.iter().copied().sum();
        let bid_vol_top: Decimal = bid_sizes.iter().copied().sum();
        let total_top = ask_vol_top + bid_vol_top;
        let imbalance = if total_top.is_zero() {
            None
        } else {
            ((bid_vol_top - ask_vol_top) / total_top).to_f64()
        };

        metrics.push(OrderBookMetric {
            timestamp: snapshot.timestamp,
            best_bid,
            best_ask,
            spread: best_ask - best_bid,
            mid: (best_ask + best_bid) / Decimal::TWO,
            ask_vol_top,
            bid_vol_top,
            imbalance,
            ask_wall: wall_flag(&ask_sizes),
            bid_wall: wall_flag(&bid_sizes),
        });
    }

    metrics.sort_by_key(|m| m.timestamp);

    debug!(
        metrics = metrics.len(),
        skipped,
        depth = config.depth,
        "computed order-book metrics"
    );

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn ts(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, sec).unwrap()
    }

    fn level(price: Decimal, size: Decimal) -> PriceLevel {
        PriceLevel { price, size }
    }

    fn snapshot(sec: u32, asks: Vec<PriceLevel>, bids: Vec<PriceLevel>) -> OrderBookSnapshot {
        OrderBookSnapshot {
            timestamp: ts(sec),
            asks,
            bids,
        }
    }

    #[test]
    fn best_levels_spread_and_mid() {
        let snapshots = vec![snapshot(
            0,
            vec![level(dec!(102), dec!(1)), level(dec!(101), dec!(2))],
            vec![level(dec!(98), dec!(1)), level(dec!(99), dec!(2))],
        )];

        let metrics = compute_metrics(&snapshots, &OrderBookConfig { depth: 5 });

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].best_ask, dec!(101));
        assert_eq!(metrics[0].best_bid, dec!(99));
        assert_eq!(metrics[0].spread, dec!(2));
        assert_eq!(metrics[0].mid, dec!(100));
    }

    #[test]
    fn one_sided_snapshots_are_skipped() {
        let snapshots = vec![
            snapshot(0, vec![level(dec!(101), dec!(1))], vec![]),
            snapshot(1, vec![], vec![level(dec!(99), dec!(1))]),
            snapshot(2, vec![], vec![]),
            snapshot(
                3,
                vec![level(dec!(101), dec!(1))],
                vec![level(dec!(99), dec!(1))],
            ),
        ];

        let metrics = compute_metrics(&snapshots, &OrderBookConfig::default());

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].timestamp, ts(3));
    }

    #[test]
    fn top_n_restricts_depth_by_proximity_to_best() {
        let snapshots = vec![snapshot(
            0,
            vec![
                level(dec!(101), dec!(1)),
                level(dec!(102), dec!(2)),
                level(dec!(110), dec!(100)), // beyond depth 2
            ],
            vec![
                level(dec!(99), dec!(3)),
                level(dec!(98), dec!(4)),
                level(dec!(90), dec!(100)), // beyond depth 2
            ],
        )];

        let metrics = compute_metrics(&snapshots, &OrderBookConfig { depth: 2 });

        assert_eq!(metrics[0].ask_vol_top, dec!(3));
        assert_eq!(metrics[0].bid_vol_top, dec!(7));
    }

    #[test]
    fn ask_wall_flags_a_dominant_level() {
        // max 50 > 10 * median(1, 1, 50) = 10 on the ask side only.
        let snapshots = vec![snapshot(
            0,
            vec![
                level(dec!(101), dec!(1)),
                level(dec!(102), dec!(1)),
                level(dec!(103), dec!(50)),
            ],
            vec![level(dec!(99), dec!(1)), level(dec!(98), dec!(1))],
        )];

        let metrics = compute_metrics(&snapshots, &OrderBookConfig { depth: 3 });

        assert!(metrics[0].ask_wall);
        assert!(!metrics[0].bid_wall);
        assert!(metrics[0].has_wall());
    }

    #[test]
    fn bid_wall_detection_is_symmetric() {
        let snapshots = vec![snapshot(
            0,
            vec![level(dec!(101), dec!(1)), level(dec!(102), dec!(1))],
            vec![
                level(dec!(99), dec!(1)),
                level(dec!(98), dec!(1)),
                level(dec!(97), dec!(50)),
            ],
        )];

        let metrics = compute_metrics(&snapshots, &OrderBookConfig { depth: 3 });

        assert!(!metrics[0].ask_wall);
        assert!(metrics[0].bid_wall);
    }

    #[test]
    fn imbalance_is_bounded_and_none_on_zero_depth_volume() {
        let zero_sizes = vec![snapshot(
            0,
            vec![level(dec!(101), dec!(0))],
            vec![level(dec!(99), dec!(0))],
        )];
        let metrics = compute_metrics(&zero_sizes, &OrderBookConfig::default());
        assert!(metrics[0].imbalance.is_none());

        let bid_heavy = vec![snapshot(
            0,
            vec![level(dec!(101), dec!(1))],
            vec![level(dec!(99), dec!(9))],
        )];
        let metrics = compute_metrics(&bid_heavy, &OrderBookConfig::default());
        let imbalance = metrics[0].imbalance.unwrap();
        assert!((imbalance - 0.8).abs() < 1e-12);
        assert!((-1.0..=1.0).contains(&imbalance));
    }

    #[test]
    fn median_averages_the_middle_pair_for_even_sets() {
        assert_eq!(median(&[dec!(1), dec!(3)]), Some(dec!(2)));
        assert_eq!(median(&[dec!(5), dec!(1), dec!(3)]), Some(dec!(3)));
        assert_eq!(median(&[]), None);
    }
}
