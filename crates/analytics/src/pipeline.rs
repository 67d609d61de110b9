//! Pipeline orchestration and summary assembly.
//!
//! Runs every stage over the two input streams and collects the outputs
//! into one `AnalysisSummary`. Stages hand each other immutable sequences;
//! no detector can observe or disturb another's result, and insufficient
//! data degrades to empty collections or `None` scalars rather than errors,
//! so any well-formed input yields a complete summary.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::info;

use market_sentry_core::config::AnalysisConfig;
use market_sentry_core::events::{OrderBookSnapshot, TradeEvent};
use market_sentry_core::summary::{AnalysisSummary, InputStats};

use crate::bars::aggregate_trades;
use crate::correlation::imbalance_future_return_correlation;
use crate::detectors::{
    detect_micro_bursts, detect_pump_dump, detect_wash_pairs, return_outliers, volume_spikes,
};
use crate::orderbook::{compute_metrics, median};

fn input_stats(first: Option<chrono::DateTime<chrono::Utc>>, last: Option<chrono::DateTime<chrono::Utc>>, rows: usize) -> InputStats {
    InputStats {
        rows,
        start: first,
        end: last,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Runs the full detection pipeline and assembles the summary.
#[must_use]
pub fn run_analysis(
    trades: &[TradeEvent],
    snapshots: &[OrderBookSnapshot],
    config: &AnalysisConfig,
) -> AnalysisSummary {
    info!(
        trades = trades.len(),
        snapshots = snapshots.len(),
        "starting analysis run"
    );

    let bars = aggregate_trades(trades, &config.bars);
    let volume_spikes = volume_spikes(&bars, config.thresholds.volume_z);
    let return_outliers = return_outliers(&bars, config.thresholds.return_z);
    let micro_bursts = detect_micro_bursts(trades, &config.micro_burst);
    let wash_pairs = detect_wash_pairs(trades, &config.wash_trade);
    let pump_dump_events = detect_pump_dump(&bars, &config.pump_dump);
    let order_book_metrics = compute_metrics(snapshots, &config.order_book);
    let imbalance_correlation = imbalance_future_return_correlation(
        &order_book_metrics,
        &bars,
        config.correlation.horizon,
    );

    let spreads: Vec<Decimal> = order_book_metrics.iter().map(|m| m.spread).collect();
    let spread_median = median(&spreads).and_then(|m| m.to_f64());
    let imbalances: Vec<f64> = order_book_metrics
        .iter()
        .filter_map(|m| m.imbalance)
        .collect();
    let imbalance_mean = mean(&imbalances);
    let wall_snapshot_count = order_book_metrics.iter().filter(|m| m.has_wall()).count();

    info!(
        bars = bars.len(),
        volume_spikes = volume_spikes.len(),
        return_outliers = return_outliers.len(),
        micro_bursts = micro_bursts.len(),
        wash_pairs = wash_pairs.len(),
        pump_dump_events = pump_dump_events.len(),
        book_metrics = order_book_metrics.len(),
        wall_snapshots = wall_snapshot_count,
        "analysis run complete"
    );

    AnalysisSummary {
        trades: input_stats(
            trades.first().map(|t| t.timestamp),
            trades.last().map(|t| t.timestamp),
            trades.len(),
        ),
        order_books: input_stats(
            snapshots.first().map(|s| s.timestamp),
            snapshots.last().map(|s| s.timestamp),
            snapshots.len(),
        ),
        volume_spikes,
        return_outliers,
        micro_bursts,
        wash_pairs,
        pump_dump_events,
        spread_median,
        imbalance_mean,
        wall_snapshot_count,
        imbalance_correlation,
        bars,
        order_book_metrics,
        artifacts: Vec::new(),
    }
}
