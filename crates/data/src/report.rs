//! Artifact rendering: Markdown report and JSON summary.
//!
//! Consumes the assembled `AnalysisSummary` and writes the two on-disk
//! artifacts. The core never reads these back; it only records the paths.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::info;

use market_sentry_core::summary::AnalysisSummary;

/// File name of the rendered Markdown report.
pub const REPORT_FILE: &str = "Market_Analysis_Report.md";
/// File name of the scalar JSON summary.
pub const SUMMARY_FILE: &str = "summary.json";

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "n/a".to_string(),
    }
}

fn fmt_range(start: Option<chrono::DateTime<chrono::Utc>>, end: Option<chrono::DateTime<chrono::Utc>>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{} to {} (UTC)", s.to_rfc3339(), e.to_rfc3339()),
        _ => "no data".to_string(),
    }
}

fn build_scalars(summary: &AnalysisSummary, artifacts: &[String]) -> Value {
    json!({
        "trades_rows": summary.trades.rows,
        "trades_start": summary.trades.start.map(|t| t.to_rfc3339()),
        "trades_end": summary.trades.end.map(|t| t.to_rfc3339()),
        "orderbooks_rows": summary.order_books.rows,
        "ob_start": summary.order_books.start.map(|t| t.to_rfc3339()),
        "ob_end": summary.order_books.end.map(|t| t.to_rfc3339()),
        "volume_spikes": summary.volume_spikes.len(),
        "return_outliers": summary.return_outliers.len(),
        "micro_bursts": summary.micro_bursts.len(),
        "wash_pairs": summary.wash_pairs.len(),
        "pump_dump_events": summary.pump_dump_events.len(),
        "spread_median": summary.spread_median,
        "imbalance_mean": summary.imbalance_mean,
        "num_walls": summary.wall_snapshot_count,
        "imbalance_future_corr": summary.imbalance_correlation.coefficient,
        "correlation_samples": summary.imbalance_correlation.sample_size,
        "artifacts": artifacts,
    })
}

/// The scalar view of a summary, as written to `summary.json`.
#[must_use]
pub fn scalar_summary(summary: &AnalysisSummary) -> Value {
    build_scalars(summary, &summary.artifacts)
}

/// Renders the Markdown report body.
#[must_use]
pub fn render_report(summary: &AnalysisSummary) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Market Data Analysis: Suspicious Patterns".to_string());
    lines.push(String::new());
    lines.push(
        "This report presents a focused investigation into potential irregularities and \
         manipulative behaviors in the pair's market activity using the provided trade and \
         order-book samples."
            .to_string(),
    );
    lines.push(String::new());

    lines.push("**Data Overview**".to_string());
    lines.push(format!(
        "- Trades: {} rows; timeframe: {}",
        summary.trades.rows,
        fmt_range(summary.trades.start, summary.trades.end)
    ));
    lines.push(format!(
        "- Orderbooks: {} snapshots; timeframe: {}",
        summary.order_books.rows,
        fmt_range(summary.order_books.start, summary.order_books.end)
    ));
    lines.push("- Aggregation: fixed-interval bars for price, volume, and returns".to_string());
    lines.push(String::new());

    lines.push("**Key Findings**".to_string());
    lines.push(format!(
        "- Volume spikes: {} interval(s) exceed the rolling volume z-score threshold, \
         indicating abnormal liquidity bursts possibly linked to coordinated activity.",
        summary.volume_spikes.len()
    ));
    lines.push(format!(
        "- Return outliers: {} statistically unusual jump(s)/drop(s) suggest potential price \
         impact actions beyond typical volatility.",
        summary.return_outliers.len()
    ));
    lines.push(format!(
        "- Micro-trade bursts: {} group(s) of repetitive small trades at identical price \
         within seconds, likely reflecting algorithmic pinging or quote-stuffing-like behavior.",
        summary.micro_bursts.len()
    ));
    if summary.wash_pairs.is_empty() {
        lines.push(
            "- Wash-trading heuristic: no strong back-to-back opposite-side pairs detected \
             under strict criteria; however, burst patterns warrant attention."
                .to_string(),
        );
    } else {
        lines.push(format!(
            "- Wash-trading heuristic: {} back-to-back opposite-side pair(s) at identical \
             price and similar size within the time threshold were observed.",
            summary.wash_pairs.len()
        ));
    }
    if summary.pump_dump_events.is_empty() {
        lines.push(
            "- Pump-and-dump signals: no clear multi-window sequences detected under \
             conservative thresholds."
                .to_string(),
        );
    } else {
        lines.push(format!(
            "- Pump-and-dump signals: {} sequence(s) with strong run-up followed by sharp \
             reversal under elevated volume were flagged.",
            summary.pump_dump_events.len()
        ));
    }
    lines.push(String::new());

    lines.push("**Orderbook Irregularities**".to_string());
    lines.push(format!(
        "- Spread behavior: median spread is {}; outliers suggest transient liquidity \
         withdrawal or aggressive step-function updates.",
        fmt_opt(summary.spread_median, 6)
    ));
    lines.push(format!(
        "- Top-of-book imbalance: mean imbalance {}. Extreme imbalances may precede \
         directional moves; correlation with future returns: {} over {} aligned sample(s).",
        fmt_opt(summary.imbalance_mean, 3),
        fmt_opt(summary.imbalance_correlation.coefficient, 3),
        summary.imbalance_correlation.sample_size
    ));
    lines.push(format!(
        "- Walls near best levels: {} snapshot(s) show 10x-median size walls within the \
         top levels, indicative of potential spoof-like signaling.",
        summary.wall_snapshot_count
    ));
    lines.push(String::new());

    lines.push("**Methodology and Limitations**".to_string());
    lines.push(
        "- The analysis uses rolling z-scores for volume and returns to flag anomalies."
            .to_string(),
    );
    lines.push(
        "- Wash-trading detection relies on heuristic matching of adjacent prints; \
         exchange-level counterparty data is not available, so findings are indicative \
         rather than definitive."
            .to_string(),
    );
    lines.push(
        "- Pump/dump signals require windowed trend and reversal under elevated volume; \
         thresholds are conservative to minimize false positives."
            .to_string(),
    );
    lines.push(
        "- Orderbook parsing focuses on the top levels per side; deeper-book dynamics and \
         cancellations are not directly observable from snapshots."
            .to_string(),
    );
    lines.push(String::new());

    lines.join("\n")
}

/// Writes the Markdown report and JSON summary under `out_dir`.
///
/// Returns the paths of the written artifacts, for the caller to record on
/// the summary.
///
/// # Errors
///
/// Returns an error when the directory or either file cannot be written.
pub fn write_artifacts(summary: &AnalysisSummary, out_dir: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let report_path = out_dir.join(REPORT_FILE);
    let summary_path = out_dir.join(SUMMARY_FILE);
    let artifacts = vec![
        report_path.display().to_string(),
        summary_path.display().to_string(),
    ];

    let scalars = build_scalars(summary, &artifacts);
    fs::write(&summary_path, serde_json::to_string_pretty(&scalars)?)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;
    fs::write(&report_path, render_report(summary))
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    info!(
        report = %report_path.display(),
        summary = %summary_path.display(),
        "artifacts written"
    );

    Ok(artifacts)
}
