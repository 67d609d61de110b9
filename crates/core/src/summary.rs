//! The pipeline's single output record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bar::Bar;
use crate::findings::{MicroBurst, PumpDumpEvent, WashTradePair};
use crate::metrics::OrderBookMetric;

/// Row count and time range of one input stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputStats {
    /// Number of rows handed to the pipeline
    pub rows: usize,
    /// Earliest timestamp, if the stream is non-empty
    pub start: Option<DateTime<Utc>>,
    /// Latest timestamp, if the stream is non-empty
    pub end: Option<DateTime<Utc>>,
}

/// Sample size and coefficient of the imbalance/forward-return study.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceCorrelation {
    /// Pearson coefficient, `None` when fewer than two defined pairs exist
    /// or either series has zero variance
    pub coefficient: Option<f64>,
    /// Number of rows where both imbalance and future return were defined
    pub sample_size: usize,
}

/// Everything one analysis run produces.
///
/// This is the only contract toward the reporting collaborator: scalar
/// statistics for the written summary plus the full derived sequences so
/// charts and tables can be rendered without recomputation. Artifact paths
/// are opaque here; the core only records that they exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Trade stream shape
    pub trades: InputStats,
    /// Order-book stream shape
    pub order_books: InputStats,

    /// Bars whose volume z-score exceeded the threshold
    pub volume_spikes: Vec<Bar>,
    /// Bars whose absolute return z-score exceeded the threshold
    pub return_outliers: Vec<Bar>,
    /// Micro-trade burst groups
    pub micro_bursts: Vec<MicroBurst>,
    /// Adjacent offsetting trade pairs
    pub wash_pairs: Vec<WashTradePair>,
    /// Flagged pump-and-dump window pairs
    pub pump_dump_events: Vec<PumpDumpEvent>,

    /// Median spread across usable snapshots
    pub spread_median: Option<f64>,
    /// Mean of the defined imbalance values
    pub imbalance_mean: Option<f64>,
    /// Number of snapshots showing a wall on either side
    pub wall_snapshot_count: usize,
    /// Imbalance vs. future-return correlation study
    pub imbalance_correlation: ImbalanceCorrelation,

    /// Full bar sequence
    pub bars: Vec<Bar>,
    /// Full order-book metric sequence
    pub order_book_metrics: Vec<OrderBookMetric>,

    /// Paths of rendered artifacts, recorded by the reporting collaborator
    pub artifacts: Vec<String>,
}
