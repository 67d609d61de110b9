//! Injected configuration for every tunable in the pipeline.
//!
//! No threshold or window is baked into detector logic; each detector takes
//! its parameters from this tree, and every field is independently
//! overridable from the config file or environment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bar aggregation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Bucket width in seconds
    pub interval_secs: u64,
    /// Trailing window length, in buckets, for rolling statistics
    pub rolling_window: usize,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            rolling_window: 30,
        }
    }
}

/// Z-score thresholds for the statistical detectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Volume z-score above which a bar counts as a volume spike
    pub volume_z: f64,
    /// Absolute return z-score above which a bar counts as a return outlier
    pub return_z: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            volume_z: 3.0,
            return_z: 3.0,
        }
    }
}

/// Micro-trade-burst detector parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroBurstConfig {
    /// Sub-bucket width in seconds
    pub window_secs: u64,
    /// Maximum trade size considered "micro"
    pub size_ceiling: Decimal,
    /// Minimum repeats at one exact price within one sub-bucket
    pub min_trades: usize,
}

impl Default for MicroBurstConfig {
    fn default() -> Self {
        Self {
            window_secs: 1,
            size_ceiling: Decimal::new(1, 2), // 0.01
            min_trades: 4,
        }
    }
}

/// Wash-trade detector parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WashTradeConfig {
    /// Maximum gap between the paired trades, in seconds (inclusive)
    pub max_gap_secs: i64,
    /// Size difference tolerance as a fraction of the larger size
    pub size_tolerance: f64,
}

impl Default for WashTradeConfig {
    fn default() -> Self {
        Self {
            max_gap_secs: 3,
            size_tolerance: 0.05,
        }
    }
}

/// Pump-and-dump detector parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpDumpConfig {
    /// Length, in bars, of each of the pre- and post-windows
    pub window: usize,
}

impl Default for PumpDumpConfig {
    fn default() -> Self {
        Self { window: 10 }
    }
}

/// Order-book metrics parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBookConfig {
    /// Number of levels nearest the best considered per side
    pub depth: usize,
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self { depth: 5 }
    }
}

/// Imbalance/forward-return correlation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Forward shift, in order-book-metric rows, for the future return
    pub horizon: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self { horizon: 5 }
    }
}

/// Full configuration tree for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub bars: BarConfig,
    pub thresholds: ThresholdConfig,
    pub micro_burst: MicroBurstConfig,
    pub wash_trade: WashTradeConfig,
    pub pump_dump: PumpDumpConfig,
    pub order_book: OrderBookConfig,
    pub correlation: CorrelationConfig,
}
