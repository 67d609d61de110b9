pub mod bars;
pub mod correlation;
pub mod detectors;
pub mod orderbook;
pub mod pipeline;

pub use bars::aggregate_trades;
pub use correlation::imbalance_future_return_correlation;
pub use detectors::{
    detect_micro_bursts, detect_pump_dump, detect_wash_pairs, return_outliers, volume_spikes,
};
pub use orderbook::compute_metrics;
pub use pipeline::run_analysis;
