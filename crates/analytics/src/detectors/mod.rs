//! Heuristic and statistical detectors.
//!
//! Every detector is a pure function over the shared bar/trade sequences:
//! deterministic given its inputs and thresholds, with no state carried
//! between calls and no way for one detector's outcome to affect another.

pub mod micro_burst;
pub mod pump_dump;
pub mod statistical;
pub mod wash_trade;

pub use micro_burst::detect_micro_bursts;
pub use pump_dump::detect_pump_dump;
pub use statistical::{return_outliers, volume_spikes};
pub use wash_trade::detect_wash_pairs;
