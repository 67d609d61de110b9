pub mod bar;
pub mod config;
pub mod config_loader;
pub mod events;
pub mod findings;
pub mod metrics;
pub mod rolling;
pub mod summary;

pub use bar::Bar;
pub use config::{
    AnalysisConfig, BarConfig, CorrelationConfig, MicroBurstConfig, OrderBookConfig,
    PumpDumpConfig, ThresholdConfig, WashTradeConfig,
};
pub use config_loader::ConfigLoader;
pub use events::{OrderBookSnapshot, PriceLevel, TradeEvent, TradeSide};
pub use findings::{MicroBurst, PumpDumpEvent, WashTradePair};
pub use metrics::OrderBookMetric;
pub use summary::{AnalysisSummary, ImbalanceCorrelation, InputStats};
