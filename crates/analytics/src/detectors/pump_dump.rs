//! Pump-and-dump detection.
//!
//! Couples a two-window trend-then-reversal shape test with a volume
//! elevation precondition. Thresholds are multiples of rolling statistics
//! anchored at the last pre-window bar, so the test self-scales to the
//! pair's volatility regime instead of using absolute cutoffs.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use market_sentry_core::bar::Bar;
use market_sentry_core::config::PumpDumpConfig;
use market_sentry_core::findings::PumpDumpEvent;
use market_sentry_core::rolling::rolling_stats;

use crate::bars::price_ratio;

/// Scans every window pair `[i, i+win)` / `[i+win, i+2win)` that fits the
/// bar sequence and flags pump-and-dump shapes.
///
/// Anchor statistics (return std, volume mean/std over a `win`-length
/// trailing window ending at `i + win - 1`) come from a single precomputed
/// rolling pass over the full sequence. A candidate is flagged when the
/// anchor return std is defined, the pre-window volume sum exceeds
/// `vol_mean + 2 * vol_std`, `r_pre > 3 * ret_std`, and
/// `r_post < -3 * ret_std`. Candidates whose window-edge prices are
/// undefined cannot form a price ratio and are skipped.
#[must_use]
pub fn detect_pump_dump(bars: &[Bar], config: &PumpDumpConfig) -> Vec<PumpDumpEvent> {
    let win = config.window;
    if win == 0 || bars.len() < 2 * win {
        return Vec::new();
    }

    let returns: Vec<Option<f64>> = bars.iter().map(|b| b.pct_return).collect();
    let volumes: Vec<Option<f64>> = bars.iter().map(|b| b.volume.to_f64()).collect();
    let return_roll = rolling_stats(&returns, win);
    let volume_roll = rolling_stats(&volumes, win);

    let mut events = Vec::new();
    for i in 0..=(bars.len() - 2 * win) {
        let anchor = i + win - 1;

        let r_pre = match (bars[i].last_price, bars[anchor].last_price) {
            (Some(first), Some(last)) => price_ratio(last, first),
            _ => None,
        };
        let r_post = match (bars[i + win].last_price, bars[i + 2 * win - 1].last_price) {
            (Some(first), Some(last)) => price_ratio(last, first),
            _ => None,
        };
        let (Some(r_pre), Some(r_post)) = (r_pre, r_post) else {
            continue;
        };

        let Some(ret_stats) = return_roll[anchor] else {
            continue;
        };

        let vol_pre: Decimal = bars[i..i + win].iter().map(|b| b.volume).sum();
        let high_vol = volume_roll[anchor].is_some_and(|stats| {
            vol_pre.to_f64().unwrap_or(0.0) > stats.mean + 2.0 * stats.std_dev
        });
        if !high_vol {
            continue;
        }

        if r_pre > 3.0 * ret_stats.std_dev && r_post < -3.0 * ret_stats.std_dev {
            let vol_post: Decimal = bars[i + win..i + 2 * win].iter().map(|b| b.volume).sum();
            events.push(PumpDumpEvent {
                start: bars[i].bucket_start,
                mid: bars[anchor].bucket_start,
                end: bars[i + 2 * win - 1].bucket_start,
                r_pre,
                r_post,
                vol_pre,
                vol_post,
            });
        }
    }

    debug!(events = events.len(), bars = bars.len(), window = win, "pump-dump scan complete");
    events
}
