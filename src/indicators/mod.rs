// Technical indicators module
// Implements EMA, ADX, ATR and the step that attaches them to candles

pub mod adx;
pub mod atr;
pub mod moving_average;

pub use adx::{adx_series, calculate_adx, directional_series, DirectionalIndex};
pub use atr::{atr_series, calculate_atr};
pub use moving_average::{calculate_ema, calculate_sma, ema_series};

use crate::models::{Candle, IndexSeries, IndicatorRow};
use serde::{Deserialize, Serialize};

/// Indicator windows used when annotating candles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    pub fast: usize,
    pub slow: usize,
    pub atr_period: usize,
    pub adx_period: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            atr_period: 14,
            adx_period: 14,
        }
    }
}

impl IndicatorSettings {
    /// Candles needed before the first fully annotated row appears
    pub fn warmup(&self) -> usize {
        self.fast
            .max(self.slow)
            .max(self.atr_period + 1)
            .max(2 * self.adx_period)
    }
}

/// Attach EMA fast/slow, ADX and ATR to each candle.
///
/// Warm-up rows that lack any indicator are dropped, so every returned row is
/// fully populated. Candles must be in ascending time order.
pub fn annotate(candles: &[Candle], settings: &IndicatorSettings) -> Vec<IndicatorRow> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let ema_fast = ema_series(&closes, settings.fast);
    let ema_slow = ema_series(&closes, settings.slow);
    let adx = adx_series(candles, settings.adx_period);
    let atr = atr_series(candles, settings.atr_period);

    candles
        .iter()
        .enumerate()
        .filter_map(|(i, candle)| {
            Some(IndicatorRow {
                timestamp: Some(candle.timestamp),
                close: Some(candle.close),
                volume: Some(candle.volume),
                ema_fast: Some(ema_fast[i]?),
                ema_slow: Some(ema_slow[i]?),
                adx: Some(adx[i]?),
                atr: Some(atr[i]?),
            })
        })
        .collect()
}

/// Annotate one index's candles into an [`IndexSeries`]
pub fn annotate_index(
    name: impl Into<String>,
    candles: &[Candle],
    settings: &IndicatorSettings,
) -> IndexSeries {
    IndexSeries::new(name, annotate(candles, settings))
}
