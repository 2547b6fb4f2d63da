/// Intraday-vs-swing mode selection from index trends
///
/// Every index series casts one vote:
/// - Intraday: fast EMA moved more than the slope threshold over the last
///   10 periods AND ADX > 15 (a market that is both moving and trending)
/// - Swing: anything else
///
/// The majority wins, and ties go to swing.

use crate::models::{Column, IndexSeries, ModeDecision, ModeVote, TradingMode};
use serde::{Deserialize, Serialize};

/// Periods back from the last row used as the slope reference
pub const SLOPE_LOOKBACK: usize = 10;

/// ADX a series must exceed before it can vote intraday
pub const MIN_ADX_FOR_INTRADAY: f64 = 15.0;

/// Tuning parameters for [`ModeSelector`].
///
/// `short_window`, `long_window` and `adx_window` describe how the caller
/// built the indicator columns. They are carried through untouched: the
/// slope always uses [`SLOPE_LOOKBACK`] and the ADX is read from the
/// precomputed column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeSelectorConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub adx_window: usize,
    /// Percent units: 0.05 means a 0.05% move, not 5%
    pub slope_threshold_pct: f64,
}

impl Default for ModeSelectorConfig {
    fn default() -> Self {
        Self {
            short_window: 12,
            long_window: 26,
            adx_window: 14,
            slope_threshold_pct: 0.05,
        }
    }
}

/// Vote counts behind a decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTally {
    pub intraday: usize,
    pub swing: usize,
    /// Series that were empty, missing a column, or had a non-finite slope
    pub skipped: usize,
}

impl ModeTally {
    pub fn decision(&self) -> ModeDecision {
        if self.intraday > self.swing {
            TradingMode::Intraday
        } else {
            TradingMode::Swing
        }
    }

    fn record(&mut self, vote: Option<ModeVote>) {
        match vote {
            Some(TradingMode::Intraday) => self.intraday += 1,
            Some(TradingMode::Swing) => self.swing += 1,
            None => self.skipped += 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModeSelector {
    config: ModeSelectorConfig,
}

impl ModeSelector {
    pub fn new(config: ModeSelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModeSelectorConfig {
        &self.config
    }

    /// Decide the trading mode for a set of index series
    pub fn select(&self, series: &[IndexSeries]) -> ModeDecision {
        self.tally(series).decision()
    }

    /// Count votes across all series, in input order
    pub fn tally(&self, series: &[IndexSeries]) -> ModeTally {
        let mut tally = ModeTally::default();
        for s in series {
            tally.record(self.vote(s));
        }

        tracing::debug!(
            "Mode tally: intraday={} swing={} skipped={} -> {}",
            tally.intraday,
            tally.swing,
            tally.skipped,
            tally.decision()
        );
        tally
    }

    /// Vote of a single series, or None when it cannot vote
    pub fn vote(&self, series: &IndexSeries) -> Option<ModeVote> {
        if series.is_empty()
            || !series.has_column(Column::EmaFast)
            || !series.has_column(Column::EmaSlow)
            || !series.has_column(Column::Adx)
        {
            tracing::debug!("Skipping {}: empty or missing indicator columns", series.name);
            return None;
        }

        let len = series.len();
        let k = len.min(SLOPE_LOOKBACK);

        let (Some(last_ema), Some(reference_ema), Some(adx)) = (
            series.last_value(Column::EmaFast),
            series.value_at(len - k, Column::EmaFast),
            series.last_value(Column::Adx),
        ) else {
            tracing::debug!("Skipping {}: required value missing on a read row", series.name);
            return None;
        };

        let slope = (last_ema / reference_ema - 1.0) * 100.0;
        if !slope.is_finite() || !adx.is_finite() {
            tracing::warn!(
                "Skipping {}: non-finite slope/ADX (ema_fast {} -> {}, adx {})",
                series.name,
                reference_ema,
                last_ema,
                adx
            );
            return None;
        }

        let vote = if slope.abs() > self.config.slope_threshold_pct && adx > MIN_ADX_FOR_INTRADAY {
            TradingMode::Intraday
        } else {
            TradingMode::Swing
        };

        tracing::debug!(
            "{}: slope={:.4}% adx={:.2} -> {}",
            series.name,
            slope,
            adx,
            vote
        );
        Some(vote)
    }
}

/// Decide the trading mode with an explicit config
pub fn choose_mode(series: &[IndexSeries], config: &ModeSelectorConfig) -> ModeDecision {
    ModeSelector::new(*config).select(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndicatorRow;

    fn series_from(name: &str, ema_fast: &[f64], adx: f64) -> IndexSeries {
        let rows = ema_fast
            .iter()
            .map(|&ema| IndicatorRow {
                ema_fast: Some(ema),
                ema_slow: Some(ema * 0.99),
                adx: Some(adx),
                ..Default::default()
            })
            .collect();
        IndexSeries::new(name, rows)
    }

    /// 10-row series whose ema_fast goes 100 -> 106 over the last 10 rows
    fn rising(name: &str, adx: f64) -> IndexSeries {
        let ema: Vec<f64> = (0..10).map(|i| 100.0 + 6.0 * i as f64 / 9.0).collect();
        series_from(name, &ema, adx)
    }

    fn flat(name: &str, adx: f64) -> IndexSeries {
        series_from(name, &[100.0; 12], adx)
    }

    #[test]
    fn test_empty_collection_is_swing() {
        let selector = ModeSelector::default();
        assert_eq!(selector.select(&[]), TradingMode::Swing);
        assert_eq!(selector.tally(&[]), ModeTally::default());
    }

    #[test]
    fn test_all_series_invalid_is_swing() {
        let selector = ModeSelector::default();
        let missing_adx = IndexSeries::new(
            "NO_ADX",
            vec![IndicatorRow {
                ema_fast: Some(100.0),
                ema_slow: Some(99.0),
                ..Default::default()
            }],
        );
        let series = vec![IndexSeries::new("EMPTY", Vec::new()), missing_adx];

        let tally = selector.tally(&series);
        assert_eq!(tally.skipped, 2);
        assert_eq!(tally.decision(), TradingMode::Swing);
    }

    #[test]
    fn test_rising_trend_votes_intraday() {
        let selector = ModeSelector::default();
        let series = rising("NIFTY", 20.0);

        // slope = (106 / 100 - 1) * 100 = 6%, far above 0.05
        assert_eq!(selector.vote(&series), Some(TradingMode::Intraday));
        assert_eq!(selector.select(&[series]), TradingMode::Intraday);
    }

    #[test]
    fn test_weak_adx_votes_swing() {
        let selector = ModeSelector::default();
        assert_eq!(selector.vote(&rising("NIFTY", 15.0)), Some(TradingMode::Swing));
    }

    #[test]
    fn test_flat_ema_votes_swing() {
        let selector = ModeSelector::default();
        assert_eq!(selector.vote(&flat("NIFTY", 40.0)), Some(TradingMode::Swing));
    }

    #[test]
    fn test_threshold_is_percent_units() {
        // 0.06% move: above 0.05 threshold
        let series = series_from("NIFTY", &[100.0, 100.06], 20.0);
        assert_eq!(ModeSelector::default().vote(&series), Some(TradingMode::Intraday));

        // 0.04% move: below it
        let series = series_from("NIFTY", &[100.0, 100.04], 20.0);
        assert_eq!(ModeSelector::default().vote(&series), Some(TradingMode::Swing));
    }

    #[test]
    fn test_falling_trend_counts_by_magnitude() {
        let ema: Vec<f64> = (0..10).map(|i| 106.0 - 6.0 * i as f64 / 9.0).collect();
        let series = series_from("NIFTY", &ema, 25.0);
        assert_eq!(ModeSelector::default().vote(&series), Some(TradingMode::Intraday));
    }

    #[test]
    fn test_majority_and_tie_favor_swing() {
        let selector = ModeSelector::default();

        let two_swing_one_intraday = vec![
            flat("A", 30.0),
            rising("B", 20.0),
            flat("C", 30.0),
        ];
        assert_eq!(selector.select(&two_swing_one_intraday), TradingMode::Swing);

        let tie = vec![rising("A", 20.0), flat("B", 30.0)];
        let tally = selector.tally(&tie);
        assert_eq!((tally.intraday, tally.swing), (1, 1));
        assert_eq!(tally.decision(), TradingMode::Swing);

        let majority = vec![rising("A", 20.0), rising("B", 22.0), flat("C", 30.0)];
        assert_eq!(selector.select(&majority), TradingMode::Intraday);
    }

    #[test]
    fn test_short_series_uses_first_row() {
        // Only the first row differs: a 10-period lookback would never see it
        let series = series_from("SHORT", &[90.0, 100.0, 100.0, 100.0, 100.0], 20.0);
        assert_eq!(ModeSelector::default().vote(&series), Some(TradingMode::Intraday));
    }

    #[test]
    fn test_lookback_is_ten_rows() {
        // Row 0 differs but sits 11 rows back; reference is row 1 (flat)
        let mut ema = vec![90.0];
        ema.extend([100.0; 10]);
        let series = series_from("LONG", &ema, 20.0);
        assert_eq!(series.len(), 11);
        assert_eq!(ModeSelector::default().vote(&series), Some(TradingMode::Swing));
    }

    #[test]
    fn test_single_row_series_votes_swing() {
        // Reference is the last row itself: slope is exactly zero
        let series = series_from("ONE", &[100.0], 50.0);
        assert_eq!(ModeSelector::default().vote(&series), Some(TradingMode::Swing));
    }

    #[test]
    fn test_zero_reference_ema_casts_no_vote() {
        let series = series_from("ZERO", &[0.0, 1.0, 2.0], 30.0);
        let selector = ModeSelector::default();

        assert_eq!(selector.vote(&series), None);
        let tally = selector.tally(&[series, rising("OK", 20.0)]);
        assert_eq!(tally, ModeTally { intraday: 1, swing: 0, skipped: 1 });
        assert_eq!(tally.decision(), TradingMode::Intraday);
    }

    #[test]
    fn test_nan_adx_casts_no_vote() {
        let series = rising("NAN", f64::NAN);
        assert_eq!(ModeSelector::default().vote(&series), None);
    }

    #[test]
    fn test_missing_value_on_read_row_skips() {
        let mut series = rising("GAP", 20.0);
        series.rows[9].adx = None;
        assert_eq!(ModeSelector::default().vote(&series), None);
    }

    #[test]
    fn test_missing_ema_column_skips_trending_series() {
        let selector = ModeSelector::default();
        let trending = rising("NIFTY", 40.0);
        assert_eq!(selector.vote(&trending), Some(TradingMode::Intraday));

        let mut no_fast = trending.clone();
        no_fast.name = "NO_FAST".to_string();
        no_fast.rows.iter_mut().for_each(|r| r.ema_fast = None);

        let mut no_slow = trending.clone();
        no_slow.name = "NO_SLOW".to_string();
        no_slow.rows.iter_mut().for_each(|r| r.ema_slow = None);

        assert_eq!(selector.vote(&no_fast), None);
        assert_eq!(selector.vote(&no_slow), None);

        let tally = selector.tally(&[no_fast, no_slow]);
        assert_eq!(tally.skipped, 2);
        assert_eq!(tally.intraday, 0);
        assert_eq!(tally.decision(), TradingMode::Swing);
    }

    #[test]
    fn test_window_parameters_do_not_change_votes() {
        let series = vec![rising("A", 20.0), flat("B", 30.0), rising("C", 18.0)];
        let tuned = ModeSelectorConfig {
            short_window: 3,
            long_window: 200,
            adx_window: 50,
            ..Default::default()
        };

        assert_eq!(
            choose_mode(&series, &tuned),
            choose_mode(&series, &ModeSelectorConfig::default())
        );
    }

    #[test]
    fn test_selection_is_idempotent() {
        let selector = ModeSelector::default();
        let series = vec![rising("A", 20.0), flat("B", 30.0), rising("C", 25.0)];

        let first = selector.tally(&series);
        let second = selector.tally(&series);
        assert_eq!(first, second);
        assert_eq!(selector.select(&series), selector.select(&series));
    }
}
