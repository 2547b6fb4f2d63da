/// Per-symbol scoring for intraday and swing candidates
///
/// Scores are plain weighted sums of the latest indicator values. Missing
/// values fall back to 0 (1 for close, so percentages stay defined), which
/// keeps partially annotated symbols rankable instead of dropping them.

use crate::models::{CandleInterval, Column, IndicatorRow};

/// Score given to symbols with no data, or whose inputs yield a non-finite score
pub const UNSCORABLE: f64 = -1e9;

fn finite_or_unscorable(score: f64) -> f64 {
    if score.is_finite() {
        score
    } else {
        UNSCORABLE
    }
}

/// Volume average window for the intraday liquidity term
const VOLUME_WINDOW: usize = 20;

/// nth-from-last value of `column`, or `default` when the row or value is missing
pub fn safe_last(rows: &[IndicatorRow], column: Column, default: f64, n: usize) -> f64 {
    if n == 0 || rows.len() < n {
        return default;
    }
    rows[rows.len() - n].get(column).unwrap_or(default)
}

fn last(rows: &[IndicatorRow], column: Column) -> f64 {
    safe_last(rows, column, 0.0, 1)
}

fn last_close(rows: &[IndicatorRow]) -> f64 {
    safe_last(rows, Column::Close, 1.0, 1)
}

/// ATR as a percentage of the latest close
pub fn atr_pct(rows: &[IndicatorRow]) -> f64 {
    last(rows, Column::Atr) / last_close(rows) * 100.0
}

/// Intraday score: volatility (ATR%), trend strength, momentum, liquidity
pub fn score_intraday(rows: &[IndicatorRow]) -> f64 {
    if rows.is_empty() {
        return UNSCORABLE;
    }

    let atrp = atr_pct(rows);
    let adx = last(rows, Column::Adx);
    let momentum =
        (last(rows, Column::EmaFast) - last(rows, Column::EmaSlow)) / last_close(rows) * 100.0;

    let avg_volume = if rows.len() >= VOLUME_WINDOW {
        rows[rows.len() - VOLUME_WINDOW..]
            .iter()
            .map(|r| r.volume.unwrap_or(0.0))
            .sum::<f64>()
            / VOLUME_WINDOW as f64
    } else {
        0.0
    };

    finite_or_unscorable(0.45 * atrp + 0.35 * adx + 0.15 * momentum + 0.05 * (avg_volume / 1e5))
}

/// Swing score: trend strength, 10-period EMA slope, fast/slow EMA gap
pub fn score_swing(rows: &[IndicatorRow]) -> f64 {
    if rows.is_empty() {
        return UNSCORABLE;
    }

    let adx = last(rows, Column::Adx);
    let slope = (last(rows, Column::EmaFast) / safe_last(rows, Column::EmaFast, 1.0, 10) - 1.0)
        * 100.0;
    let trend_gap =
        (last(rows, Column::EmaFast) - last(rows, Column::EmaSlow)) / last_close(rows) * 100.0;

    finite_or_unscorable(0.5 * adx + 0.3 * slope + 0.2 * trend_gap)
}

/// Pick the intraday candle interval for a symbol.
///
/// Falls back to 15m when 5m data is missing and to 5m when only 15m is
/// empty; otherwise 5m wins when its ATR% reaches `vol_threshold_pct`.
pub fn pick_intraday_interval(
    five_minute: Option<&[IndicatorRow]>,
    fifteen_minute: Option<&[IndicatorRow]>,
    vol_threshold_pct: f64,
) -> CandleInterval {
    let (Some(five), Some(fifteen)) = (five_minute, fifteen_minute) else {
        return CandleInterval::FifteenMinute;
    };
    if five.is_empty() {
        return CandleInterval::FifteenMinute;
    }
    if fifteen.is_empty() {
        return CandleInterval::FiveMinute;
    }

    if atr_pct(five) >= vol_threshold_pct {
        CandleInterval::FiveMinute
    } else {
        CandleInterval::FifteenMinute
    }
}

/// Sort candidates by score (best first, stable for equal scores) and keep `top_n`.
///
/// NaN scores sort last.
pub fn rank<T>(mut candidates: Vec<(T, f64)>, top_n: usize) -> Vec<(T, f64)> {
    let key = |score: f64| if score.is_nan() { f64::NEG_INFINITY } else { score };
    candidates.sort_by(|a, b| key(b.1).total_cmp(&key(a.1)));
    candidates.truncate(top_n);
    candidates
}
