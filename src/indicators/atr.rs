/// Average True Range (ATR) indicator
///
/// Measures market volatility by calculating the average of true ranges over a period.
/// True Range is the greatest of:
/// - Current High - Current Low
/// - Abs(Current High - Previous Close)
/// - Abs(Current Low - Previous Close)
///
/// Uses Wilder's smoothing for the moving average.

use crate::models::Candle;

/// True ranges for candles[1..]; element `i` belongs to candle `i + 1`
pub(crate) fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            (cur.high - cur.low)
                .max((cur.high - prev.close).abs())
                .max((cur.low - prev.close).abs())
        })
        .collect()
}

/// Calculate the current ATR, or None if insufficient data
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    atr_series(candles, period).into_iter().last().flatten()
}

/// ATR aligned with `candles`; the first value is at index `period`
pub fn atr_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let mut series = vec![None; candles.len()];
    if period == 0 || candles.len() < period + 1 {
        return series;
    }

    let trs = true_ranges(candles);

    // First ATR is simple average of first 'period' true ranges
    let mut atr = trs[..period].iter().sum::<f64>() / period as f64;
    series[period] = Some(atr);

    for (i, tr) in trs.iter().enumerate().skip(period) {
        atr = (atr * (period as f64 - 1.0) + tr) / period as f64;
        series[i + 1] = Some(atr);
    }

    series
}
