/// Average Directional Index (ADX) - Measures trend strength
///
/// ADX ranges from 0 to 100:
/// - ADX > 25: Strong trend (bull or bear)
/// - ADX 20-25: Moderate trend
/// - ADX < 20: Weak trend / choppy / ranging market
///
/// Also yields +DI and -DI to determine trend direction:
/// - +DI > -DI: Uptrend
/// - -DI > +DI: Downtrend

use super::atr::true_ranges;
use crate::models::Candle;

/// ADX with its directional indicators for one candle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalIndex {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

/// Calculate the latest ADX, +DI, and -DI
///
/// Returns (adx, plus_di, minus_di) or None if insufficient data
pub fn calculate_adx(candles: &[Candle], period: usize) -> Option<(f64, f64, f64)> {
    directional_series(candles, period)
        .into_iter()
        .last()
        .flatten()
        .map(|d| (d.adx, d.plus_di, d.minus_di))
}

/// ADX values aligned with `candles`
pub fn adx_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    directional_series(candles, period)
        .into_iter()
        .map(|d| d.map(|d| d.adx))
        .collect()
}

/// Full directional index series aligned with `candles`.
///
/// DI values need `period` bars of movement and the ADX smooths `period` DX
/// values on top of that, so the first value lands at index `2 * period - 1`.
pub fn directional_series(candles: &[Candle], period: usize) -> Vec<Option<DirectionalIndex>> {
    let mut series = vec![None; candles.len()];
    if period == 0 || candles.len() < 2 * period {
        return series;
    }

    // Step 1: True Range and Directional Movement for candles[1..]
    let trs = true_ranges(candles);
    let (plus_dms, minus_dms): (Vec<f64>, Vec<f64>) = candles
        .windows(2)
        .map(|pair| {
            let up_move = pair[1].high - pair[0].high;
            let down_move = pair[0].low - pair[1].low;

            let plus_dm = if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            };
            let minus_dm = if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            };
            (plus_dm, minus_dm)
        })
        .unzip();

    // Step 2: Wilder-smooth TR and DM, then derive DI and DX per bar
    let smoothed_tr = wilder_series(&trs, period);
    let smoothed_plus = wilder_series(&plus_dms, period);
    let smoothed_minus = wilder_series(&minus_dms, period);

    let mut dis = Vec::with_capacity(smoothed_tr.len());
    for ((tr, plus), minus) in smoothed_tr.iter().zip(&smoothed_plus).zip(&smoothed_minus) {
        let (plus_di, minus_di) = if *tr > 0.0 {
            (plus / tr * 100.0, minus / tr * 100.0)
        } else {
            (0.0, 0.0)
        };
        let di_sum = plus_di + minus_di;
        let dx = if di_sum > 0.0 {
            (plus_di - minus_di).abs() / di_sum * 100.0
        } else {
            0.0
        };
        dis.push((plus_di, minus_di, dx));
    }

    // Step 3: ADX is the Wilder-smoothed DX
    let dxs: Vec<f64> = dis.iter().map(|&(_, _, dx)| dx).collect();
    let adxs = wilder_series(&dxs, period);

    // dis[j] belongs to candle period + j; adxs[k] to dis[period - 1 + k]
    for (k, adx) in adxs.into_iter().enumerate() {
        let j = period - 1 + k;
        let (plus_di, minus_di, _) = dis[j];
        series[period + j] = Some(DirectionalIndex {
            adx,
            plus_di,
            minus_di,
        });
    }

    series
}

/// Wilder's smoothing: seed with the mean of the first `period` values, then
/// `s = (s * (period - 1) + v) / period`. Element 0 covers values[..period].
fn wilder_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let mut smoothed = values[..period].iter().sum::<f64>() / period as f64;
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(smoothed);

    for value in &values[period..] {
        smoothed = (smoothed * (period as f64 - 1.0) + value) / period as f64;
        out.push(smoothed);
    }

    out
}
