/// Calculate Simple Moving Average (SMA) over the last `period` prices
pub fn calculate_sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let sum: f64 = prices.iter().rev().take(period).sum();
    Some(sum / period as f64)
}

/// Calculate the latest Exponential Moving Average (EMA)
pub fn calculate_ema(prices: &[f64], period: usize) -> Option<f64> {
    ema_series(prices, period).into_iter().last().flatten()
}

/// EMA aligned with `prices`.
///
/// Seeded with the SMA of the first `period` prices, so the first value lands
/// at index `period - 1` and everything before it is `None`.
pub fn ema_series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut series = vec![None; prices.len()];
    if period == 0 || prices.len() < period {
        return series;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    let Some(mut ema) = calculate_sma(&prices[..period], period) else {
        return series;
    };
    series[period - 1] = Some(ema);

    for (i, price) in prices.iter().enumerate().skip(period) {
        ema = (price - ema) * multiplier + ema;
        series[i] = Some(ema);
    }

    series
}
