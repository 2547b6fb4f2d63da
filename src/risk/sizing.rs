/// Stop/target placement and position sizing for long entries

/// Stop and target around an entry price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopTarget {
    pub stop_price: f64,
    pub target_price: f64,
    pub stop_dist: f64,
}

/// ATR-based stop with a reward:risk target.
///
/// `stop_dist = max(atr * atr_mult, min_stop_abs)`. Prices are for a long;
/// a short mirrors them around `price`.
pub fn default_sl_target(
    price: f64,
    atr: f64,
    atr_mult: f64,
    rr: f64,
    min_stop_abs: f64,
) -> StopTarget {
    let stop_dist = (atr * atr_mult).max(min_stop_abs);
    StopTarget {
        stop_price: price - stop_dist,
        target_price: price + stop_dist * rr,
        stop_dist,
    }
}

/// Quantity such that hitting the stop loses at most `risk_per_trade` of
/// total capital, capped so exposure stays within the active capital
/// (`capital * (1 - reserved_ratio)`).
pub fn position_size(
    total_capital: f64,
    price: f64,
    risk_per_trade: f64,
    stop_dist: f64,
    reserved_ratio: f64,
) -> u64 {
    let stop_dist = if stop_dist <= 0.0 {
        (price * 0.01).max(0.5)
    } else {
        stop_dist
    };

    let active_capital = total_capital * (1.0 - reserved_ratio);
    let risk_amount = total_capital * risk_per_trade;

    let qty_by_risk = (risk_amount / stop_dist).floor();
    let qty_by_capital = if price > 0.0 {
        (active_capital / price).floor()
    } else {
        0.0
    };

    // `as` saturates negatives and NaN to 0
    qty_by_risk.min(qty_by_capital).max(0.0) as u64
}
