// Risk management module
pub mod sizing;

pub use sizing::{default_sl_target, position_size, StopTarget};

use crate::config::{RunConfig, StrategyConfig};
use crate::models::{CandleInterval, Column, IndicatorRow, TradePlan};
use crate::selector::scoring::safe_last;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Build a sized trade plan from a symbol's latest annotated row.
///
/// Returns None when there is no data. A missing ATR falls back to 0.5% of
/// price (at least 0.25) so the stop is never zero-width.
pub fn build_trade_plan(
    symbol: &str,
    rows: &[IndicatorRow],
    interval: CandleInterval,
    score: f64,
    strategy: &StrategyConfig,
    run: &RunConfig,
    now: DateTime<Utc>,
) -> Option<TradePlan> {
    if rows.is_empty() {
        return None;
    }

    let price = safe_last(rows, Column::Close, 0.0, 1);
    let atr = safe_last(rows, Column::Atr, (price * 0.005).max(0.25), 1);
    let st = default_sl_target(
        price,
        atr,
        strategy.atr_mult,
        strategy.rr,
        strategy.min_stop_abs,
    );
    let qty = position_size(
        run.capital,
        price,
        run.risk_per_trade,
        st.stop_dist,
        run.reserved_ratio,
    );

    Some(TradePlan {
        id: Uuid::new_v4(),
        symbol: symbol.to_string(),
        price,
        stop_price: st.stop_price,
        target_price: st.target_price,
        stop_dist: st.stop_dist,
        rr: strategy.rr,
        qty,
        interval,
        score,
        timestamp: now,
    })
}
