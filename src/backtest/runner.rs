use crate::data::SymbolCandles;
use crate::models::{Candle, TradePlan};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How a plan played out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    TargetHit,
    StopHit,
    /// Neither level touched by the last candle checked
    Open,
    /// No candles for the plan's symbol and interval
    NoData,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanStatus::TargetHit => "Target Hit",
            PlanStatus::StopHit => "SL Hit",
            PlanStatus::Open => "Open",
            PlanStatus::NoData => "No Data",
        };
        f.write_str(s)
    }
}

/// Result of walking one plan forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanOutcome {
    pub status: PlanStatus,
    /// Per-share P&L at the exit level, 0 while open
    pub pnl: f64,
    /// Candle that closed the plan, or the last candle checked while open
    pub hit_time: Option<DateTime<Utc>>,
}

/// A plan together with its outcome, as written to the results file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    #[serde(flatten)]
    pub plan: TradePlan,
    pub status: PlanStatus,
    pub pnl: f64,
    /// `pnl * qty`
    pub pnl_value: f64,
    pub hit_time: Option<DateTime<Utc>>,
}

/// Walk the candles after the plan's timestamp until the target or stop is
/// touched.
///
/// The target is checked before the stop within a candle. Candles must be in
/// ascending time order.
pub fn simulate_plan(plan: &TradePlan, candles: &[Candle]) -> PlanOutcome {
    if candles.is_empty() {
        return PlanOutcome {
            status: PlanStatus::NoData,
            pnl: 0.0,
            hit_time: None,
        };
    }

    let mut last_seen = None;
    for candle in candles.iter().filter(|c| c.timestamp > plan.timestamp) {
        if candle.high >= plan.target_price {
            return PlanOutcome {
                status: PlanStatus::TargetHit,
                pnl: plan.target_price - plan.price,
                hit_time: Some(candle.timestamp),
            };
        }
        if candle.low <= plan.stop_price {
            return PlanOutcome {
                status: PlanStatus::StopHit,
                pnl: plan.stop_price - plan.price,
                hit_time: Some(candle.timestamp),
            };
        }
        last_seen = Some(candle.timestamp);
    }

    PlanOutcome {
        status: PlanStatus::Open,
        pnl: 0.0,
        hit_time: last_seen,
    }
}

/// Evaluate every plan against the universe's candles at the plan's interval
pub fn run_backtest(plans: &[TradePlan], universe: &[SymbolCandles]) -> Vec<PlanResult> {
    let by_symbol: HashMap<&str, &SymbolCandles> =
        universe.iter().map(|s| (s.symbol.as_str(), s)).collect();

    tracing::info!(
        "Backtesting {} plans against {} symbols",
        plans.len(),
        universe.len()
    );

    plans
        .iter()
        .map(|plan| {
            let candles = by_symbol
                .get(plan.symbol.as_str())
                .map(|s| s.candles(plan.interval))
                .unwrap_or(&[]);
            let outcome = simulate_plan(plan, candles);

            tracing::debug!(
                "{} {}: {} pnl={:.2}",
                plan.symbol,
                plan.interval,
                outcome.status,
                outcome.pnl
            );

            PlanResult {
                plan: plan.clone(),
                status: outcome.status,
                pnl: outcome.pnl,
                pnl_value: outcome.pnl * plan.qty as f64,
                hit_time: outcome.hit_time,
            }
        })
        .collect()
}
