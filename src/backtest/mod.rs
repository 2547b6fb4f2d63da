// Replays saved trade plans against the candles that followed them
pub mod metrics;
pub mod runner;

pub use metrics::BacktestSummary;
pub use runner::{run_backtest, simulate_plan, PlanOutcome, PlanResult, PlanStatus};
