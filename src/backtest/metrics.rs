use super::runner::{PlanResult, PlanStatus};
use serde::{Deserialize, Serialize};

/// Aggregate outcome of a plan backtest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub total_plans: usize,
    pub target_hits: usize,
    pub stop_hits: usize,
    pub open: usize,
    pub no_data: usize,
    /// Target hits as a percentage of closed plans
    pub win_rate: f64,
    /// Sum of `pnl_value` over closed plans
    pub total_pnl: f64,
}

impl BacktestSummary {
    pub fn from_results(results: &[PlanResult]) -> Self {
        let mut summary = Self {
            total_plans: results.len(),
            ..Default::default()
        };

        for result in results {
            match result.status {
                PlanStatus::TargetHit => summary.target_hits += 1,
                PlanStatus::StopHit => summary.stop_hits += 1,
                PlanStatus::Open => summary.open += 1,
                PlanStatus::NoData => summary.no_data += 1,
            }
            summary.total_pnl += result.pnl_value;
        }

        let closed = summary.target_hits + summary.stop_hits;
        if closed > 0 {
            summary.win_rate = summary.target_hits as f64 / closed as f64 * 100.0;
        }

        summary
    }

    pub fn print_report(&self) {
        println!("\n📊 Plan Backtest");
        println!("   Plans:       {}", self.total_plans);
        println!("   Target hit:  {}", self.target_hits);
        println!("   SL hit:      {}", self.stop_hits);
        println!("   Open:        {}", self.open);
        println!("   No data:     {}", self.no_data);
        println!("   Win rate:    {:.1}%", self.win_rate);
        println!("   Total P&L:   ₹{:.2}", self.total_pnl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandleInterval, TradePlan};
    use chrono::Utc;
    use uuid::Uuid;

    fn result(status: PlanStatus, pnl: f64, qty: u64) -> PlanResult {
        PlanResult {
            plan: TradePlan {
                id: Uuid::new_v4(),
                symbol: "A".to_string(),
                price: 100.0,
                stop_price: 96.0,
                target_price: 108.0,
                stop_dist: 4.0,
                rr: 2.0,
                qty,
                interval: CandleInterval::OneDay,
                score: 0.0,
                timestamp: Utc::now(),
            },
            status,
            pnl,
            pnl_value: pnl * qty as f64,
            hit_time: None,
        }
    }

    #[test]
    fn test_summary_counts_and_win_rate() {
        let results = vec![
            result(PlanStatus::TargetHit, 8.0, 10),
            result(PlanStatus::TargetHit, 8.0, 5),
            result(PlanStatus::StopHit, -4.0, 10),
            result(PlanStatus::Open, 0.0, 10),
            result(PlanStatus::NoData, 0.0, 10),
        ];
        let summary = BacktestSummary::from_results(&results);

        assert_eq!(summary.total_plans, 5);
        assert_eq!(summary.target_hits, 2);
        assert_eq!(summary.stop_hits, 1);
        assert_eq!(summary.open, 1);
        assert_eq!(summary.no_data, 1);
        assert!((summary.win_rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.total_pnl, 80.0 + 40.0 - 40.0);
    }

    #[test]
    fn test_summary_without_closed_plans() {
        let summary = BacktestSummary::from_results(&[result(PlanStatus::Open, 0.0, 1)]);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.total_pnl, 0.0);
        assert_eq!(BacktestSummary::from_results(&[]), BacktestSummary::default());
    }
}
