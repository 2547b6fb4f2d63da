/// Universe scan: pick the trading mode, score every symbol for it, keep the
/// top N and turn them into sized trade plans.
///
/// Candles are supplied by the caller; nothing here fetches data.

use crate::config::AppConfig;
use crate::data::SymbolCandles;
use crate::indicators::{annotate, annotate_index};
use crate::models::{CandleInterval, IndexSeries, IndicatorRow, TradePlan, TradingMode};
use crate::risk::build_trade_plan;
use crate::selector::{
    choose_mode_at, pick_intraday_interval, rank, score_intraday, score_swing, ModeSelector,
    ModeTally,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// How the scan's mode was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSource {
    /// Index trends voted
    IndexVote,
    /// No usable index data: session clock
    SessionClock,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredSymbol {
    pub symbol: String,
    pub score: f64,
    pub interval: CandleInterval,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub mode: TradingMode,
    pub mode_source: ModeSource,
    pub tally: ModeTally,
    pub ranked: Vec<ScoredSymbol>,
    pub plans: Vec<TradePlan>,
    pub timestamp: DateTime<Utc>,
}

pub struct Scanner {
    config: AppConfig,
    selector: ModeSelector,
}

impl Scanner {
    pub fn new(config: AppConfig) -> Self {
        let selector = ModeSelector::new(config.mode);
        Self { config, selector }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Annotated 15-minute series for every index symbol with enough history
    pub fn index_series(&self, universe: &[SymbolCandles]) -> Vec<IndexSeries> {
        let settings = self.config.strategy.indicator_settings();

        universe
            .iter()
            .filter(|s| s.is_index)
            .filter_map(|s| {
                let series = annotate_index(&s.symbol, &s.fifteen_minute, &settings);
                if series.is_empty() {
                    tracing::warn!(
                        "Skipping index {}: {} candles, need {}",
                        s.symbol,
                        s.fifteen_minute.len(),
                        settings.warmup()
                    );
                    None
                } else {
                    Some(series)
                }
            })
            .collect()
    }

    /// Mode from index votes, or from the session clock when no index is usable
    pub fn select_mode(
        &self,
        universe: &[SymbolCandles],
        now: DateTime<Utc>,
    ) -> (TradingMode, ModeSource, ModeTally) {
        let series = self.index_series(universe);
        if series.is_empty() {
            let mode = choose_mode_at(&now);
            tracing::info!("No index data, session clock picks {}", mode);
            return (mode, ModeSource::SessionClock, ModeTally::default());
        }

        let tally = self.selector.tally(&series);
        let mode = tally.decision();
        tracing::info!(
            "Mode dynamically selected: {} ({} intraday / {} swing / {} skipped)",
            mode,
            tally.intraday,
            tally.swing,
            tally.skipped
        );
        (mode, ModeSource::IndexVote, tally)
    }

    /// Score one symbol for `mode`; None when it has no usable candles
    pub fn score_symbol(
        &self,
        symbol: &SymbolCandles,
        mode: TradingMode,
    ) -> Option<(f64, CandleInterval, Vec<IndicatorRow>)> {
        let settings = self.config.strategy.indicator_settings();

        let (interval, rows) = match mode {
            TradingMode::Intraday => {
                let five = annotate(symbol.candles(CandleInterval::FiveMinute), &settings);
                let fifteen = annotate(symbol.candles(CandleInterval::FifteenMinute), &settings);
                let interval = pick_intraday_interval(
                    Some(five.as_slice()),
                    Some(fifteen.as_slice()),
                    self.config.scan.intraday_vol_threshold_pct,
                );
                let rows = match interval {
                    CandleInterval::FiveMinute => five,
                    _ => fifteen,
                };
                (interval, rows)
            }
            TradingMode::Swing => {
                let interval = CandleInterval::OneDay;
                (interval, annotate(symbol.candles(interval), &settings))
            }
        };

        if rows.is_empty() {
            tracing::debug!("Skipping {}: not enough {} candles", symbol.symbol, interval);
            return None;
        }

        let score = match mode {
            TradingMode::Intraday => score_intraday(&rows),
            TradingMode::Swing => score_swing(&rows),
        };
        Some((score, interval, rows))
    }

    /// Full scan at `now`
    pub fn scan(&self, universe: &[SymbolCandles], now: DateTime<Utc>) -> ScanReport {
        let (mode, mode_source, tally) = self.select_mode(universe, now);

        let scored: Vec<((String, CandleInterval, Vec<IndicatorRow>), f64)> = universe
            .iter()
            .filter_map(|s| {
                self.score_symbol(s, mode)
                    .map(|(score, interval, rows)| ((s.symbol.clone(), interval, rows), score))
            })
            .collect();

        let top = rank(scored, self.config.top_n(mode));
        tracing::info!(
            "Top symbols selected: {:?}",
            top.iter().map(|((s, _, _), _)| s.as_str()).collect::<Vec<_>>()
        );

        let mut ranked = Vec::with_capacity(top.len());
        let mut plans = Vec::with_capacity(top.len());
        for ((symbol, interval, rows), score) in top {
            if let Some(plan) = build_trade_plan(
                &symbol,
                &rows,
                interval,
                score,
                &self.config.strategy,
                &self.config.run,
                now,
            ) {
                plans.push(plan);
            }
            ranked.push(ScoredSymbol {
                symbol,
                score,
                interval,
            });
        }

        ScanReport {
            mode,
            mode_source,
            tally,
            ranked,
            plans,
            timestamp: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{IndexScenario, SyntheticDataGenerator};
    use chrono::TimeZone;

    fn symbol(name: &str, is_index: bool, scenario: IndexScenario, seed: u64) -> SymbolCandles {
        let mut gen = SyntheticDataGenerator::new(seed).with_base_price(1_000.0);
        SymbolCandles {
            symbol: name.to_string(),
            is_index,
            five_minute: gen.generate(name, scenario, 80, 5),
            fifteen_minute: gen.generate(name, scenario, 80, 15),
            one_day: gen.generate(name, scenario, 80, 1440),
        }
    }

    // 06:30 UTC = 12:00 IST, inside the session
    fn midday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 6, 30, 0).unwrap()
    }

    // 14:30 UTC = 20:00 IST, after the close
    fn evening() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_trending_indices_pick_intraday() {
        let universe = vec![
            symbol("NIFTY", true, IndexScenario::TrendingUp, 1),
            symbol("BANKNIFTY", true, IndexScenario::TrendingDown, 2),
            symbol("INFY", false, IndexScenario::TrendingUp, 3),
        ];

        let scanner = Scanner::new(AppConfig::default());
        let (mode, source, tally) = scanner.select_mode(&universe, evening());

        assert_eq!(source, ModeSource::IndexVote);
        assert_eq!(tally.intraday, 2);
        assert_eq!(mode, TradingMode::Intraday);
    }

    #[test]
    fn test_quiet_indices_pick_swing() {
        let universe = vec![
            symbol("NIFTY", true, IndexScenario::Quiet, 1),
            symbol("BANKNIFTY", true, IndexScenario::Quiet, 2),
        ];

        let scanner = Scanner::new(AppConfig::default());
        let (mode, source, _) = scanner.select_mode(&universe, midday());

        assert_eq!(source, ModeSource::IndexVote);
        assert_eq!(mode, TradingMode::Swing);
    }

    #[test]
    fn test_no_index_falls_back_to_clock() {
        let universe = vec![symbol("INFY", false, IndexScenario::TrendingUp, 3)];
        let scanner = Scanner::new(AppConfig::default());

        let (mode, source, tally) = scanner.select_mode(&universe, midday());
        assert_eq!(source, ModeSource::SessionClock);
        assert_eq!(tally, ModeTally::default());
        assert_eq!(mode, TradingMode::Intraday);

        let (mode, _, _) = scanner.select_mode(&universe, evening());
        assert_eq!(mode, TradingMode::Swing);
    }

    #[test]
    fn test_short_index_history_is_skipped() {
        let mut nifty = symbol("NIFTY", true, IndexScenario::TrendingUp, 1);
        nifty.fifteen_minute.truncate(10);

        let scanner = Scanner::new(AppConfig::default());
        assert!(scanner.index_series(&[nifty]).is_empty());
    }

    #[test]
    fn test_scan_ranks_and_plans_top_n() {
        let universe = vec![
            symbol("NIFTY", true, IndexScenario::Quiet, 1),
            symbol("UP", false, IndexScenario::TrendingUp, 4),
            symbol("DOWN", false, IndexScenario::TrendingDown, 5),
            symbol("FLAT", false, IndexScenario::Sideways, 6),
            SymbolCandles {
                symbol: "EMPTY".to_string(),
                ..Default::default()
            },
        ];

        let mut config = AppConfig::default();
        config.scan.swing_top_n = 2;
        let scanner = Scanner::new(config);
        let report = scanner.scan(&universe, evening());

        assert_eq!(report.mode, TradingMode::Swing);
        assert_eq!(report.ranked.len(), 2);
        assert_eq!(report.plans.len(), 2);
        assert!(report.ranked[0].score >= report.ranked[1].score);

        let best = universe
            .iter()
            .filter_map(|s| scanner.score_symbol(s, TradingMode::Swing))
            .map(|(score, _, _)| score)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(report.ranked[0].score, best);
        assert!(report.ranked.iter().all(|r| r.interval == CandleInterval::OneDay));
        assert!(report.plans.iter().all(|p| p.stop_price < p.price && p.target_price > p.price));
        assert!(report.ranked.iter().all(|r| r.symbol != "EMPTY"));
    }

    #[test]
    fn test_scan_survives_zero_priced_symbols() {
        let mut universe: Vec<SymbolCandles> = (0..30)
            .map(|i| symbol(&format!("S{}", i), false, IndexScenario::Sideways, 100 + i))
            .collect();
        for i in 0..10 {
            let mut dead = symbol(&format!("ZERO{}", i), false, IndexScenario::Sideways, 200 + i);
            for candle in dead.one_day.iter_mut() {
                candle.open = 0.0;
                candle.high = 0.0;
                candle.low = 0.0;
                candle.close = 0.0;
            }
            universe.push(dead);
        }

        let mut config = AppConfig::default();
        config.scan.swing_top_n = 40;
        let scanner = Scanner::new(config);
        let report = scanner.scan(&universe, evening());

        assert_eq!(report.mode, TradingMode::Swing);
        assert_eq!(report.ranked.len(), 40);
        assert!(report.ranked.iter().all(|r| r.score.is_finite()));
        assert!(report.ranked[..30].iter().all(|r| r.symbol.starts_with('S')));
    }
}
