/// JSON input/output: candle universes in, trade plans out
use crate::backtest::PlanResult;
use crate::models::{Candle, CandleInterval, IndexSeries, TradePlan, TradingMode};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Candles for one symbol at every interval the scanner may use
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SymbolCandles {
    pub symbol: String,
    /// Index symbols feed mode selection
    #[serde(default)]
    pub is_index: bool,
    #[serde(default)]
    pub five_minute: Vec<Candle>,
    #[serde(default)]
    pub fifteen_minute: Vec<Candle>,
    #[serde(default)]
    pub one_day: Vec<Candle>,
}

impl SymbolCandles {
    pub fn candles(&self, interval: CandleInterval) -> &[Candle] {
        match interval {
            CandleInterval::FiveMinute => &self.five_minute,
            CandleInterval::FifteenMinute => &self.fifteen_minute,
            CandleInterval::OneDay => &self.one_day,
        }
    }

    /// Fill in missing candle symbols and sort every interval by time
    fn normalize(&mut self) {
        for candles in [
            &mut self.five_minute,
            &mut self.fifteen_minute,
            &mut self.one_day,
        ] {
            for candle in candles.iter_mut() {
                if candle.symbol.is_empty() {
                    candle.symbol = self.symbol.clone();
                }
            }
            candles.sort_by_key(|c| c.timestamp);
        }
    }
}

/// Parse a universe document: a JSON array of [`SymbolCandles`]
pub fn parse_universe(json: &str) -> Result<Vec<SymbolCandles>> {
    let mut universe: Vec<SymbolCandles> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for entry in &mut universe {
        if entry.symbol.trim().is_empty() {
            return Err(Error::InvalidInput("universe entry without a symbol".to_string()));
        }
        if !seen.insert(entry.symbol.clone()) {
            return Err(Error::InvalidInput(format!(
                "duplicate symbol '{}' in universe",
                entry.symbol
            )));
        }
        entry.normalize();
    }

    Ok(universe)
}

pub fn load_universe(path: &Path) -> Result<Vec<SymbolCandles>> {
    let json = fs::read_to_string(path)?;
    let universe = parse_universe(&json)?;
    tracing::info!("Loaded {} symbols from {}", universe.len(), path.display());
    Ok(universe)
}

/// Load already-annotated index series: a JSON array of [`IndexSeries`]
pub fn load_index_series(path: &Path) -> Result<Vec<IndexSeries>> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Write plans to `<dir>/<YYYYmmdd_HHMM>_<mode>.json` and return the path
pub fn save_trade_plans(
    dir: &Path,
    now: DateTime<Utc>,
    mode: TradingMode,
    plans: &[TradePlan],
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{}.json", now.format("%Y%m%d_%H%M"), mode));
    fs::write(&path, serde_json::to_string_pretty(plans)?)?;

    tracing::info!("Saved {} trade plans to {}", plans.len(), path.display());
    Ok(path)
}

/// Load trade plans from one plan file, or from every `.json` file in a
/// directory (in file name order)
pub fn load_trade_plans(path: &Path) -> Result<Vec<TradePlan>> {
    let files = if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map_or(false, |ext| ext == "json"))
            .collect();
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut plans = Vec::new();
    for file in &files {
        let json = fs::read_to_string(file)?;
        let mut batch: Vec<TradePlan> = serde_json::from_str(&json)?;
        plans.append(&mut batch);
    }

    tracing::info!("Loaded {} trade plans from {} file(s)", plans.len(), files.len());
    Ok(plans)
}

/// Write backtest results to `<dir>/backtest_<YYYYmmdd_HHMM>.json`
pub fn save_backtest_results(
    dir: &Path,
    now: DateTime<Utc>,
    results: &[PlanResult],
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("backtest_{}.json", now.format("%Y%m%d_%H%M")));
    fs::write(&path, serde_json::to_string_pretty(results)?)?;

    tracing::info!("Saved {} backtest results to {}", results.len(), path.display());
    Ok(path)
}
