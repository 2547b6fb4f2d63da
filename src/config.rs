use crate::indicators::IndicatorSettings;
use crate::models::TradingMode;
use crate::selector::ModeSelectorConfig;
use crate::{Error, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config locations, first existing one wins
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["config/secrets.toml", "config/settings.toml"];

/// Environment prefix: MODESELECT__RUN__CAPITAL=250000
pub const ENV_PREFIX: &str = "MODESELECT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: ModeSelectorConfig,
    pub strategy: StrategyConfig,
    pub scan: ScanConfig,
    pub run: RunConfig,
}

/// Indicator windows and stop/target shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub fast: usize,
    pub slow: usize,
    pub atr_period: usize,
    pub adx_period: usize,
    pub atr_mult: f64,
    pub rr: f64,
    pub min_stop_abs: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            atr_period: 14,
            adx_period: 14,
            atr_mult: 2.0,
            rr: 2.0,
            min_stop_abs: 0.5,
        }
    }
}

impl StrategyConfig {
    pub fn indicator_settings(&self) -> IndicatorSettings {
        IndicatorSettings {
            fast: self.fast,
            slow: self.slow,
            atr_period: self.atr_period,
            adx_period: self.adx_period,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub intraday_top_n: usize,
    pub swing_top_n: usize,
    /// 5m ATR% at or above this picks the 5m interval for intraday
    pub intraday_vol_threshold_pct: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            intraday_top_n: 5,
            swing_top_n: 5,
            intraday_vol_threshold_pct: 0.35,
        }
    }
}

/// Capital and risk budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub capital: f64,
    pub risk_per_trade: f64,
    /// Share of capital never deployed
    pub reserved_ratio: f64,
    pub trade_plan_dir: String,
    /// Where backtest results of saved plans are written
    pub paper_trade_dir: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            capital: 100_000.0,
            risk_per_trade: 0.01,
            reserved_ratio: 0.20,
            trade_plan_dir: "data/trade_plans".to_string(),
            paper_trade_dir: "data/paper_trades".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from an explicit TOML file (or the first default path that
    /// exists), then apply `MODESELECT__*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                builder = builder.add_source(File::from(p).required(true));
            }
            None => {
                if let Some(found) = DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
                    tracing::debug!("Using config file {}", found);
                    builder = builder.add_source(File::with_name(found).required(false));
                }
            }
        }

        let cfg: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML document directly (no environment overrides)
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let cfg: AppConfig = Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.strategy;
        if s.fast == 0 || s.slow == 0 || s.atr_period == 0 || s.adx_period == 0 {
            return Err(Error::InvalidInput(
                "indicator windows must be greater than zero".to_string(),
            ));
        }
        if s.fast >= s.slow {
            return Err(Error::InvalidInput(format!(
                "fast EMA window ({}) must be shorter than slow ({})",
                s.fast, s.slow
            )));
        }
        if !(self.mode.slope_threshold_pct >= 0.0) {
            return Err(Error::InvalidInput(
                "mode.slope_threshold_pct must be non-negative".to_string(),
            ));
        }

        let r = &self.run;
        if !(r.capital > 0.0) {
            return Err(Error::InvalidInput("run.capital must be positive".to_string()));
        }
        if !(0.0..1.0).contains(&r.risk_per_trade) {
            return Err(Error::InvalidInput(format!(
                "run.risk_per_trade {} must be within [0, 1)",
                r.risk_per_trade
            )));
        }
        if !(0.0..1.0).contains(&r.reserved_ratio) {
            return Err(Error::InvalidInput(format!(
                "run.reserved_ratio {} must be within [0, 1)",
                r.reserved_ratio
            )));
        }

        Ok(())
    }

    /// Top-N size for a mode
    pub fn top_n(&self, mode: TradingMode) -> usize {
        match mode {
            TradingMode::Intraday => self.scan.intraday_top_n,
            TradingMode::Swing => self.scan.swing_top_n,
        }
    }
}
