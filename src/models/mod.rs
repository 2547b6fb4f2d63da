use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// OHLCV candlestick for one symbol and one period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    #[serde(default)]
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// One period of market data annotated with indicators.
///
/// Every field is optional: callers may hand over partially annotated data
/// and the consumers decide what a missing value means.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndicatorRow {
    pub timestamp: Option<DateTime<Utc>>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub adx: Option<f64>,
    pub atr: Option<f64>,
}

/// Indicator columns a row may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Close,
    Volume,
    EmaFast,
    EmaSlow,
    Adx,
    Atr,
}

impl IndicatorRow {
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Close => self.close,
            Column::Volume => self.volume,
            Column::EmaFast => self.ema_fast,
            Column::EmaSlow => self.ema_slow,
            Column::Adx => self.adx,
            Column::Atr => self.atr,
        }
    }
}

/// Time-ordered (ascending) observations for one index
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndexSeries {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<IndicatorRow>,
}

impl IndexSeries {
    pub fn new(name: impl Into<String>, rows: Vec<IndicatorRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A column is present when at least one row carries a value for it
    pub fn has_column(&self, column: Column) -> bool {
        self.rows.iter().any(|row| row.get(column).is_some())
    }

    /// Value of `column` at `index`, if the row exists and carries it
    pub fn value_at(&self, index: usize, column: Column) -> Option<f64> {
        self.rows.get(index).and_then(|row| row.get(column))
    }

    pub fn last_value(&self, column: Column) -> Option<f64> {
        self.rows.last().and_then(|row| row.get(column))
    }
}

/// Trading mode: close everything within the session, or hold across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Intraday,
    Swing,
}

/// Per-series vote cast by the mode selector
pub type ModeVote = TradingMode;

/// Aggregate decision returned by the mode selector
pub type ModeDecision = TradingMode;

impl TradingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingMode::Intraday => "intraday",
            TradingMode::Swing => "swing",
        }
    }
}

impl Default for TradingMode {
    fn default() -> Self {
        TradingMode::Swing
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intraday" => Ok(TradingMode::Intraday),
            "swing" => Ok(TradingMode::Swing),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown trading mode '{}'",
                other
            ))),
        }
    }
}

/// Candle interval names as the broker spells them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandleInterval {
    FiveMinute,
    FifteenMinute,
    OneDay,
}

impl CandleInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleInterval::FiveMinute => "FIVE_MINUTE",
            CandleInterval::FifteenMinute => "FIFTEEN_MINUTE",
            CandleInterval::OneDay => "ONE_DAY",
        }
    }
}

impl fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sized long entry with stop and target for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePlan {
    pub id: Uuid,
    pub symbol: String,
    pub price: f64,
    pub stop_price: f64,
    pub target_price: f64,
    pub stop_dist: f64,
    pub rr: f64,
    pub qty: u64,
    pub interval: CandleInterval,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}
