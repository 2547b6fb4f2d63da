use crate::models::Candle;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Index market shapes for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexScenario {
    /// Steady climb, roughly +0.15% per candle
    TrendingUp,
    /// Steady slide, roughly -0.15% per candle
    TrendingDown,
    /// Mean-reverting chop around the base price
    Sideways,
    /// Flat price with tiny noise
    Quiet,
}

impl IndexScenario {
    pub const ALL: [IndexScenario; 4] = [
        IndexScenario::TrendingUp,
        IndexScenario::TrendingDown,
        IndexScenario::Sideways,
        IndexScenario::Quiet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndexScenario::TrendingUp => "trending-up",
            IndexScenario::TrendingDown => "trending-down",
            IndexScenario::Sideways => "sideways",
            IndexScenario::Quiet => "quiet",
        }
    }
}

/// Generates seeded candle data for demos and tests
pub struct SyntheticDataGenerator {
    rng: StdRng,
    base_price: f64,
    base_volume: f64,
    start_time: DateTime<Utc>,
}

impl SyntheticDataGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 20_000.0,
            base_volume: 1_000_000.0,
            // Fixed start keeps output identical across runs for a given seed
            start_time: Utc
                .with_ymd_and_hms(2025, 1, 6, 3, 45, 0)
                .single()
                .unwrap_or_default(),
        }
    }

    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    /// Generate `num_candles` candles for `symbol`, `interval_minutes` apart
    pub fn generate(
        &mut self,
        symbol: &str,
        scenario: IndexScenario,
        num_candles: usize,
        interval_minutes: i64,
    ) -> Vec<Candle> {
        let mut candles = Vec::with_capacity(num_candles);
        let mut price = self.base_price;

        for i in 0..num_candles {
            let timestamp = self.start_time + Duration::minutes(i as i64 * interval_minutes);

            let change = match scenario {
                IndexScenario::TrendingUp => price * (0.0015 + self.rng.gen_range(-0.0005..0.0005)),
                IndexScenario::TrendingDown => {
                    price * (-0.0015 + self.rng.gen_range(-0.0005..0.0005))
                }
                IndexScenario::Sideways => {
                    (self.base_price - price) * 0.3 + price * self.rng.gen_range(-0.004..0.004)
                }
                IndexScenario::Quiet => price * self.rng.gen_range(-0.00005..0.00005),
            };
            price += change;

            candles.push(self.create_candle(symbol, price, timestamp));
        }

        candles
    }

    /// Helper to create a candle from price and timestamp
    fn create_candle(&mut self, symbol: &str, price: f64, timestamp: DateTime<Utc>) -> Candle {
        // ±0.2% intrabar movement
        let noise_pct = 0.002;

        let high = price * (1.0 + self.rng.gen_range(0.0..noise_pct));
        let low = price * (1.0 - self.rng.gen_range(0.0..noise_pct));

        let open_raw = price * (1.0 + self.rng.gen_range(-noise_pct..noise_pct));
        let open = open_raw.clamp(low, high);

        // Vary volume ±30%
        let volume = self.base_volume * self.rng.gen_range(0.7..1.3);

        Candle {
            symbol: symbol.to_string(),
            timestamp,
            open,
            high,
            low,
            close: price,
            volume,
        }
    }
}
