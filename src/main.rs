use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use modeselect::backtest::{run_backtest, BacktestSummary};
use modeselect::config::AppConfig;
use modeselect::data::{
    load_index_series, load_trade_plans, load_universe, save_backtest_results, save_trade_plans,
};
use modeselect::indicators::{annotate_index, calculate_adx, calculate_atr, calculate_ema};
use modeselect::scanner::{ModeSource, Scanner};
use modeselect::synthetic::{IndexScenario, SyntheticDataGenerator};
use modeselect::ModeSelector;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modeselect", about = "Intraday vs swing mode selection and universe scan")]
struct Cli {
    /// TOML config file (defaults to config/secrets.toml, then config/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decide the trading mode from index candles
    Mode {
        /// Universe JSON; entries with is_index=true vote using 15m candles
        #[arg(long)]
        input: PathBuf,

        /// Input is already-annotated index series instead of candles
        #[arg(long)]
        annotated: bool,
    },
    /// Run the full scan and write trade plans
    Scan {
        #[arg(long)]
        input: PathBuf,

        /// Overrides run.trade_plan_dir
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Replay saved trade plans against later candles
    Backtest {
        /// Plan file, or a directory of plan files
        #[arg(long)]
        plans: PathBuf,

        /// Universe JSON with the candles to replay
        #[arg(long)]
        input: PathBuf,

        /// Overrides run.paper_trade_dir
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Run the selector over synthetic index scenarios
    Demo {
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = 120)]
        candles: usize,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Mode { input, annotated } => run_mode(&config, &input, annotated),
        Command::Scan { input, output_dir } => run_scan(config, &input, output_dir),
        Command::Backtest {
            plans,
            input,
            output_dir,
        } => run_plan_backtest(&config, &plans, &input, output_dir),
        Command::Demo { seed, candles } => run_demo(&config, seed, candles),
    }
}

fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modeselect=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_mode(config: &AppConfig, input: &Path, annotated: bool) -> Result<()> {
    let now = Utc::now();

    if annotated {
        let series = load_index_series(input)
            .with_context(|| format!("reading index series from {}", input.display()))?;
        let selector = ModeSelector::new(config.mode);
        let tally = selector.tally(&series);

        println!("{}", serde_json::to_string_pretty(&serde_json::json!({
            "mode": tally.decision(),
            "source": ModeSource::IndexVote,
            "tally": tally,
        }))?);
        return Ok(());
    }

    let universe = load_universe(input)
        .with_context(|| format!("reading universe from {}", input.display()))?;
    let scanner = Scanner::new(config.clone());
    let (mode, source, tally) = scanner.select_mode(&universe, now);

    println!("{}", serde_json::to_string_pretty(&serde_json::json!({
        "mode": mode,
        "source": source,
        "tally": tally,
    }))?);
    Ok(())
}

fn run_scan(config: AppConfig, input: &Path, output_dir: Option<PathBuf>) -> Result<()> {
    let now = Utc::now();
    let universe = load_universe(input)
        .with_context(|| format!("reading universe from {}", input.display()))?;

    let out_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.run.trade_plan_dir));
    let scanner = Scanner::new(config);
    let report = scanner.scan(&universe, now);

    tracing::info!("Trade plans (top): {}", report.plans.len());
    for plan in &report.plans {
        tracing::info!(
            "  {} {} qty={} entry={:.2} stop={:.2} target={:.2} score={:.3}",
            plan.symbol,
            plan.interval,
            plan.qty,
            plan.price,
            plan.stop_price,
            plan.target_price,
            plan.score
        );
    }

    let path = save_trade_plans(&out_dir, now, report.mode, &report.plans)
        .with_context(|| format!("saving trade plans to {}", out_dir.display()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("Trade plans saved to {}", path.display());
    Ok(())
}

fn run_plan_backtest(
    config: &AppConfig,
    plans_path: &Path,
    input: &Path,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let plans = load_trade_plans(plans_path)
        .with_context(|| format!("reading trade plans from {}", plans_path.display()))?;
    if plans.is_empty() {
        println!("No trade plans found!");
        return Ok(());
    }

    let universe = load_universe(input)
        .with_context(|| format!("reading universe from {}", input.display()))?;
    let results = run_backtest(&plans, &universe);
    BacktestSummary::from_results(&results).print_report();

    let out_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.run.paper_trade_dir));
    let path = save_backtest_results(&out_dir, Utc::now(), &results)
        .with_context(|| format!("saving backtest results to {}", out_dir.display()))?;
    println!("Backtest results saved to {}", path.display());
    Ok(())
}

fn run_demo(config: &AppConfig, seed: u64, candles: usize) -> Result<()> {
    let settings = config.strategy.indicator_settings();
    let selector = ModeSelector::new(config.mode);

    println!("\n╔═══════════════════════════════════════════════════════╗");
    println!("║            MODE SELECTION DEMO                        ║");
    println!("╚═══════════════════════════════════════════════════════╝");
    println!("Seed {}, {} x 15m candles per index\n", seed, candles);

    let mut all_series = Vec::new();
    for (i, scenario) in IndexScenario::ALL.iter().enumerate() {
        let mut gen = SyntheticDataGenerator::new(seed.wrapping_add(i as u64));
        let data = gen.generate(scenario.name(), *scenario, candles, 15);
        let series = annotate_index(scenario.name(), &data, &settings);

        let vote = selector
            .vote(&series)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "no vote".to_string());
        println!("  {:<15} rows={:<4} vote={}", scenario.name(), series.len(), vote);

        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        if let (Some(fast), Some(slow), Some(atr), Some((adx, plus_di, minus_di))) = (
            calculate_ema(&closes, settings.fast),
            calculate_ema(&closes, settings.slow),
            calculate_atr(&data, settings.atr_period),
            calculate_adx(&data, settings.adx_period),
        ) {
            println!(
                "  {:<15} ema {:.1}/{:.1}  atr {:.2}  adx {:.1} (+DI {:.1} / -DI {:.1})",
                "", fast, slow, atr, adx, plus_di, minus_di
            );
        }

        all_series.push(series);
    }

    let tally = selector.tally(&all_series);
    println!(
        "\nDecision: {} (intraday {}, swing {}, skipped {})",
        tally.decision(),
        tally.intraday,
        tally.swing,
        tally.skipped
    );
    Ok(())
}
