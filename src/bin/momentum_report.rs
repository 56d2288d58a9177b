use anyhow::{Context, Result};
use log::{info, warn};
use momentum_indicators::indicators::RsiZone;
use momentum_indicators::loader::load_split_json_with;
use momentum_indicators::{IndicatorConfig, MomentumAnalysis, Signal};
use std::env;
use std::fs::File;

fn main() -> Result<()> {
    // Initialize logger with default info level if RUST_LOG not set
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_file = args
        .get(1)
        .context("usage: momentum_report <data.json> [config.json]")?;
    let config_file = args.get(2).map(String::as_str).unwrap_or("config.json");

    info!("Loading configuration from: {}", config_file);
    let config = IndicatorConfig::load_from_file(config_file)?;

    info!("Loading price data from: {}", data_file);
    let file = File::open(data_file).with_context(|| format!("Failed to open {data_file}"))?;
    let table = load_split_json_with(file, config.columns.clone())?;

    let analysis = MomentumAnalysis::new(config);
    let derived = analysis.run(&table)?;
    println!("{}", derived.df().tail(Some(10)));

    let snapshot = analysis.snapshot_of(&derived)?;
    info!(
        "Latest: RSI {:.2} ({:?}), MACD hist {:.4}, ROC {:.2}, %D {:.2}, MFI {:.2}",
        snapshot.rsi,
        snapshot.rsi_zone(),
        snapshot.macd_histogram,
        snapshot.roc,
        snapshot.stochastic,
        snapshot.mfi
    );

    match snapshot.rsi_signal.signal {
        Signal::Buy => info!("RSI BUY signal, strength {:.2}", snapshot.rsi_signal.strength),
        Signal::Sell => info!("RSI SELL signal, strength {:.2}", snapshot.rsi_signal.strength),
        Signal::Hold => info!("RSI HOLD"),
    }
    if snapshot.macd_signal.signal.is_actionable() {
        info!(
            "MACD histogram crossover: {:?}, strength {:.4}",
            snapshot.macd_signal.signal, snapshot.macd_signal.strength
        );
    }
    if snapshot.rsi_zone() != RsiZone::Neutral && !snapshot.macd_signal.signal.is_actionable() {
        warn!("RSI is {:?} without MACD confirmation", snapshot.rsi_zone());
    }

    Ok(())
}
