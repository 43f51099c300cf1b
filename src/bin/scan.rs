use anyhow::{Context, Result};
use std::io::Read;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use harmonic_signals::agents::TechnicalAnalyzer;
use harmonic_signals::config::Config;
use harmonic_signals::models::{CandleSeries, Quotes};

/// Chart-only scan: candles JSON (file argument or stdin) in, pivot /
/// pattern / levels report out. Quotes default to the last close.
fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    cfg.validate().context("Invalid configuration")?;

    let args: Vec<String> = std::env::args().collect();
    let input = match args.get(1) {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read candles {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read candles from stdin")?;
            buf
        }
    };

    let candles: CandleSeries =
        serde_json::from_str(&input).context("Input is not a JSON array of candles")?;
    candles.validate().context("Candle series rejected")?;

    let last_close = candles.last().map(|c| c.close).unwrap_or(0.0);
    let ask: f64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(last_close);
    let bid: f64 = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(ask);

    let report = TechnicalAnalyzer::new(&cfg).analyze(&candles, Quotes { ask, bid });
    info!(
        "{} candles, {} pivots, pattern: {}",
        candles.len(),
        report.total_pivots,
        report
            .pattern
            .map(|p| p.pattern_type.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
