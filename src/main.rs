use anyhow::{Context, Result};
use std::io::Read;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use harmonic_signals::config::Config;
use harmonic_signals::synthesis::{SignalSynthesizer, SynthesisRequest};

/// Reads one snapshot (file path argument, or stdin) and prints the
/// synthesized signal as JSON on stdout.
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

    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read snapshot from stdin")?;
            buf
        }
    };

    let request: SynthesisRequest =
        serde_json::from_str(&input).context("Snapshot is not a valid synthesis request")?;
    info!(
        "Synthesizing {} from {} candles",
        request.asset,
        request.candles.len()
    );

    let synthesizer =
        SignalSynthesizer::new(cfg.shared()).context("Invalid synthesis configuration")?;
    let signal = synthesizer.synthesize(&request);

    println!("{}", serde_json::to_string_pretty(&signal)?);
    Ok(())
}
