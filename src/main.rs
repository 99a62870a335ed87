//! Consensus forecast command-line driver
//!
//! **Usage:**
//! ```bash
//! weather-consensus forecasts.json [--config config.toml] [--no-narrative] [--pretty]
//! cat forecasts.json | weather-consensus -
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use weather_consensus::{
    AggregatedForecast, ConfidenceLevel, ConsensusConfig, ModelForecast, NarrativeBuilder,
    NarrativeSummary, aggregate_with, score_forecast_days, telemetry,
};

/// Merge forecasts from several weather models into one consensus
#[derive(Parser, Debug)]
#[clap(name = "weather-consensus")]
#[clap(version, about = "Build a consensus forecast from multiple weather models")]
struct Args {
    /// JSON file holding an array of model forecasts, or `-` for stdin
    #[clap(value_name = "INPUT")]
    input: String,

    /// Configuration file (defaults to the user config directory)
    #[clap(long, value_name = "PATH", env = "WXCONSENSUS_CONFIG")]
    config: Option<PathBuf>,

    /// Skip narrative generation
    #[clap(long)]
    no_narrative: bool,

    /// Pretty-print the JSON output
    #[clap(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Output {
    forecast: AggregatedForecast,
    narrative: Option<NarrativeSummary>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConsensusConfig::load_from_path(args.config.clone())
        .context("Failed to load configuration")?;
    telemetry::init(&config.logging)?;

    let raw = read_input(&args.input)
        .with_context(|| format!("Failed to read model forecasts from '{}'", args.input))?;
    let forecasts = parse_forecasts(&raw)
        .with_context(|| format!("Failed to parse model forecasts from '{}'", args.input))?;
    info!(models = forecasts.len(), input = %args.input, "Loaded model forecasts");

    let forecast = aggregate_with(forecasts, &config.aggregation)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let narrative = if args.no_narrative {
        None
    } else {
        let confidences: Vec<ConfidenceLevel> = score_forecast_days(&forecast)
            .into_iter()
            .map(|result| result.confidence)
            .collect();
        Some(NarrativeBuilder::new(config.narrative).build(&forecast, Some(confidences.as_slice())))
    };

    let output = Output { forecast, narrative };
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize consensus forecast")?;
    println!("{json}");

    Ok(())
}

fn read_input(input: &str) -> weather_consensus::Result<String> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

fn parse_forecasts(raw: &str) -> weather_consensus::Result<Vec<ModelForecast>> {
    Ok(serde_json::from_str(raw)?)
}
