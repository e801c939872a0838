// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use orca_processor::algorithm::AlgorithmSpec;
use orca_processor::config::{load_settings, ProcessorSettings};
use orca_processor::marshal::{AlgorithmOutput, DependencyValue};
use orca_processor::service::GrpcCoreClient;
use orca_processor::traits::unit_fn;
use orca_processor::Processor;

#[derive(Parser)]
#[command(name = "orca-processor")]
#[command(about = "Orca processor serving a set of market-data algorithms")]
struct Cli {
    /// YAML settings file; defaults apply when omitted
    #[arg(short, long, env = "ORCA_PROCESSOR_CONFIG")]
    config: Option<PathBuf>,
    /// Override the processor name from the settings file
    #[arg(short, long)]
    name: Option<String>,
    /// Serve without registering with the core
    #[arg(long, default_value_t = false)]
    skip_registration: bool,
}

#[derive(Serialize)]
struct RiskMetrics {
    var: f64,
    sharpe: f64,
    max_drawdown: f64,
}

fn load(cli: &Cli) -> Result<ProcessorSettings> {
    let mut settings = match &cli.config {
        Some(path) => load_settings(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => {
            let mut settings = ProcessorSettings::default();
            settings.apply_env_overrides()?;
            settings
        }
    };

    if let Some(name) = &cli.name {
        settings.name = name.clone();
    }
    settings.validate()?;
    Ok(settings)
}

fn values(dependency: Option<&DependencyValue>) -> Vec<f64> {
    dependency
        .and_then(DependencyValue::as_values)
        .map(<[f64]>::to_vec)
        .unwrap_or_default()
}

/// The bundled algorithm set: a small price pipeline on one window type.
fn register_algorithms(processor: &mut Processor) -> Result<()> {
    let prices = processor.algorithm(
        AlgorithmSpec::new("MarketPrices", "1.0.0", "MarketTick", "1.0.0"),
        unit_fn(|_| Ok(AlgorithmOutput::Values(vec![101.2, 101.9, 100.7, 102.4, 103.1]))),
        &[],
    )?;

    let returns = processor.algorithm(
        AlgorithmSpec::new("Returns", "1.0.0", "MarketTick", "1.0.0"),
        unit_fn(|deps| {
            let prices = values(deps.get_algorithm("MarketPrices", "1.0.0"));
            let returns = prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect::<Vec<_>>();
            Ok(AlgorithmOutput::Values(returns))
        }),
        &[prices.clone()],
    )?;

    processor.algorithm(
        AlgorithmSpec::new("Trend", "1.0.0", "MarketTick", "1.0.0"),
        unit_fn(|deps| {
            let prices = values(deps.get_algorithm("MarketPrices", "1.0.0"));
            let trend = match (prices.first(), prices.last()) {
                (Some(first), Some(last)) if last > first => "bullish",
                (Some(first), Some(last)) if last < first => "bearish",
                _ => "neutral",
            };
            Ok(AlgorithmOutput::text(trend))
        }),
        &[prices],
    )?;

    processor.algorithm(
        AlgorithmSpec::new("RiskMetrics", "1.0.0", "MarketTick", "1.0.0"),
        unit_fn(|deps| {
            let returns = values(deps.get_algorithm("Returns", "1.0.0"));
            anyhow::ensure!(returns.len() > 1, "need at least two returns, got {}", returns.len());

            let n = returns.len() as f64;
            let mean = returns.iter().sum::<f64>() / n;
            let std_dev = (returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
            let max_drawdown = returns.iter().cloned().fold(0.0_f64, f64::min).abs();

            Ok(AlgorithmOutput::serialize(&RiskMetrics {
                var: 1.645 * std_dev,
                sharpe: if std_dev > 0.0 { mean / std_dev } else { 0.0 },
                max_drawdown,
            }))
        }),
        &[returns],
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("orca_processor=info"))?,
        )
        .init();

    let cli = Cli::parse();
    let settings = load(&cli)?;
    let core_address = settings.core_address.clone();

    let mut processor = Processor::new(settings);
    register_algorithms(&mut processor)?;

    if cli.skip_registration {
        info!("Skipping registration with core");
    } else {
        let core = GrpcCoreClient::new(core_address)?;
        processor
            .register_with(&core)
            .await
            .with_context(|| format!("registering with core at {}", core.address()))?;
    }

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                on_signal.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Unable to listen for shutdown signal"),
        }
    });

    processor.serve(shutdown).await?;
    Ok(())
}
