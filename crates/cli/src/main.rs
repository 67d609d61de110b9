use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use market_sentry_analytics::run_analysis;
use market_sentry_core::ConfigLoader;
use market_sentry_data::{loader, report};

#[derive(Parser)]
#[command(name = "market-sentry")]
#[command(about = "Anomaly surveillance over historical market data for a single pair", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the detection pipeline over trade and order-book CSVs
    Analyze {
        /// Trades CSV file (timestamp,price,size,side)
        #[arg(long)]
        trades: PathBuf,
        /// Order-book snapshots CSV file (timestamp,asks,bids)
        #[arg(long)]
        orderbooks: PathBuf,
        /// Config TOML file path
        #[arg(short, long)]
        config: Option<String>,
        /// Output directory for the report and summary
        #[arg(short, long, default_value = "reports")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            trades,
            orderbooks,
            config,
            out_dir,
        } => analyze(&trades, &orderbooks, config.as_deref(), &out_dir),
    }
}

fn analyze(
    trades_path: &Path,
    orderbooks_path: &Path,
    config_path: Option<&str>,
    out_dir: &Path,
) -> Result<()> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };

    let trades = loader::load_trades(trades_path)
        .with_context(|| format!("failed to load trades from {}", trades_path.display()))?;
    let snapshots = loader::load_order_books(orderbooks_path).with_context(|| {
        format!(
            "failed to load order books from {}",
            orderbooks_path.display()
        )
    })?;
    info!(
        trades = trades.len(),
        snapshots = snapshots.len(),
        "inputs loaded"
    );

    let mut summary = run_analysis(&trades, &snapshots, &config);
    summary.artifacts = report::write_artifacts(&summary, out_dir)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report::scalar_summary(&summary))?
    );
    Ok(())
}
