//! # Dining Philosophers
//!
//! Seats the philosophers, reports a snapshot every period and shuts down cleanly on
//! Ctrl-C, SIGTERM, or after `--duration-secs`.
//!
//! ```bash
//! RUST_LOG=info cargo run -- --seats 5 --seed 42
//! RUST_LOG=debug cargo run -- --config table.toml --leds
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use dining_philosophers::indicator::{Indicator, LogIndicator, NoopIndicator};
use dining_philosophers::lifecycle::{setup_tracing, DiningTable, ReportFormat, TableConfig};
use dining_philosophers::philosopher::SleepRange;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "dining-philosophers")]
#[command(about = "Deadlock-avoiding dining philosophers on Tokio")]
struct Cli {
    /// TOML configuration file; flags below override its values
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Number of philosophers (named A0, A1, ...)
    #[arg(long, short)]
    seats: Option<usize>,

    /// Failed second-fork attempts before waiting for it
    #[arg(long)]
    retry_budget: Option<u32>,

    /// Think duration range in milliseconds, e.g. "1000..8000"
    #[arg(long, value_parser = parse_range)]
    think_ms: Option<SleepRange>,

    /// Eat duration range in milliseconds, e.g. "1000..8000"
    #[arg(long, value_parser = parse_range)]
    eat_ms: Option<SleepRange>,

    /// Snapshot period in milliseconds
    #[arg(long)]
    report_interval_ms: Option<u64>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print snapshots as JSON
    #[arg(long)]
    json: bool,

    /// Log indicator switches (one virtual LED per seat)
    #[arg(long)]
    leds: bool,

    /// Stop after this many seconds instead of waiting for a signal
    #[arg(long)]
    duration_secs: Option<u64>,
}

impl Cli {
    fn table_config(&self) -> Result<TableConfig> {
        let mut config = match &self.config {
            Some(path) => TableConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => TableConfig::default(),
        };
        if let Some(seats) = self.seats {
            config.names = TableConfig::with_seats(seats).names;
        }
        if let Some(budget) = self.retry_budget {
            config.retry_budget = budget;
        }
        if let Some(think) = self.think_ms {
            config.timing.think = think;
        }
        if let Some(eat) = self.eat_ms {
            config.timing.eat = eat;
        }
        if let Some(interval) = self.report_interval_ms {
            config.report_interval_ms = interval;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.json {
            config.report_format = ReportFormat::Json;
        }
        Ok(config)
    }
}

fn parse_range(text: &str) -> Result<SleepRange, String> {
    let (min, max) = text
        .split_once("..")
        .ok_or_else(|| format!("expected MIN..MAX, got {text:?}"))?;
    let min = min.trim().parse().map_err(|e| format!("bad minimum: {e}"))?;
    let max = max.trim().parse().map_err(|e| format!("bad maximum: {e}"))?;
    Ok(SleepRange::from_millis(min, max))
}

/// Resolves on Ctrl-C, SIGTERM, or when the optional run limit elapses.
async fn termination(limit: Option<Duration>) {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    let limit = async {
        match limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = sigterm => info!("Received SIGTERM"),
        _ = limit => info!("Run limit reached"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let config = cli.table_config()?;
    let indicator: Arc<dyn Indicator> = if cli.leds {
        Arc::new(LogIndicator)
    } else {
        Arc::new(NoopIndicator)
    };

    let table = DiningTable::start(config, indicator).context("starting the table")?;
    let last = table
        .run_until(termination(cli.duration_secs.map(Duration::from_secs)))
        .await?;

    info!(total_meals = last.total_meals(), meals = ?last.meals(), "Application completed successfully");
    Ok(())
}
