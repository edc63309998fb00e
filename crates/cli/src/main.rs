//! capscan CLI - scan this build agent and print its capabilities

mod logging;
mod settings;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::{info, warn};

use capscan_core::application::constants::BLOCKING_SHUTDOWN_TIMEOUT;
use capscan_core::application::{
    cancel_channel, enabled_providers, registration_table, CapabilityScanner, ScanConfig, ScanMode,
};
use capscan_core::domain::Capability;
use capscan_core::port::ScriptRunner;
use capscan_infra_system::{native_signals, SubprocessScriptRunner};

#[derive(Parser)]
#[command(name = "capscan")]
#[command(about = "Discover the toolchains and SDKs installed on a build agent", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML); defaults to capscan.toml in the user config dir
    #[arg(long, global = true, env = "CAPSCAN_CONFIG")]
    config: Option<String>,

    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled provider and print the capabilities (default)
    Scan(ScanArgs),

    /// List the registration table
    Providers,
}

#[derive(Args, Default)]
struct ScanArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Run providers concurrently (overrides the configured mode)
    #[arg(long)]
    concurrent: bool,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Tabled)]
struct CapabilityRow {
    name: String,
    value: String,
}

impl From<&Capability> for CapabilityRow {
    fn from(capability: &Capability) -> Self {
        Self {
            name: capability.name().to_string(),
            value: capability.value().to_string(),
        }
    }
}

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "#")]
    order: usize,
    provider: String,
    status: String,
}

#[derive(Serialize)]
struct ScanReport {
    host: Option<String>,
    scanned_at: DateTime<Utc>,
    capabilities: Vec<Capability>,
}

fn script_runner() -> Arc<dyn ScriptRunner> {
    Arc::new(SubprocessScriptRunner::new())
}

async fn run_scan(config: ScanConfig, args: ScanArgs) -> Result<()> {
    let table = registration_table(&config, Some(script_runner()))?;
    let mode = if args.concurrent {
        ScanMode::Concurrent
    } else {
        config.mode
    };

    let scanner = CapabilityScanner::from_config(enabled_providers(&table), native_signals(), &config)
        .with_mode(mode);

    let (cancel_tx, cancel) = cancel_channel();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling scan");
            cancel_tx.cancel();
        }
    });

    let scanned_at = Utc::now();
    let result = scanner.scan(&cancel).await;
    ctrl_c.abort();
    let capabilities = result.context("Capability scan did not complete")?;

    info!(count = capabilities.len(), "Scan finished");

    match args.format {
        OutputFormat::Json => {
            let report = ScanReport {
                host: sysinfo::System::host_name(),
                scanned_at,
                capabilities,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            if capabilities.is_empty() {
                println!("{}", "No capabilities detected".yellow());
                return Ok(());
            }

            println!(
                "{}",
                format!("✓ {} capabilities detected", capabilities.len())
                    .green()
                    .bold()
            );
            println!();

            let rows: Vec<CapabilityRow> = capabilities.iter().map(CapabilityRow::from).collect();
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}

fn list_providers(config: &ScanConfig) -> Result<()> {
    let table = registration_table(config, Some(script_runner()))?;

    println!("{}", "Registered providers".cyan().bold());
    println!();

    let rows: Vec<ProviderRow> = table
        .iter()
        .enumerate()
        .map(|(index, row)| ProviderRow {
            order: index + 1,
            provider: row.provider.name().to_string(),
            status: if row.enabled {
                "enabled".green().to_string()
            } else {
                "disabled".red().to_string()
            },
        })
        .collect();
    println!("{}", Table::new(rows));

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = settings::load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or_else(|| Commands::Scan(ScanArgs::default())) {
        Commands::Scan(args) => run_scan(config, args).await?,
        Commands::Providers => list_providers(&config)?,
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let result = runtime.block_on(run(cli));
    // Probes abandoned at their deadline may still sit in a syscall
    runtime.shutdown_timeout(BLOCKING_SHUTDOWN_TIMEOUT);

    result
}
