mod config;
mod error;
mod hosts;
mod monitoring;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::config::Config;
use crate::monitoring::{HostTable, IcmpPinger, ProbeScheduler, ProbeSettings};

#[derive(Debug, Parser)]
#[command(name = "netwatch", version, about = "Terminal network latency and uptime monitor")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hosts file to monitor, overriding the configured one
    #[arg(long)]
    hosts: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();
    let args = Args::parse();

    let config = Config::from_config(args.config.as_deref()).context("failed to load config")?;
    if args.print_config {
        println!("{config}");
        return Ok(());
    }

    let hosts_file = args.hosts.unwrap_or_else(|| config.hosts.file.clone());
    let targets = hosts::load_targets(&hosts_file)
        .with_context(|| format!("failed to load hosts from {}", hosts_file.display()))?;
    info!(count = targets.len(), "loaded probe targets");

    let table = Arc::new(HostTable::new(targets, config.probe.history_size));

    let pinger = Arc::new(IcmpPinger::new()?);
    let scheduler = ProbeScheduler::new(
        pinger,
        ProbeSettings {
            interval: Duration::from_secs(config.probe.interval_secs),
            timeout: Duration::from_secs(config.probe.timeout_secs),
            permission_cooldown: Duration::from_secs(config.probe.permission_cooldown_secs),
            max_workers: config.probe.max_workers,
        },
    );
    // Fire-and-forget: the loops run until the process exits.
    let _handles = scheduler.spawn_all(&table);

    tui::run(table, Duration::from_millis(config.ui.tick_ms)).await
}
