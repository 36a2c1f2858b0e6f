//! Crawl a tenant snapshot with the built-in receivers
//!
//! Loads a JSON snapshot into a `MemoryStore`, registers the chosen
//! receivers, runs, and prints the run report.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tenant_runner::receivers::{Inventory, InventoryReceiver, TraceReceiver};
use tenant_runner::{
    CancellationToken, Level, MemoryStore, ReceiverOptions, RunReport, RunningManager, Session,
};

use crate::config::Config;

const DEFAULT_TENANT_URL: &str = "https://localhost/";

#[derive(Parser)]
#[command(name = "tenant-runner")]
#[command(about = "Crawl a tenant content tree and report what was found")]
struct Cli {
    /// Snapshot file to crawl (overrides TENANT_SNAPSHOT)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Tenant admin URL (overrides TENANT_URL)
    #[arg(long)]
    url: Option<String>,

    /// Count what the crawl finds (default when no receiver is chosen)
    #[arg(long)]
    inventory: bool,

    /// Log every receiver event
    #[arg(long)]
    trace: bool,

    /// Dispatch hidden lists too
    #[arg(long)]
    include_hidden_lists: bool,

    /// Dispatch root sites only
    #[arg(long)]
    exclude_sub_sites: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Output {
    report: RunReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    inventory: Option<Inventory>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tenant_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let snapshot = config
        .snapshot_path(cli.snapshot.clone())
        .context("No snapshot: pass --snapshot or set TENANT_SNAPSHOT")?;
    let store = MemoryStore::load(&snapshot)
        .await
        .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;
    tracing::info!(path = %snapshot.display(), entities = store.len(), "Snapshot loaded");

    let url = cli
        .url
        .clone()
        .or_else(|| config.tenant_url.clone())
        .unwrap_or_else(|| DEFAULT_TENANT_URL.to_string());
    let session = Session::new(&url, config.credentials()).context("Invalid tenant URL")?;

    let options = ReceiverOptions::new()
        .with_hidden_lists(cli.include_hidden_lists)
        .with_sub_sites(!cli.exclude_sub_sites);

    let token = CancellationToken::new();
    let tenant = store.tenant();
    let mut manager = RunningManager::new(store, session).with_cancellation(token.clone());

    let inventory = if cli.inventory || !cli.trace {
        let receiver = InventoryReceiver::new().with_options(options);
        let handle = receiver.handle();
        manager.register(receiver);
        Some(handle)
    } else {
        None
    };
    if cli.trace {
        manager.register(TraceReceiver::new().with_options(options));
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling run");
            token.cancel();
        }
    });

    let report = manager.run(tenant).await.context("Tenant run failed")?;
    let output = Output {
        report,
        inventory: inventory.map(|handle| handle.snapshot()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&output);
    }
    Ok(())
}

fn print_summary(output: &Output) {
    let report = &output.report;
    println!("Run {}", report.run_id);
    for level in Level::ALL {
        let count = report.nodes_at(level);
        if count > 0 {
            println!("  {:<16} {}", level.kind(), count);
        }
    }
    println!("  store calls      {}", report.store_calls);
    println!("  pruned axes      {}", report.pruned_axes);

    if let Some(inventory) = &output.inventory {
        println!(
            "Inventory: {} sites ({} sub-sites), {} lists ({} hidden), {} files ({} bytes)",
            inventory.sites,
            inventory.sub_sites,
            inventory.lists,
            inventory.hidden_lists,
            inventory.files,
            inventory.file_bytes
        );
    }
}
