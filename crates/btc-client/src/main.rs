//! BukkitTelnetClient settings tool entry point.
//!
//! Loads (and if needed provisions and migrates) the settings in a directory,
//! then prints the resulting command shortcuts and servers.  This is the same
//! load sequence the full client runs on start-up.
//!
//! # Usage
//!
//! ```text
//! btc-client [OPTIONS]
//!
//! Options:
//!   --dir <DIR>   Directory holding settings.xml [env: BTC_CONFIG_DIR] [default: .]
//!   --quiet       Do not print load status lines
//!   --json        Print the loaded settings as JSON
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use btc_client::infrastructure::storage::{ConfigStore, StorePaths};
use btc_core::{PlayerCommandEntry, ServerEntry};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Loads, migrates and prints BukkitTelnetClient settings.
#[derive(Debug, Parser)]
#[command(name = "btc-client", version)]
struct Cli {
    /// Directory holding `settings.xml` and, if present, `btc_servers.cfg`.
    #[arg(long, default_value = ".", env = "BTC_CONFIG_DIR")]
    dir: PathBuf,

    /// Suppress the status lines printed while loading.
    #[arg(long)]
    quiet: bool,

    /// Print the loaded settings as JSON instead of a listing.
    #[arg(long)]
    json: bool,
}

/// What `--json` prints.
#[derive(Debug, Serialize)]
struct SettingsSnapshot<'a> {
    commands: &'a [PlayerCommandEntry],
    servers: Vec<&'a ServerEntry>,
}

fn main() -> anyhow::Result<()> {
    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!(dir = %cli.dir.display(), "loading settings");

    let mut store = ConfigStore::new(StorePaths::in_dir(&cli.dir));
    if !store.load(!cli.quiet) {
        anyhow::bail!("no settings available in {}", cli.dir.display());
    }

    let mut servers: Vec<&ServerEntry> = store.servers().iter().collect();
    servers.sort();

    if cli.json {
        let snapshot = SettingsSnapshot {
            commands: store.commands(),
            servers,
        };
        let json = serde_json::to_string_pretty(&snapshot).context("serializing settings")?;
        println!("{json}");
        return Ok(());
    }

    println!("Commands:");
    for command in store.commands() {
        println!("  {:<24} {}", command.name(), command.format());
    }
    println!("Servers:");
    for server in servers {
        let marker = if server.flag { "*" } else { " " };
        println!("  {marker} {:<22} {}", server.name, server.address);
    }
    Ok(())
}
