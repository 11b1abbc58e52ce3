// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binvenio: Wi-Fi label printer link
//
// Entry point. Initialises logging, loads settings, wires the host network and
// the on-disk printer memory into a session, and runs one command.

mod commands;
mod data_dir;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use binvenio_bridge::{FileAddressCache, platform_network};
use binvenio_core::config::LinkConfig;

use commands::{CommandLine, Commands, Session, dhcp, discover, forget, print, status};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = CommandLine::parse_args();
    init_logging(cli.verbose);

    let dir = data_dir::data_dir();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir::config_path(&dir));
    let mut config = LinkConfig::load_or_default(&config_path)
        .with_context(|| format!("loading settings from {}", config_path.display()))?;
    if cli.interface.is_some() {
        config.interface = cli.interface;
    }
    tracing::debug!(path = %config_path.display(), ?config, "settings loaded");

    let session = Session {
        network: Arc::from(platform_network(config.interface)),
        cache: Arc::new(FileAddressCache::open(data_dir::printer_cache_path(&dir))),
        config,
        config_path,
    };

    match cli.command {
        Commands::Discover { no_dhcp } => discover::discover(&session, no_dhcp).await,
        Commands::Print {
            file,
            address,
            discover: discover_first,
        } => print::print(&session, &file, address, discover_first).await,
        Commands::Dhcp { address } => dhcp::dhcp(&session, address).await,
        Commands::Forget => Ok(forget::forget(&session)),
        Commands::Status => Ok(status::status(&session)),
    }
}

/// Logs go to stderr so stdout stays clean for command output.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
