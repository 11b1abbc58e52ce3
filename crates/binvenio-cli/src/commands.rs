// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod dhcp;
pub mod discover;
pub mod forget;
pub mod print;
pub mod status;

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use binvenio_bridge::{FileAddressCache, NetworkAccess};
use binvenio_core::config::LinkConfig;
use binvenio_core::error::LinkError;
use binvenio_core::human_errors::humanize_error;
use binvenio_core::types::PrinterAddress;
use binvenio_print::PrinterLink;

#[derive(Parser)]
#[command(name = "binvenio")]
#[command(version, about = "Find a Wi-Fi label printer and print to it.")]
pub struct CommandLine {
    /// Settings file (defaults to config.json in the data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Local interface address to send from
    #[arg(long, global = true)]
    pub interface: Option<Ipv4Addr>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the subnet for a label printer and remember it
    #[command(alias = "scan")]
    Discover {
        /// Skip asking the printer whether it uses DHCP
        #[arg(long)]
        no_dhcp: bool,
    },
    /// Send a raw label file to the printer
    Print {
        /// Label file, or - for stdin
        file: PathBuf,
        /// Printer to use instead of the remembered one
        #[arg(long)]
        address: Option<PrinterAddress>,
        /// Search for a printer first if none is remembered
        #[arg(long)]
        discover: bool,
    },
    /// Ask the printer whether it takes its address from DHCP
    Dhcp {
        /// Printer to ask instead of the remembered one
        address: Option<PrinterAddress>,
    },
    /// Forget the remembered printer
    Forget,
    /// Show network state and the remembered printer
    Status,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Everything a command needs, resolved once at startup.
pub struct Session {
    pub network: Arc<dyn NetworkAccess>,
    pub cache: Arc<FileAddressCache>,
    pub config: LinkConfig,
    pub config_path: PathBuf,
}

impl Session {
    pub fn link(&self) -> PrinterLink {
        self.link_with(self.config.clone())
    }

    pub fn link_with(&self, config: LinkConfig) -> PrinterLink {
        PrinterLink::new(self.network.clone(), self.cache.clone(), config)
    }
}

/// Print a failure the way a user should read it.
pub fn report(err: &LinkError) {
    let human = humanize_error(err);
    eprintln!("{}", human.message);
    eprintln!("  {}", human.suggestion);
    tracing::debug!(error = %err, retriable = human.retriable, "command failed");
}
