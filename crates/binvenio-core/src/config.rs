// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer link configuration.

use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};
use crate::types::{DEFAULT_DOTS_PER_MM, DISCOVERY_PORT, PJL_GUARD_PORT, PrinterAddress};

/// Persistent printer link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// First three octets of the /24 the printer is expected on.
    pub subnet: [u8; 3],
    /// First host octet tried by a discovery sweep.
    pub first_host: u8,
    /// Last host octet tried (inclusive).
    pub last_host: u8,
    /// Port probed on every candidate (default 6101).
    pub discovery_port: u16,
    /// Port on which candidates must first fail a PJL probe (default 9100).
    pub guard_port: u16,
    /// TCP connect timeout for every attempt.
    pub connect_timeout_ms: u64,
    /// Read timeout for handshake and configuration queries.
    pub handshake_timeout_ms: u64,
    /// Read timeout while waiting for a print confirmation.
    pub print_timeout_ms: u64,
    /// Resolution assumed when `~HI` does not report one.
    pub default_dots_per_mm: u32,
    /// Query DHCP on the printer right after discovering it.
    pub probe_dhcp_on_discovery: bool,
    /// Local interface address to bind outgoing sockets to. When unset the
    /// interface carrying the default route is used.
    pub interface: Option<Ipv4Addr>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            subnet: [192, 168, 1],
            first_host: 1,
            last_host: 255,
            discovery_port: DISCOVERY_PORT,
            guard_port: PJL_GUARD_PORT,
            connect_timeout_ms: 500,
            handshake_timeout_ms: 500,
            print_timeout_ms: 3000,
            default_dots_per_mm: DEFAULT_DOTS_PER_MM,
            probe_dhcp_on_discovery: true,
            interface: None,
        }
    }
}

impl LinkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn print_timeout(&self) -> Duration {
        Duration::from_millis(self.print_timeout_ms)
    }

    /// Candidate addresses of a discovery sweep, in ascending order.
    pub fn candidates(&self) -> Vec<PrinterAddress> {
        let [a, b, c] = self.subnet;
        (self.first_host..=self.last_host)
            .map(|host| PrinterAddress::new(Ipv4Addr::new(a, b, c, host), self.discovery_port))
            .collect()
    }

    /// Reject settings that would make every operation fail.
    pub fn validate(&self) -> Result<()> {
        if self.first_host > self.last_host {
            return Err(LinkError::Config(format!(
                "first_host {} is after last_host {}",
                self.first_host, self.last_host
            )));
        }
        if self.discovery_port == 0 {
            return Err(LinkError::Config("discovery_port must not be 0".into()));
        }
        if self.connect_timeout_ms == 0
            || self.handshake_timeout_ms == 0
            || self.print_timeout_ms == 0
        {
            return Err(LinkError::Config("timeouts must be non-zero".into()));
        }
        if self.default_dots_per_mm == 0 {
            return Err(LinkError::Config("default_dots_per_mm must be non-zero".into()));
        }
        Ok(())
    }

    /// Load settings from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings, or defaults when the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn persist(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
