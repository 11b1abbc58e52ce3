// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caller-facing printer link.
//
// Owns the collaborators and the configuration, and keeps the address cache
// honest: a successful print confirms the cached address, a failed one
// forgets it so the next attempt goes back to discovery.

use std::sync::Arc;

use tracing::{debug, info};

use binvenio_bridge::{AddressCache, NetworkAccess};
use binvenio_core::config::LinkConfig;
use binvenio_core::error::{LinkError, Result};
use binvenio_core::types::{DhcpStatus, PrinterAddress, ScanProgress, ScanResult};

use crate::capability;
use crate::connection::Connection;
use crate::discovery::{CancelToken, ScanHandle, Scanner};
use crate::handshake;
use crate::label_client;

pub struct PrinterLink {
    network: Arc<dyn NetworkAccess>,
    cache: Arc<dyn AddressCache>,
    config: LinkConfig,
}

impl PrinterLink {
    pub fn new(
        network: Arc<dyn NetworkAccess>,
        cache: Arc<dyn AddressCache>,
        config: LinkConfig,
    ) -> Self {
        Self {
            network,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn has_network(&self) -> bool {
        self.network.has_network()
    }

    /// Last known-good printer, if any.
    pub fn cached_address(&self) -> Option<PrinterAddress> {
        self.cache.get()
    }

    pub fn forget(&self) {
        info!("forgetting cached printer");
        self.cache.invalidate();
    }

    fn scanner(&self) -> Scanner {
        Scanner::new(self.network.clone(), self.cache.clone(), self.config.clone())
    }

    /// Sweep the configured subnet for a printer.
    pub async fn discover<F>(&self, on_progress: F, cancel: &CancelToken) -> ScanResult
    where
        F: FnMut(ScanProgress),
    {
        self.scanner().scan(on_progress, cancel).await
    }

    /// Start a sweep in the background.
    pub fn spawn_discovery(&self) -> ScanHandle {
        self.scanner().spawn()
    }

    /// Print `payload` on the printer at `addr`.
    ///
    /// Success records `addr` as the known-good printer. Any failure,
    /// including finding no network to connect over, invalidates the cache.
    pub async fn print(&self, addr: PrinterAddress, payload: &[u8]) -> Result<()> {
        match label_client::send_label(self.network.as_ref(), &self.config, addr, payload).await {
            Ok(()) => {
                self.cache.set(Some(addr));
                Ok(())
            }
            Err(e) => {
                debug!(addr = %addr, "invalidating cached printer after failure");
                self.cache.invalidate();
                Err(e)
            }
        }
    }

    /// Print on the cached printer.
    ///
    /// Checks for a network before looking at the cache, so being offline
    /// leaves the remembered printer alone.
    pub async fn print_cached(&self, payload: &[u8]) -> Result<()> {
        if !self.network.has_network() {
            return Err(LinkError::NoNetwork);
        }
        let addr = self.cache.get().ok_or(LinkError::NoPrinterCached)?;
        self.print(addr, payload).await
    }

    /// Ask the printer at `addr` whether it takes its address from DHCP.
    ///
    /// Opens its own connection and identifies the printer first. Never
    /// fails: anything that goes wrong reads as `Unknown`.
    pub async fn query_dhcp(&self, addr: PrinterAddress) -> DhcpStatus {
        let mut conn = match Connection::open(
            self.network.as_ref(),
            addr,
            self.config.connect_timeout(),
            self.config.handshake_timeout(),
        )
        .await
        {
            Ok(conn) => conn,
            Err(e) => {
                debug!(addr = %addr, error = %e, "DHCP query could not connect");
                return DhcpStatus::Unknown;
            }
        };

        let status = match handshake::identify(&mut conn, &self.config).await {
            Ok(model) => capability::query_dhcp(&mut conn, &model).await,
            Err(e) => {
                debug!(addr = %addr, error = %e, "DHCP query could not identify printer");
                DhcpStatus::Unknown
            }
        };
        conn.close().await;
        status
    }
}
