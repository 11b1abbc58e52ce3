// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subnet sweep for a label printer.
//
// Label printers on a shop-floor Wi-Fi rarely advertise themselves, so the
// scanner simply walks the configured /24 in ascending host order, opening a
// connection to the discovery port on each address and running the
// identification handshake. The first address that passes wins and the sweep
// stops there. Candidates are tried one at a time so the printer that answers
// is always the lowest-numbered one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use binvenio_bridge::{AddressCache, NetworkAccess};
use binvenio_core::config::LinkConfig;
use binvenio_core::error::Result;
use binvenio_core::types::{PrinterAddress, ScanProgress, ScanResult};

use crate::capability;
use crate::connection::Connection;
use crate::handshake;

/// Cooperative stop flag for a running sweep.
///
/// Checked before each candidate, so a sweep stops within one connection
/// attempt of being cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sweeps a subnet for the first label printer.
#[derive(Clone)]
pub struct Scanner {
    network: Arc<dyn NetworkAccess>,
    cache: Arc<dyn AddressCache>,
    config: LinkConfig,
}

impl Scanner {
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

    /// Run one sweep to completion.
    ///
    /// The cached address is dropped up front; only a printer found by this
    /// sweep is written back. `on_progress` is called once per candidate that
    /// turned out not to be a printer. Only the check on entry can end the
    /// sweep with `NoNetwork`; a candidate whose connection finds no network
    /// is a miss like any other.
    pub async fn scan<F>(&self, mut on_progress: F, cancel: &CancelToken) -> ScanResult
    where
        F: FnMut(ScanProgress),
    {
        self.cache.invalidate();

        if !self.network.has_network() {
            warn!("no wireless network, not scanning");
            return ScanResult::NoNetwork;
        }

        let candidates = self.config.candidates();
        let total = candidates.len();
        info!(
            subnet = ?self.config.subnet,
            port = self.config.discovery_port,
            total,
            "printer scan started"
        );

        for (index, &candidate) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(tried = index, total, "printer scan cancelled");
                return ScanResult::Cancelled;
            }

            match self.try_candidate(candidate).await {
                Ok(found) => {
                    info!(addr = %candidate, tried = index + 1, "printer found");
                    return found;
                }
                Err(e) => {
                    debug!(addr = %candidate, error = %e, "not a printer");
                    on_progress(ScanProgress {
                        candidate,
                        percent_complete: percent(index + 1, total),
                    });
                }
            }
        }

        info!(total, "printer scan finished without a match");
        ScanResult::NotFound
    }

    /// Run a sweep on the runtime, streaming progress over a channel.
    pub fn spawn(self) -> ScanHandle {
        let cancel = CancelToken::new();
        let (tx, progress) = mpsc::unbounded_channel();

        let token = cancel.clone();
        let task = tokio::spawn(async move {
            self.scan(
                |p| {
                    // Nobody listening is fine; the result still matters.
                    let _ = tx.send(p);
                },
                &token,
            )
            .await
        });

        ScanHandle {
            progress,
            cancel,
            task,
        }
    }

    async fn try_candidate(&self, addr: PrinterAddress) -> Result<ScanResult> {
        let mut conn = Connection::open(
            self.network.as_ref(),
            addr,
            self.config.connect_timeout(),
            self.config.handshake_timeout(),
        )
        .await?;

        let outcome = self.identify_on(&mut conn).await;
        conn.close().await;
        outcome
    }

    async fn identify_on(&self, conn: &mut Connection) -> Result<ScanResult> {
        let address = conn.address();
        let model = handshake::identify(conn, &self.config).await?;
        self.cache.set(Some(address));

        let dhcp = if self.config.probe_dhcp_on_discovery {
            Some(capability::query_dhcp(conn, &model).await)
        } else {
            None
        };

        Ok(ScanResult::Found {
            address,
            model,
            dhcp,
        })
    }
}

/// A sweep running on the tokio runtime.
pub struct ScanHandle {
    /// One event per rejected candidate. Closes when the sweep ends.
    pub progress: mpsc::UnboundedReceiver<ScanProgress>,
    cancel: CancelToken,
    task: JoinHandle<ScanResult>,
}

impl ScanHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wait for the sweep's verdict.
    ///
    /// A panic inside the sweep resumes on the caller.
    pub async fn join(self) -> ScanResult {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                warn!(error = %e, "printer scan task was aborted");
                ScanResult::Cancelled
            }
        }
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done * 100 / total).min(100) as u8
}
