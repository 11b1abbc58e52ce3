// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer address caches.
//
// `MemoryAddressCache` lives as long as the process. `FileAddressCache`
// keeps the address in a small JSON file so the next run can skip discovery.
// Neither is trusted blindly: every print re-validates the address with a
// real connection.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use binvenio_core::types::{CachedAddress, PrinterAddress};
use tracing::{debug, warn};

use crate::traits::AddressCache;

/// In-memory address register.
#[derive(Debug, Default)]
pub struct MemoryAddressCache {
    addr: Mutex<Option<PrinterAddress>>,
}

impl MemoryAddressCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(addr: PrinterAddress) -> Self {
        Self {
            addr: Mutex::new(Some(addr)),
        }
    }
}

impl AddressCache for MemoryAddressCache {
    fn get(&self) -> Option<PrinterAddress> {
        self.addr.lock().map(|a| *a).unwrap_or(None)
    }

    fn set(&self, addr: Option<PrinterAddress>) {
        if let Ok(mut slot) = self.addr.lock() {
            *slot = addr;
        }
    }
}

/// Address register persisted to a JSON file.
///
/// The file is rewritten on every `set`; `set(None)` removes it.
#[derive(Debug)]
pub struct FileAddressCache {
    path: PathBuf,
    current: Mutex<Option<CachedAddress>>,
}

impl FileAddressCache {
    /// Open the cache at `path`, loading any address saved by a previous run.
    ///
    /// An unreadable file is treated as an empty cache.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = load(&path);
        if let Some(ref cached) = current {
            debug!(
                addr = %cached.address,
                stored_at = %cached.stored_at,
                "loaded cached printer address"
            );
        }
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached entry including when it was stored.
    pub fn entry(&self) -> Option<CachedAddress> {
        self.current.lock().ok().and_then(|c| c.clone())
    }
}

impl AddressCache for FileAddressCache {
    fn get(&self) -> Option<PrinterAddress> {
        self.entry().map(|c| c.address)
    }

    fn set(&self, addr: Option<PrinterAddress>) {
        let entry = addr.map(CachedAddress::now);
        if let Err(e) = store(&self.path, entry.as_ref()) {
            warn!(path = %self.path.display(), error = %e, "failed to persist printer address");
        }
        if let Ok(mut slot) = self.current.lock() {
            *slot = entry;
        }
    }
}

fn load(path: &Path) -> Option<CachedAddress> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(cached) => Some(cached),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring corrupt printer address cache");
            None
        }
    }
}

fn store(path: &Path, entry: Option<&CachedAddress>) -> std::io::Result<()> {
    match entry {
        Some(cached) => {
            let json = serde_json::to_string_pretty(cached)?;
            std::fs::write(path, json)
        }
        None => match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        },
    }
}
