// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator traits the printer link is written against.

use std::net::Ipv4Addr;

use binvenio_core::types::PrinterAddress;

/// Handle to the active wireless interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkHandle {
    /// Local address sockets are bound to, so traffic leaves through this
    /// interface. `None` lets the OS pick the route.
    pub local_ip: Option<Ipv4Addr>,
}

impl NetworkHandle {
    pub fn bound_to(local_ip: Ipv4Addr) -> Self {
        Self {
            local_ip: Some(local_ip),
        }
    }

    pub fn any() -> Self {
        Self { local_ip: None }
    }
}

/// Supplies the currently active network.
///
/// Availability can change at any moment, so callers request a fresh handle
/// immediately before each connect instead of holding one.
pub trait NetworkAccess: Send + Sync {
    /// The active network, or `None` when there is no usable interface.
    fn active_network(&self) -> Option<NetworkHandle>;

    fn has_network(&self) -> bool {
        self.active_network().is_some()
    }
}

/// Last known-good printer address.
///
/// A single-writer-at-a-time register with last-writer-wins semantics;
/// `set(None)` invalidates.
pub trait AddressCache: Send + Sync {
    fn get(&self) -> Option<PrinterAddress>;

    fn set(&self, addr: Option<PrinterAddress>);

    fn invalidate(&self) {
        self.set(None);
    }
}
