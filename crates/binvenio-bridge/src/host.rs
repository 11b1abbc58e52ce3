// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Network access on desktop hosts.
//
// There is no Wi-Fi callback API to listen to here, so the active interface
// is derived on demand: connecting a UDP socket selects a route without
// sending anything, and the socket's local address names the interface.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use tracing::debug;

use crate::traits::{NetworkAccess, NetworkHandle};

/// Any routable address works; nothing is sent to it.
const ROUTE_PROBE: &str = "8.8.8.8:53";

/// `NetworkAccess` backed by the host routing table.
#[derive(Debug, Clone, Default)]
pub struct HostNetwork {
    /// Interface address pinned by configuration.
    pinned: Option<Ipv4Addr>,
}

impl HostNetwork {
    pub fn new(pinned: Option<Ipv4Addr>) -> Self {
        Self { pinned }
    }
}

impl NetworkAccess for HostNetwork {
    fn active_network(&self) -> Option<NetworkHandle> {
        if let Some(ip) = self.pinned {
            return Some(NetworkHandle::bound_to(ip));
        }

        match default_route_ipv4() {
            Some(ip) => Some(NetworkHandle::bound_to(ip)),
            None => {
                debug!("no IPv4 interface with a default route");
                None
            }
        }
    }
}

/// Local IPv4 address of the interface carrying the default route.
fn default_route_ipv4() -> Option<Ipv4Addr> {
    let local = UdpSocket::bind("0.0.0.0:0")
        .and_then(|s| {
            s.connect(ROUTE_PROBE)?;
            s.local_addr()
        })
        .ok()?;

    match local.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}
