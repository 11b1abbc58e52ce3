// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform collaborators consumed by the printer link.
//
// The link itself never monitors connectivity or owns persistent state. It
// asks a `NetworkAccess` for the active interface right before every connect
// and reads/writes the last known-good printer through an `AddressCache`.

pub mod cache;
pub mod host;
pub mod traits;

use std::net::Ipv4Addr;

pub use cache::{FileAddressCache, MemoryAddressCache};
pub use host::HostNetwork;
pub use traits::{AddressCache, NetworkAccess, NetworkHandle};

/// Network provider for the current platform.
///
/// `interface` pins outgoing sockets to one local address; without it the
/// interface carrying the default route is used.
pub fn platform_network(interface: Option<Ipv4Addr>) -> Box<dyn NetworkAccess> {
    Box::new(HostNetwork::new(interface))
}
