// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the printer link.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Port the label printers listen on for the ZPL/SGD command channel.
pub const DISCOVERY_PORT: u16 = 6101;

/// JetDirect raw-print port. Other printer families answer here too, so a
/// candidate on this port must first prove it is not a PJL device.
pub const PJL_GUARD_PORT: u16 = 9100;

/// Fallback print resolution (8 dots/mm = 203 dpi) when `~HI` omits it.
pub const DEFAULT_DOTS_PER_MM: u32 = 8;

/// Unique identifier for one print attempt, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub Uuid);

impl AttemptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// IPv4 host plus TCP port of a (candidate) printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrinterAddress {
    pub ip: Ipv4Addr,
    pub port: u16,
}

impl PrinterAddress {
    pub fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self { ip, port }
    }

    /// Socket address suitable for `connect`.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.ip, self.port))
    }
}

impl From<SocketAddrV4> for PrinterAddress {
    fn from(addr: SocketAddrV4) -> Self {
        Self::new(*addr.ip(), addr.port())
    }
}

impl std::fmt::Display for PrinterAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

impl std::str::FromStr for PrinterAddress {
    type Err = std::net::AddrParseError;

    /// Accepts `a.b.c.d:port` or a bare `a.b.c.d` (port defaults to 6101).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<SocketAddrV4>() {
            Ok(sa) => Ok(sa.into()),
            Err(_) => Ok(Self::new(s.parse()?, DISCOVERY_PORT)),
        }
    }
}

/// Printer families we know how to query for configuration.
///
/// Each family has its own configuration channel, so the DHCP probe
/// dispatches on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    /// Link-OS printers; answer JSON SGD queries (`{}{"key":null}`).
    LinkOs,
    /// Older ZPL printers; answer `! U1 getvar` with a quoted value.
    LegacyZpl,
}

impl ModelFamily {
    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LinkOs => "Link-OS",
            Self::LegacyZpl => "Legacy ZPL",
        }
    }
}

/// Model-name prefixes in match priority order. The first prefix that the
/// upper-cased `~HI` model field starts with decides the family.
pub const MODEL_PREFIXES: &[(&str, ModelFamily)] = &[
    ("ZD4", ModelFamily::LinkOs),
    ("ZD6", ModelFamily::LinkOs),
    ("ZT", ModelFamily::LinkOs),
    ("ZQ", ModelFamily::LinkOs),
    ("ZD", ModelFamily::LegacyZpl),
    ("GK", ModelFamily::LegacyZpl),
    ("GX", ModelFamily::LegacyZpl),
    ("GC", ModelFamily::LegacyZpl),
    ("LP", ModelFamily::LegacyZpl),
    ("TLP", ModelFamily::LegacyZpl),
];

/// Result of classifying a `~HI` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceModel {
    Recognized {
        family: ModelFamily,
        /// Model field as reported (e.g. "ZD410-203dpi").
        name: String,
        firmware: Option<String>,
        dots_per_mm: u32,
    },
    /// Answered `~HI` with a model we have no prefix for.
    Unrecognized,
}

impl DeviceModel {
    pub fn family(&self) -> Option<ModelFamily> {
        match self {
            Self::Recognized { family, .. } => Some(*family),
            Self::Unrecognized => None,
        }
    }

    /// Print resolution in dots per millimetre (default when unrecognized).
    pub fn dots_per_mm(&self) -> u32 {
        match self {
            Self::Recognized { dots_per_mm, .. } => *dots_per_mm,
            Self::Unrecognized => DEFAULT_DOTS_PER_MM,
        }
    }
}

impl std::fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recognized {
                family,
                name,
                firmware,
                dots_per_mm,
            } => {
                write!(f, "{name} ({}, {dots_per_mm} dots/mm", family.display_name())?;
                if let Some(fw) = firmware {
                    write!(f, ", firmware {fw}")?;
                }
                write!(f, ")")
            }
            Self::Unrecognized => write!(f, "unrecognized printer"),
        }
    }
}

/// Whether the printer takes its IP address from DHCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DhcpStatus {
    Enabled,
    Disabled,
    /// Could not tell. Treated as `Enabled` for warnings.
    Unknown,
}

impl DhcpStatus {
    /// A DHCP-assigned address can move, so warn unless it is known static.
    pub fn should_warn(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// Emitted once per candidate that turned out not to be a printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub candidate: PrinterAddress,
    /// 0..=100.
    pub percent_complete: u8,
}

/// Terminal outcome of one discovery sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    Found {
        address: PrinterAddress,
        model: DeviceModel,
        /// `None` when the sweep was configured not to probe DHCP.
        dhcp: Option<DhcpStatus>,
    },
    NotFound,
    NoNetwork,
    /// Halted by its cancel token before reaching a verdict.
    Cancelled,
}

impl ScanResult {
    pub fn address(&self) -> Option<PrinterAddress> {
        match self {
            Self::Found { address, .. } => Some(*address),
            _ => None,
        }
    }
}

/// A printer address as persisted by an address cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAddress {
    pub address: PrinterAddress,
    pub stored_at: DateTime<Utc>,
}

impl CachedAddress {
    pub fn now(address: PrinterAddress) -> Self {
        Self {
            address,
            stored_at: Utc::now(),
        }
    }
}
