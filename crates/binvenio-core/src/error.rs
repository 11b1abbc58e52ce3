// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the printer link.

use thiserror::Error;

use crate::types::PrinterAddress;

/// Top-level error type for all printer link operations.
///
/// During a discovery sweep everything except `NoNetwork` simply means
/// "no printer at this address" and the sweep moves on. During printing each
/// variant is surfaced to the caller.
#[derive(Debug, Error)]
pub enum LinkError {
    // -- Network --
    #[error("no wireless network available")]
    NoNetwork,

    #[error("could not connect to {addr}: {reason}")]
    ConnectFailed { addr: PrinterAddress, reason: String },

    // -- Protocol --
    #[error("handshake with {addr} failed: {reason}")]
    HandshakeFailed { addr: PrinterAddress, reason: String },

    #[error("device at {0} answered the PJL probe; not a label printer")]
    ForeignDevice(PrinterAddress),

    #[error("no response from {0}")]
    NoResponse(PrinterAddress),

    #[error("printer at {addr} rejected the job: {reply:?}")]
    PrintRejected { addr: PrinterAddress, reply: String },

    // -- Session --
    #[error("no printer address cached")]
    NoPrinterCached,

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LinkError {
    /// Whether a discovery sweep should just move on to the next candidate.
    pub fn is_candidate_miss(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailed { .. }
                | Self::HandshakeFailed { .. }
                | Self::ForeignDevice(_)
                | Self::NoResponse(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LinkError>;
