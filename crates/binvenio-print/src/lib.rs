// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binvenio Print finds a Zebra-compatible label printer on the local Wi-Fi
// subnet, confirms what it is, asks how it gets its address, and submits raw
// label data to it. Everything rides on one short-lived TCP connection per
// operation; network availability and the remembered printer address come
// from the `binvenio-bridge` collaborators.

pub mod capability;
pub mod connection;
pub mod discovery;
pub mod frame;
pub mod handshake;
pub mod label_client;
pub mod link;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::Connection;
pub use discovery::{CancelToken, ScanHandle, Scanner};
pub use frame::{ByteSource, ByteStream, FrameError, FrameReader};
pub use link::PrinterLink;
