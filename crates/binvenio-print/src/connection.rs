// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One TCP session with a candidate printer.
//
// The socket is bound to the active wireless interface before connecting, so
// a sweep of the printer's /24 never leaks out over another route. Reads are
// byte-at-a-time through a frame reader. The active read timeout bounds each
// byte and also the whole reply, so a device that trickles bytes cannot hold
// a connection open. Callers raise it for slow operations such as printing.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpSocket;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, trace};

use binvenio_bridge::NetworkAccess;
use binvenio_core::error::{LinkError, Result};
use binvenio_core::types::PrinterAddress;

use crate::frame::{ByteStream, FrameReader};

/// Open session with a printer.
///
/// Dropping the connection closes the socket; `close` does the same but also
/// sends FIN first. Either may happen any number of times.
pub struct Connection {
    addr: PrinterAddress,
    reader: Option<ByteStream<BufReader<OwnedReadHalf>>>,
    writer: Option<OwnedWriteHalf>,
}

impl Connection {
    /// Connect to `addr` over the currently active network.
    ///
    /// Fails with `NoNetwork` without touching a socket when no interface is
    /// active.
    pub async fn open(
        network: &dyn NetworkAccess,
        addr: PrinterAddress,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self> {
        let handle = network.active_network().ok_or(LinkError::NoNetwork)?;
        let connect_failed = |reason: String| LinkError::ConnectFailed { addr, reason };

        let socket = TcpSocket::new_v4().map_err(|e| connect_failed(e.to_string()))?;
        if let Some(local_ip) = handle.local_ip {
            socket
                .bind(SocketAddr::new(IpAddr::V4(local_ip), 0))
                .map_err(|e| connect_failed(format!("bind to {local_ip}: {e}")))?;
        }

        let stream = tokio::time::timeout(connect_timeout, socket.connect(addr.socket_addr()))
            .await
            .map_err(|_| {
                connect_failed(format!("timed out after {}ms", connect_timeout.as_millis()))
            })?
            .map_err(|e| connect_failed(e.to_string()))?;

        // Commands are tiny; do not let Nagle hold them back.
        let _ = stream.set_nodelay(true);
        debug!(addr = %addr, local = ?handle.local_ip, "connected");

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            addr,
            reader: Some(ByteStream::new(BufReader::new(read_half), read_timeout)),
            writer: Some(write_half),
        })
    }

    pub fn address(&self) -> PrinterAddress {
        self.addr
    }

    /// Change the per-read timeout for subsequent receives.
    pub fn set_read_timeout(&mut self, timeout: Duration) {
        if let Some(reader) = self.reader.as_mut() {
            reader.set_timeout(timeout);
        }
    }

    /// Write `bytes` and flush.
    ///
    /// Input left over from an earlier reply is discarded first, so the next
    /// receive starts at the reply to this command.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let addr = self.addr;
        if let Some(reader) = self.reader.as_mut() {
            let stale = reader.discard_pending().await;
            if stale > 0 {
                trace!(addr = %addr, stale, "discarded unread input");
            }
        }

        let writer = self.writer.as_mut().ok_or_else(|| LinkError::ConnectFailed {
            addr,
            reason: "connection closed".into(),
        })?;
        let send_failed = |e: std::io::Error| LinkError::ConnectFailed {
            addr,
            reason: format!("send failed: {e}"),
        };
        writer.write_all(bytes).await.map_err(send_failed)?;
        writer.flush().await.map_err(send_failed)?;
        trace!(addr = %addr, bytes = bytes.len(), "sent");
        Ok(())
    }

    /// Run exactly one frame reader over the incoming bytes.
    ///
    /// The complete frame must arrive within the active read timeout.
    /// Silence, a timeout, and a malformed frame all come back as
    /// `NoResponse`.
    pub async fn receive(&mut self, frame: FrameReader) -> Result<Vec<u8>> {
        let addr = self.addr;
        let reader = self.reader.as_mut().ok_or(LinkError::NoResponse(addr))?;
        let deadline = reader.timeout();
        let outcome = tokio::time::timeout(deadline, frame.read(reader)).await;
        match outcome {
            Ok(Ok(bytes)) => {
                trace!(addr = %addr, ?frame, bytes = bytes.len(), "received");
                Ok(bytes)
            }
            Ok(Err(e)) => {
                debug!(
                    addr = %addr,
                    ?frame,
                    error = %e,
                    timed_out = reader.timed_out(),
                    "no usable reply"
                );
                Err(LinkError::NoResponse(addr))
            }
            Err(_) => {
                debug!(
                    addr = %addr,
                    ?frame,
                    deadline_ms = deadline.as_millis() as u64,
                    "reply still incomplete at deadline"
                );
                Err(LinkError::NoResponse(addr))
            }
        }
    }

    /// `receive`, decoded as (lossy) UTF-8.
    pub async fn receive_text(&mut self, frame: FrameReader) -> Result<String> {
        let bytes = self.receive(frame).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Shut the socket down. Safe to call more than once.
    pub async fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.shutdown().await;
            debug!(addr = %self.addr, "closed");
        }
        self.reader = None;
    }
}
