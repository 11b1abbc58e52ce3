// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw label submission.
//
// Each print opens a fresh connection and re-identifies the printer first: a
// cached address may now belong to something else on the network. The label
// itself is sent verbatim. The payload is expected to make the printer answer
// with a confirmation line, and only that exact line counts as success.

use tracing::{info, warn};

use binvenio_bridge::NetworkAccess;
use binvenio_core::config::LinkConfig;
use binvenio_core::error::{LinkError, Result};
use binvenio_core::types::{AttemptId, PrinterAddress};

use crate::connection::Connection;
use crate::frame::FrameReader;
use crate::handshake;

/// Line the printer sends back once the label is printed.
pub const PRINT_CONFIRMATION: &str = "OK:printed";

/// Send `payload` to the printer at `addr` and wait for its confirmation.
pub async fn send_label(
    network: &dyn NetworkAccess,
    config: &LinkConfig,
    addr: PrinterAddress,
    payload: &[u8],
) -> Result<()> {
    let attempt = AttemptId::new();
    info!(attempt = %attempt, addr = %addr, bytes = payload.len(), "printing label");

    let opened = Connection::open(
        network,
        addr,
        config.connect_timeout(),
        config.handshake_timeout(),
    )
    .await;
    let mut conn = match opened {
        Ok(conn) => conn,
        // Once an attempt is under way a missing network is just another
        // printer we could not reach.
        Err(LinkError::NoNetwork) => {
            warn!(attempt = %attempt, addr = %addr, "no active network for print");
            return Err(LinkError::ConnectFailed {
                addr,
                reason: "no active network".into(),
            });
        }
        Err(e) => {
            warn!(attempt = %attempt, addr = %addr, error = %e, "print failed");
            return Err(e);
        }
    };
    let result = print_on(&mut conn, config, payload).await;
    conn.close().await;

    match &result {
        Ok(()) => info!(attempt = %attempt, addr = %addr, "label printed"),
        Err(e) => warn!(attempt = %attempt, addr = %addr, error = %e, "print failed"),
    }
    result
}

async fn print_on(conn: &mut Connection, config: &LinkConfig, payload: &[u8]) -> Result<()> {
    handshake::identify(conn, config).await?;

    // Printing takes far longer than answering a query.
    conn.set_read_timeout(config.print_timeout());
    conn.send(payload).await?;

    let reply = conn.receive_text(FrameReader::Line).await?;
    if reply == PRINT_CONFIRMATION {
        Ok(())
    } else {
        Err(LinkError::PrintRejected {
            addr: conn.address(),
            reply,
        })
    }
}
