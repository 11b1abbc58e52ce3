// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DHCP configuration probe.
//
// Link-OS printers answer JSON SGD queries; older ZPL firmware only knows
// `! U1 getvar`. Either way the answer is best-effort: anything short of a
// clear reply is `Unknown`, and callers warn as if DHCP were on.

use serde_json::Value;
use tracing::debug;

use binvenio_core::error::Result;
use binvenio_core::types::{DeviceModel, DhcpStatus, ModelFamily};

use crate::connection::Connection;
use crate::frame::FrameReader;

/// JSON SGD query for the DHCP flag, preceded by the empty envelope
/// Link-OS expects.
pub const JSON_DHCP_QUERY: &[u8] = b"{}{\"ip.dhcp.enable\":null}\n";
/// Legacy query for the address acquisition protocol.
pub const GETVAR_IP_PROTOCOL: &[u8] = b"! U1 getvar \"ip.ip_protocol\"\r\n";

const DHCP_KEY: &str = "ip.dhcp.enable";

/// Ask the printer on `conn` whether it uses DHCP.
pub async fn query_dhcp(conn: &mut Connection, model: &DeviceModel) -> DhcpStatus {
    let status = match model.family() {
        Some(ModelFamily::LinkOs) => query_json(conn).await,
        Some(ModelFamily::LegacyZpl) => query_getvar(conn).await,
        None => Ok(DhcpStatus::Unknown),
    };

    let status = status.unwrap_or(DhcpStatus::Unknown);
    debug!(addr = %conn.address(), ?status, "DHCP probe finished");
    status
}

async fn query_json(conn: &mut Connection) -> Result<DhcpStatus> {
    conn.send(JSON_DHCP_QUERY).await?;
    let reply = conn.receive(FrameReader::BalancedObject).await?;
    Ok(interpret_json(&reply))
}

async fn query_getvar(conn: &mut Connection) -> Result<DhcpStatus> {
    conn.send(GETVAR_IP_PROTOCOL).await?;
    let reply = conn.receive(FrameReader::Quoted).await?;
    Ok(interpret_ip_protocol(&reply))
}

/// `{"ip.dhcp.enable":"on"}` means DHCP; any other string means static.
pub fn interpret_json(reply: &[u8]) -> DhcpStatus {
    let value: Value = match serde_json::from_slice(reply) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "unparseable JSON reply");
            return DhcpStatus::Unknown;
        }
    };

    match value.get(DHCP_KEY).and_then(Value::as_str) {
        Some("on") => DhcpStatus::Enabled,
        Some(_) => DhcpStatus::Disabled,
        None => DhcpStatus::Unknown,
    }
}

/// `permanent` is a static address; every other protocol (dhcp, bootp,
/// all, ...) can change it.
pub fn interpret_ip_protocol(value: &[u8]) -> DhcpStatus {
    if value == b"permanent" {
        DhcpStatus::Disabled
    } else {
        DhcpStatus::Enabled
    }
}
