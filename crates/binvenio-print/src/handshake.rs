// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer identification.
//
// A candidate counts as a label printer only if it answers `~HI` with an
// STX/ETX-framed host identification. On the JetDirect port an office printer
// would happily swallow ZPL too, so there the device must first stay silent
// to a PJL `INFO ID` query.

use tracing::{debug, info};

use binvenio_core::config::LinkConfig;
use binvenio_core::error::{LinkError, Result};
use binvenio_core::types::{DeviceModel, MODEL_PREFIXES};

use crate::connection::Connection;
use crate::frame::FrameReader;

/// ZPL host identification.
pub const HOST_IDENTIFICATION: &[u8] = b"~HI\n";
/// PJL device identification; label printers ignore it.
pub const PJL_INFO_ID: &[u8] = b"@PJL INFO ID\n";

/// Confirm the device behind `conn` is a label printer and identify it.
///
/// `ForeignDevice` when the guard probe gets an answer; every other failure
/// is `HandshakeFailed`.
pub async fn identify(conn: &mut Connection, config: &LinkConfig) -> Result<DeviceModel> {
    let addr = conn.address();
    let failed = |e: LinkError| LinkError::HandshakeFailed {
        addr,
        reason: e.to_string(),
    };

    if addr.port == config.guard_port {
        conn.send(PJL_INFO_ID).await.map_err(failed)?;
        // Silence is the expected answer here.
        if let Ok(reply) = conn.receive_text(FrameReader::Line).await {
            if !reply.trim().is_empty() {
                info!(addr = %addr, reply = %reply.trim(), "device answered PJL, skipping");
                return Err(LinkError::ForeignDevice(addr));
            }
        }
    }

    conn.send(HOST_IDENTIFICATION).await.map_err(failed)?;
    let payload = conn.receive(FrameReader::Marked).await.map_err(failed)?;

    let model = classify(&payload, config.default_dots_per_mm);
    debug!(addr = %addr, model = %model, "identified");
    Ok(model)
}

/// Classify a `~HI` payload (`model,firmware,dots_per_mm,...`).
///
/// Unknown models are still printers; they just cannot be queried for
/// configuration.
pub fn classify(payload: &[u8], default_dots_per_mm: u32) -> DeviceModel {
    let text = String::from_utf8_lossy(payload);
    let mut fields = text.split(',').map(str::trim);

    let name = fields.next().unwrap_or_default();
    let upper = name.to_ascii_uppercase();
    let Some(family) = MODEL_PREFIXES
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
        .map(|(_, family)| *family)
    else {
        return DeviceModel::Unrecognized;
    };

    let firmware = fields
        .next()
        .filter(|f| !f.is_empty())
        .map(str::to_string);
    let dots_per_mm = fields
        .next()
        .and_then(|f| f.parse::<u32>().ok())
        .filter(|&d| d > 0)
        .unwrap_or(default_dots_per_mm);

    DeviceModel::Recognized {
        family,
        name: name.to_string(),
        firmware,
        dots_per_mm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePrinter, HI_GK420, HI_ZD410, StaticNetwork, fast_config};
    use binvenio_core::types::ModelFamily;
    use std::net::Ipv4Addr;

    async fn open(printer: &FakePrinter, config: &LinkConfig) -> Connection {
        Connection::open(
            &StaticNetwork::online(),
            printer.address(),
            config.connect_timeout(),
            config.handshake_timeout(),
        )
        .await
        .unwrap()
    }

    #[test]
    fn classifies_by_prefix_priority() {
        let zd4 = classify(b"ZD410-203dpi,V84.20.18Z,8,8192KB", 8);
        assert_eq!(zd4.family(), Some(ModelFamily::LinkOs));

        // ZD without 4/6 falls through to the legacy entry.
        let zd5 = classify(b"ZD500R,V74.19.6Z,12,8176KB", 8);
        assert_eq!(zd5.family(), Some(ModelFamily::LegacyZpl));
        assert_eq!(zd5.dots_per_mm(), 12);

        assert_eq!(classify(b"zq520,V76", 8).family(), Some(ModelFamily::LinkOs));
        assert_eq!(classify(b"TLP 2844,V4", 8).family(), Some(ModelFamily::LegacyZpl));
    }

    #[test]
    fn extracts_firmware_and_resolution() {
        assert_eq!(
            classify(b"GK420d,V61.17.17Z,8,8176KB", 12),
            DeviceModel::Recognized {
                family: ModelFamily::LegacyZpl,
                name: "GK420d".into(),
                firmware: Some("V61.17.17Z".into()),
                dots_per_mm: 8,
            }
        );
    }

    #[test]
    fn missing_resolution_uses_default() {
        assert_eq!(classify(b"ZT410", 12).dots_per_mm(), 12);
        assert_eq!(classify(b"ZT410,V1,abc", 12).dots_per_mm(), 12);
        assert_eq!(classify(b"ZT410,V1,0", 12).dots_per_mm(), 12);
    }

    #[test]
    fn unknown_models_are_unrecognized() {
        assert_eq!(classify(b"QLn320,V68", 8), DeviceModel::Unrecognized);
        assert_eq!(classify(b"", 8), DeviceModel::Unrecognized);
    }

    #[tokio::test]
    async fn identifies_a_printer() {
        let printer = FakePrinter::zebra(HI_ZD410).start(Ipv4Addr::LOCALHOST).await;
        let config = fast_config();
        let mut conn = open(&printer, &config).await;

        let model = identify(&mut conn, &config).await.unwrap();
        assert_eq!(model.family(), Some(ModelFamily::LinkOs));
        assert_eq!(printer.received(), HOST_IDENTIFICATION);
    }

    #[tokio::test]
    async fn unframed_reply_fails_the_handshake() {
        let printer = FakePrinter::zebra(b"ZD410-203dpi,V84\r\n")
            .start(Ipv4Addr::LOCALHOST)
            .await;
        let config = fast_config();
        let mut conn = open(&printer, &config).await;

        assert!(matches!(
            identify(&mut conn, &config).await,
            Err(LinkError::HandshakeFailed { .. })
        ));
    }

    #[tokio::test]
    async fn guard_port_rejects_devices_answering_pjl() {
        let printer = FakePrinter::zebra(HI_GK420)
            .reply(PJL_INFO_ID, b"@PJL INFO ID\r\n\"HP LaserJet 400\"\r\n\x0c")
            .start(Ipv4Addr::LOCALHOST)
            .await;
        let config = LinkConfig {
            guard_port: printer.address().port,
            ..fast_config()
        };
        let mut conn = open(&printer, &config).await;

        assert!(matches!(
            identify(&mut conn, &config).await,
            Err(LinkError::ForeignDevice(_))
        ));
        // ~HI never goes out to a foreign device.
        assert_eq!(printer.received(), PJL_INFO_ID);
    }

    #[tokio::test]
    async fn guard_port_accepts_silent_printers() {
        let printer = FakePrinter::zebra(HI_GK420).start(Ipv4Addr::LOCALHOST).await;
        let config = LinkConfig {
            guard_port: printer.address().port,
            ..fast_config()
        };
        let mut conn = open(&printer, &config).await;

        let model = identify(&mut conn, &config).await.unwrap();
        assert_eq!(model.family(), Some(ModelFamily::LegacyZpl));
    }
}
