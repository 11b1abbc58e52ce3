// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `binvenio print`: send a raw label to the printer.

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use tracing::info;

use binvenio_core::human_errors::describe_scan;
use binvenio_core::types::PrinterAddress;

use super::{Session, discover, report};

pub async fn print(
    session: &Session,
    file: &Path,
    address: Option<PrinterAddress>,
    discover_first: bool,
) -> anyhow::Result<ExitCode> {
    let payload =
        read_payload(file).with_context(|| format!("reading label from {}", file.display()))?;
    let link = session.link();

    if address.is_none() && discover_first && link.cached_address().is_none() {
        info!("no printer remembered, searching first");
        let result = discover::run_scan(&link).await;
        println!("{}", describe_scan(&result));
        if result.address().is_none() {
            return Ok(ExitCode::FAILURE);
        }
    }

    let outcome = match address {
        Some(addr) => link.print(addr, &payload).await,
        None => link.print_cached(&payload).await,
    };

    match outcome {
        Ok(()) => {
            println!("Printed {} bytes.", payload.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            report(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Read the label from `file`, or from stdin when `file` is `-`.
fn read_payload(file: &Path) -> std::io::Result<Vec<u8>> {
    if file == Path::new("-") {
        let mut payload = Vec::new();
        std::io::stdin().read_to_end(&mut payload)?;
        Ok(payload)
    } else {
        std::fs::read(file)
    }
}
