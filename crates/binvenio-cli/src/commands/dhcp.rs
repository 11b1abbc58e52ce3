// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::process::ExitCode;

use binvenio_core::error::LinkError;
use binvenio_core::human_errors::dhcp_warning;
use binvenio_core::types::PrinterAddress;

use super::{Session, report};

pub async fn dhcp(session: &Session, address: Option<PrinterAddress>) -> anyhow::Result<ExitCode> {
    let link = session.link();

    let Some(addr) = address.or_else(|| link.cached_address()) else {
        report(&LinkError::NoPrinterCached);
        return Ok(ExitCode::FAILURE);
    };
    if !link.has_network() {
        report(&LinkError::NoNetwork);
        return Ok(ExitCode::FAILURE);
    }

    let status = link.query_dhcp(addr).await;
    println!("{addr}: {}", dhcp_warning(status));
    Ok(ExitCode::SUCCESS)
}
