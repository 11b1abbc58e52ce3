// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `binvenio discover`: sweep the subnet, remember what answers.

use std::process::ExitCode;

use binvenio_core::human_errors::describe_scan;
use binvenio_core::types::ScanResult;
use binvenio_print::PrinterLink;

use super::Session;

/// Exit status used when the user interrupts a search.
const EXIT_INTERRUPTED: u8 = 130;

pub async fn discover(session: &Session, no_dhcp: bool) -> anyhow::Result<ExitCode> {
    let mut config = session.config.clone();
    if no_dhcp {
        config.probe_dhcp_on_discovery = false;
    }

    let result = run_scan(&session.link_with(config)).await;
    println!("{}", describe_scan(&result));

    Ok(match result {
        ScanResult::Found { .. } => ExitCode::SUCCESS,
        ScanResult::Cancelled => ExitCode::from(EXIT_INTERRUPTED),
        ScanResult::NotFound | ScanResult::NoNetwork => ExitCode::FAILURE,
    })
}

/// Run a sweep with a progress line on stderr. Ctrl-C cancels it.
pub async fn run_scan(link: &PrinterLink) -> ScanResult {
    let mut handle = link.spawn_discovery();

    let cancel = handle.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut shown = false;
    while let Some(progress) = handle.progress.recv().await {
        eprint!(
            "\rSearching for printer... {:>3}%  {:<21}",
            progress.percent_complete,
            progress.candidate.to_string()
        );
        shown = true;
    }
    if shown {
        eprintln!();
    }

    interrupt.abort();
    handle.join().await
}
