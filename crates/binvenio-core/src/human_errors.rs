// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for printer link failures.
//
// Discovery failures and print failures are worded differently on purpose:
// a user who sees "Print failed" knows the next print will search again,
// while "No printer found" means nothing answered at all.

use crate::error::LinkError;
use crate::types::{DhcpStatus, ScanResult};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Timeout or a busy printer; trying again may work.
    Transient,
    /// The user must do something (join Wi-Fi, power the printer on).
    ActionRequired,
    /// Settings are wrong; retrying will not help.
    Permanent,
}

/// A plain-English message with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `LinkError` into something a user can act on.
pub fn humanize_error(err: &LinkError) -> HumanError {
    match err {
        LinkError::NoNetwork => HumanError {
            message: "No wireless connectivity.".into(),
            suggestion: "Connect this device to the same Wi-Fi network as the printer.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LinkError::ConnectFailed { .. }
        | LinkError::HandshakeFailed { .. }
        | LinkError::ForeignDevice(_)
        | LinkError::NoResponse(_) => HumanError {
            message: "Print failed.".into(),
            suggestion: "The printer did not answer. The next print will search for it again."
                .into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LinkError::PrintRejected { reply, .. } => HumanError {
            message: "Print failed.".into(),
            suggestion: format!(
                "The printer refused the label. Check paper and ribbon, then try again. (Reply: {reply})"
            ),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        LinkError::NoPrinterCached => HumanError {
            message: "Need to find the printer first.".into(),
            suggestion: "Run a printer search, then print again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LinkError::Config(detail) => HumanError {
            message: "The printer settings are invalid.".into(),
            suggestion: format!("Fix the settings file and try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        LinkError::Io(_) | LinkError::Serialization(_) => HumanError {
            message: "Saved printer settings could not be read.".into(),
            suggestion: "Delete the saved settings and search for the printer again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// One-line summary of a finished discovery sweep.
pub fn describe_scan(result: &ScanResult) -> String {
    match result {
        ScanResult::Found {
            address,
            model,
            dhcp,
        } => {
            let mut text = format!("Found {model} at {address}.");
            if let Some(status) = dhcp.filter(DhcpStatus::should_warn) {
                text.push(' ');
                text.push_str(dhcp_warning(status));
            }
            text
        }
        ScanResult::NotFound => "No printer found.".into(),
        ScanResult::NoNetwork => "No wireless connectivity.".into(),
        ScanResult::Cancelled => "Printer search cancelled.".into(),
    }
}

/// Warning shown when the printer's address may change under us.
pub fn dhcp_warning(status: DhcpStatus) -> &'static str {
    match status {
        DhcpStatus::Enabled => {
            "The printer gets its address from DHCP, so it may move. Give it a permanent address."
        }
        DhcpStatus::Unknown => {
            "Could not tell whether the printer has a permanent address. If printing stops working, search again."
        }
        DhcpStatus::Disabled => "The printer has a permanent address.",
    }
}
