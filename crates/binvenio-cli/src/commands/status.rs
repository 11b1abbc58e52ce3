// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::process::ExitCode;

use super::Session;

pub fn status(session: &Session) -> ExitCode {
    match session.network.active_network() {
        Some(handle) => match handle.local_ip {
            Some(ip) => println!("Network:  up, sending from {ip}"),
            None => println!("Network:  up"),
        },
        None => println!("Network:  no wireless connectivity"),
    }

    match session.cache.entry() {
        Some(cached) => println!(
            "Printer:  {} (since {})",
            cached.address,
            cached.stored_at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => println!("Printer:  none remembered"),
    }

    let [a, b, c] = session.config.subnet;
    println!(
        "Search:   {a}.{b}.{c}.{}-{} port {}",
        session.config.first_host, session.config.last_host, session.config.discovery_port
    );
    println!("Settings: {}", session.config_path.display());
    println!("Memory:   {}", session.cache.path().display());
    ExitCode::SUCCESS
}
