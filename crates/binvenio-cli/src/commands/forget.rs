// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::process::ExitCode;

use super::Session;

pub fn forget(session: &Session) -> ExitCode {
    let link = session.link();
    match link.cached_address() {
        Some(addr) => {
            link.forget();
            println!("Forgot printer at {addr}.");
        }
        None => println!("No printer remembered."),
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use binvenio_bridge::{AddressCache, FileAddressCache, HostNetwork};
    use binvenio_core::config::LinkConfig;
    use binvenio_core::types::PrinterAddress;

    #[test]
    fn forget_clears_the_remembered_printer() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(FileAddressCache::open(dir.path().join("printer.json")));
        cache.set(Some("192.168.1.40".parse::<PrinterAddress>().unwrap()));
        let session = Session {
            network: Arc::new(HostNetwork::new(None)),
            cache: cache.clone(),
            config: LinkConfig::default(),
            config_path: dir.path().join("config.json"),
        };

        forget(&session);
        assert_eq!(cache.get(), None);
        assert!(!cache.path().exists());

        // Nothing left to forget is still fine.
        forget(&session);
        assert_eq!(cache.get(), None);
    }
}
