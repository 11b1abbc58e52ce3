// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution.

use std::path::{Path, PathBuf};

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let base = base_dir(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    );
    let dir = base.join("binvenio");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Default settings file.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.json")
}

/// Where the last known-good printer is remembered.
pub fn printer_cache_path(dir: &Path) -> PathBuf {
    dir.join("printer.json")
}

fn base_dir(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg_data_home.filter(|p| p.is_absolute()) {
        return xdg;
    }
    if let Some(home) = home {
        return home.join(".local").join("share");
    }
    // Last resort
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        assert_eq!(
            base_dir(Some("/data".into()), Some("/home/op".into())),
            PathBuf::from("/data")
        );
    }

    #[test]
    fn relative_xdg_is_ignored() {
        assert_eq!(
            base_dir(Some("data".into()), Some("/home/op".into())),
            PathBuf::from("/home/op/.local/share")
        );
    }

    #[test]
    fn falls_back_to_temp() {
        assert_eq!(base_dir(None, None), std::env::temp_dir());
    }

    #[test]
    fn files_live_in_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(config_path(dir.path()), dir.path().join("config.json"));
        assert_eq!(printer_cache_path(dir.path()), dir.path().join("printer.json"));
    }
}
