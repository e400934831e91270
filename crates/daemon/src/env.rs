// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Resolve data directory: `VEA_DATA_DIR` > `XDG_STATE_HOME`/vea > `~/.local/state/vea`.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("VEA_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("vea"));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoDataDir)?;
    Ok(home.join(".local/state/vea"))
}

/// Path to the config TOML: `VEA_CONFIG_PATH`, or `<data_dir>/config.toml`.
pub fn config_path(data_dir: &std::path::Path) -> PathBuf {
    std::env::var("VEA_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| data_dir.join("config.toml"))
}
