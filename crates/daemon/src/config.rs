// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration (spec §6). Loaded from a TOML file with
//! `VEA_`-prefixed environment variable overrides for each key, mirroring
//! the teacher's `OJ_`-prefixed `daemon::env` convention.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use vea_core::app::ResourceLimits;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a data directory; set VEA_DATA_DIR")]
    NoDataDir,
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidEnvOverride { key: &'static str, value: String },
}

/// On-disk representation of `config.toml`; every field is optional so a
/// partial file layers on top of the built-in defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    port: Option<u16>,
    health_port: Option<u16>,
    data_dir: Option<PathBuf>,
    container_image_script: Option<String>,
    container_image_binary: Option<String>,
    default_memory_bytes: Option<u64>,
    default_cpu_quota: Option<u64>,
    reconciler_interval_seconds: Option<u64>,
    log_retention_per_app: Option<usize>,
    signal_gateway_host: Option<String>,
    signal_gateway_port: Option<u16>,
    signal_gateway_enabled: Option<bool>,
    fleet_client_url: Option<String>,
    fleet_client_enabled: Option<bool>,
}

/// Recognized configuration keys (spec §6), resolved from a TOML file and
/// then overridden by `VEA_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub health_port: u16,
    pub data_dir: PathBuf,
    pub container_image_script: String,
    pub container_image_binary: String,
    pub default_resource_limits: ResourceLimits,
    pub reconciler_interval: Duration,
    /// Per-`(appId, stream)` log record retention, applied to the
    /// Catalog's materialized log index.
    pub log_retention_per_app: usize,
    pub signal_gateway_host: String,
    pub signal_gateway_port: u16,
    pub signal_gateway_enabled: bool,
    pub fleet_client_url: Option<String>,
    pub fleet_client_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 7070,
            health_port: 7071,
            data_dir: PathBuf::from("/var/lib/vea"),
            container_image_script: "vea-script-runtime:latest".to_string(),
            container_image_binary: "vea-binary-runtime:latest".to_string(),
            default_resource_limits: ResourceLimits::default(),
            reconciler_interval: Duration::from_secs(10),
            log_retention_per_app: vea_storage::DEFAULT_LOG_RETENTION,
            signal_gateway_host: "127.0.0.1".to_string(),
            signal_gateway_port: 0,
            signal_gateway_enabled: false,
            fleet_client_url: None,
            fleet_client_enabled: false,
        }
    }
}

impl Config {
    /// Loads the TOML file at `path` (if it exists), layers built-in
    /// defaults underneath, then applies `VEA_*` environment overrides.
    /// The data directory itself resolves via [`crate::env::data_dir`]
    /// unless overridden by the file or `VEA_DATA_DIR`.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self { data_dir: crate::env::data_dir()?, ..Self::default() };

        if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
            let file: ConfigFile = toml::from_str(&raw).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
            config.apply_file(file);
        }

        config.apply_env()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(v) = file.port {
            self.port = v;
        }
        if let Some(v) = file.health_port {
            self.health_port = v;
        }
        if let Some(v) = file.data_dir {
            self.data_dir = v;
        }
        if let Some(v) = file.container_image_script {
            self.container_image_script = v;
        }
        if let Some(v) = file.container_image_binary {
            self.container_image_binary = v;
        }
        if let Some(v) = file.default_memory_bytes {
            self.default_resource_limits.memory_bytes = v;
        }
        if let Some(v) = file.default_cpu_quota {
            self.default_resource_limits.cpu_quota_us = v;
        }
        if let Some(v) = file.reconciler_interval_seconds {
            self.reconciler_interval = Duration::from_secs(v);
        }
        if let Some(v) = file.log_retention_per_app {
            self.log_retention_per_app = v;
        }
        if let Some(v) = file.signal_gateway_host {
            self.signal_gateway_host = v;
        }
        if let Some(v) = file.signal_gateway_port {
            self.signal_gateway_port = v;
        }
        if let Some(v) = file.signal_gateway_enabled {
            self.signal_gateway_enabled = v;
        }
        if let Some(v) = file.fleet_client_url {
            self.fleet_client_url = Some(v);
        }
        if let Some(v) = file.fleet_client_enabled {
            self.fleet_client_enabled = v;
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(v) = parse_env::<u16>("VEA_PORT")? {
            self.port = v;
        }
        if let Some(v) = parse_env::<u16>("VEA_HEALTH_PORT")? {
            self.health_port = v;
        }
        if let Ok(v) = std::env::var("VEA_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("VEA_CONTAINER_IMAGE_SCRIPT") {
            self.container_image_script = v;
        }
        if let Ok(v) = std::env::var("VEA_CONTAINER_IMAGE_BINARY") {
            self.container_image_binary = v;
        }
        if let Some(v) = parse_env::<u64>("VEA_DEFAULT_MEMORY_BYTES")? {
            self.default_resource_limits.memory_bytes = v;
        }
        if let Some(v) = parse_env::<u64>("VEA_DEFAULT_CPU_QUOTA")? {
            self.default_resource_limits.cpu_quota_us = v;
        }
        if let Some(v) = parse_env::<u64>("VEA_RECONCILER_INTERVAL_SECONDS")? {
            self.reconciler_interval = Duration::from_secs(v);
        }
        if let Some(v) = parse_env::<usize>("VEA_LOG_RETENTION_PER_APP")? {
            self.log_retention_per_app = v;
        }
        if let Ok(v) = std::env::var("VEA_SIGNAL_GATEWAY_HOST") {
            self.signal_gateway_host = v;
        }
        if let Some(v) = parse_env::<u16>("VEA_SIGNAL_GATEWAY_PORT")? {
            self.signal_gateway_port = v;
        }
        if let Some(v) = parse_env::<bool>("VEA_SIGNAL_GATEWAY_ENABLED")? {
            self.signal_gateway_enabled = v;
        }
        if let Ok(v) = std::env::var("VEA_FLEET_CLIENT_URL") {
            self.fleet_client_url = Some(v);
        }
        if let Some(v) = parse_env::<bool>("VEA_FLEET_CLIENT_ENABLED")? {
            self.fleet_client_enabled = v;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => {
            value.parse().map(Some).map_err(|_| ConfigError::InvalidEnvOverride { key, value })
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
