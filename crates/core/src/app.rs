// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application: the durable record of a deployable unit.

use crate::dependency::DependencyDecl;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

crate::define_id! {
    /// Caller-supplied, opaque, caller-unique identifier for an Application.
    pub struct AppId("app-");
}

/// What kind of payload an Application runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppKind {
    Script,
    Binary,
}

crate::simple_display! {
    AppKind {
        Script => "script",
        Binary => "binary",
    }
}

/// Lifecycle status of an Application, as recorded in the catalog.
///
/// `absent` (no catalog row) is represented by the row's non-existence,
/// not a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Installing,
    Installed,
    Starting,
    Running,
    Paused,
    Stopped,
    Error,
    Uninstalling,
}

crate::simple_display! {
    ApplicationStatus {
        Installing => "installing",
        Installed => "installed",
        Starting => "starting",
        Running => "running",
        Paused => "paused",
        Stopped => "stopped",
        Error => "error",
        Uninstalling => "uninstalling",
    }
}

/// Per-container resource caps. Defaults come from runtime configuration;
/// an Application may override any field at install time (spec §5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub memory_bytes: u64,
    /// CPU quota, microseconds granted per 100ms period.
    pub cpu_quota_us: u64,
    pub tmpfs_bytes: u64,
}

impl ResourceLimits {
    pub const DEFAULT_MEMORY_BYTES: u64 = 512 * 1024 * 1024;
    pub const DEFAULT_CPU_QUOTA_US: u64 = 50_000;
    pub const DEFAULT_TMPFS_BYTES: u64 = 100 * 1024 * 1024;
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            memory_bytes: Self::DEFAULT_MEMORY_BYTES,
            cpu_quota_us: Self::DEFAULT_CPU_QUOTA_US,
            tmpfs_bytes: Self::DEFAULT_TMPFS_BYTES,
        }
    }
}

/// The durable Application record (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub app_id: AppId,
    pub name: String,
    pub version: String,
    pub description: String,
    pub kind: AppKind,
    /// Stored source bytes, for `kind == Script`. Empty for `Binary`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<u8>,
    pub entry_point: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub cwd_hint: Option<PathBuf>,
    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,
    #[serde(default)]
    pub signal_interests: Vec<String>,
    pub status: ApplicationStatus,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
    pub last_start_ms: Option<u64>,
    /// Accumulated run time across all executions, in milliseconds.
    #[serde(default)]
    pub total_run_ms: u64,
    pub storage_path: PathBuf,
    #[serde(default)]
    pub resource_limits: ResourceLimits,
    /// Incremented on every `UpdateApplication`. The container-exit monitor
    /// reads it before an `await` and passes it back to
    /// `Catalog::compare_and_swap_application`, so a stale monitor can't
    /// overwrite state a foreground operation (e.g. uninstall, a fresh
    /// start) changed out from under it while it was waiting.
    #[serde(default)]
    pub revision: u64,
}

impl Application {
    /// True if the Application may be started (spec §4.4 Start transition guard).
    pub fn startable(&self) -> bool {
        matches!(
            self.status,
            ApplicationStatus::Installed | ApplicationStatus::Stopped | ApplicationStatus::Error
        )
    }
}

crate::builder! {
    pub struct ApplicationBuilder => Application {
        into {
            app_id: AppId = AppId::from_string("app-test000000000000000"),
            name: String = "test-app",
            version: String = "0.1.0",
            description: String = "",
            entry_point: String = "main.py",
            storage_path: PathBuf = "/tmp/vea/test-app",
        }
        set {
            kind: AppKind = AppKind::Script,
            args: Vec<String> = Vec::new(),
            env: HashMap<String, String> = HashMap::new(),
            dependencies: Vec<DependencyDecl> = Vec::new(),
            signal_interests: Vec<String> = Vec::new(),
            status: ApplicationStatus = ApplicationStatus::Installed,
            created_at_ms: u64 = 0,
            updated_at_ms: u64 = 0,
            total_run_ms: u64 = 0,
            resource_limits: ResourceLimits = ResourceLimits::default(),
            revision: u64 = 0,
            source: Vec<u8> = Vec::new(),
        }
        option {
            cwd_hint: PathBuf = None,
            last_start_ms: u64 = None,
        }
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
