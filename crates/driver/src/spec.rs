// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container creation spec and inspection result shared by every
//! `ContainerDriver` implementation (spec §4.2).

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Mount {
    pub source: String,
    pub target: String,
    pub read_only: bool,
}

#[derive(Debug, Clone)]
pub struct TmpfsMount {
    pub target: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceCaps {
    pub memory_bytes: u64,
    /// CPU quota, microseconds granted per 100ms period.
    pub cpu_quota_us: u64,
}

#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub working_dir: Option<String>,
    pub command: Vec<String>,
    pub env: HashMap<String, String>,
    pub mounts: Vec<Mount>,
    pub tmpfs: Vec<TmpfsMount>,
    pub resources: ResourceCaps,
    pub network_mode: String,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Running,
    Paused,
    Exited,
    Missing,
}

#[derive(Debug, Clone)]
pub struct InspectResult {
    pub status: ContainerStatus,
    pub exit_code: Option<i64>,
    pub started_at_ms: Option<u64>,
    pub finished_at_ms: Option<u64>,
    pub name: String,
    pub labels: HashMap<String, String>,
    pub env: Vec<String>,
}

/// Opaque handle to a created container, returned by `Create`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerHandle(pub String);

impl std::fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Halves of an attached container's standard streams.
pub struct AttachedStreams {
    pub stdout: tokio::sync::mpsc::Receiver<Vec<u8>>,
    pub stderr: tokio::sync::mpsc::Receiver<Vec<u8>>,
}
