// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution: one run of an Application.

use crate::app::{AppId, ResourceLimits};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Runtime-generated, globally unique, never reused identifier for a run.
    pub struct ExecutionId("exe-");
}

/// Runtime state of an Execution (spec §3). Distinct from `ApplicationStatus`:
/// an Execution's state tracks the container, not the Application record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeState {
    Running,
    Paused,
    Stopped,
    Error,
}

impl RuntimeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RuntimeState::Stopped | RuntimeState::Error)
    }
}

crate::simple_display! {
    RuntimeState {
        Running => "running",
        Paused => "paused",
        Stopped => "stopped",
        Error => "error",
    }
}

/// One run of an Application (spec §3). At most one non-terminal Execution
/// per Application (enforced by the catalog, not this type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub app_id: AppId,
    pub execution_id: ExecutionId,
    /// Opaque container-engine handle (a container ID or name), owned by
    /// the Container Driver and only referenced here.
    pub handle: String,
    pub runtime_state: RuntimeState,
    pub exit_code: Option<i32>,
    pub last_heartbeat_ms: u64,
    pub resource_limits: ResourceLimits,
    pub started_at_ms: u64,
}

crate::builder! {
    pub struct ExecutionBuilder => Execution {
        into {
            app_id: AppId = AppId::from_string("app-test000000000000000"),
            execution_id: ExecutionId = ExecutionId::from_string("exe-test000000000000000"),
            handle: String = "VEA-test",
        }
        set {
            runtime_state: RuntimeState = RuntimeState::Running,
            resource_limits: ResourceLimits = ResourceLimits::default(),
            last_heartbeat_ms: u64 = 0,
            started_at_ms: u64 = 0,
        }
        option {
            exit_code: i32 = None,
        }
    }
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
