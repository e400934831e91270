// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::app::{AppId, Application};
use crate::dependency::Dependency;
use crate::event::CatalogEvent;
use crate::execution::{Execution, ExecutionId};
use crate::log_record::{LogRecord, LogStream, Severity};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::app::ApplicationStatus;
    use crate::execution::RuntimeState;
    use proptest::prelude::*;

    pub fn arb_application_status() -> impl Strategy<Value = ApplicationStatus> {
        prop_oneof![
            Just(ApplicationStatus::Installing),
            Just(ApplicationStatus::Installed),
            Just(ApplicationStatus::Starting),
            Just(ApplicationStatus::Running),
            Just(ApplicationStatus::Paused),
            Just(ApplicationStatus::Stopped),
            Just(ApplicationStatus::Error),
            Just(ApplicationStatus::Uninstalling),
        ]
    }

    pub fn arb_runtime_state() -> impl Strategy<Value = RuntimeState> {
        prop_oneof![
            Just(RuntimeState::Running),
            Just(RuntimeState::Paused),
            Just(RuntimeState::Stopped),
            Just(RuntimeState::Error),
        ]
    }
}

// ── Event factory functions ─────────────────────────────────────────────────

pub fn application_put_event(app_id: &str) -> CatalogEvent {
    CatalogEvent::ApplicationPut {
        app: Application::builder().app_id(AppId::from_string(app_id)).build(),
    }
}

pub fn application_deleted_event(app_id: &str) -> CatalogEvent {
    CatalogEvent::ApplicationDeleted { app_id: AppId::from_string(app_id) }
}

pub fn execution_put_event(app_id: &str, execution_id: &str) -> CatalogEvent {
    CatalogEvent::ExecutionPut {
        execution: Execution::builder()
            .app_id(AppId::from_string(app_id))
            .execution_id(ExecutionId::from_string(execution_id))
            .build(),
    }
}

pub fn log_appended_event(app_id: &str, seq: u64, line: &str) -> CatalogEvent {
    CatalogEvent::LogAppended {
        record: LogRecord {
            app_id: AppId::from_string(app_id),
            execution_id: None,
            stream: LogStream::Stdout,
            severity: Severity::Info,
            timestamp_ms: 1_000_000,
            seq,
            payload: line.as_bytes().to_vec(),
        },
    }
}

pub fn dependency_put_event(app_id: &str, name: &str) -> CatalogEvent {
    CatalogEvent::DependencyPut {
        dependency: Dependency {
            app_id: AppId::from_string(app_id),
            ecosystem: crate::dependency::Ecosystem::Pip,
            name: name.to_string(),
            version: None,
            status: crate::dependency::InstallStatus::Declared,
            error: None,
        },
    }
}
