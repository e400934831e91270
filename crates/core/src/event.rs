// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CatalogEvent: the write-ahead log's unit of durable fact.
//!
//! One variant per Catalog mutation. Replaying the full event sequence in
//! order reconstructs the catalog's `MaterializedState` exactly — each
//! event carries a full entity snapshot rather than a diff/patch, so
//! replay never depends on prior in-memory state beyond the fold itself.

use crate::app::{AppId, Application};
use crate::dependency::Dependency;
use crate::execution::Execution;
use crate::log_record::LogRecord;
use serde::{Deserialize, Serialize};

/// Events that mutate the Catalog Store.
///
/// Serializes as `{"type": "event:name", ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CatalogEvent {
    #[serde(rename = "application:put")]
    ApplicationPut { app: Application },

    #[serde(rename = "application:deleted")]
    ApplicationDeleted { app_id: AppId },

    #[serde(rename = "execution:put")]
    ExecutionPut { execution: Execution },

    #[serde(rename = "log:appended")]
    LogAppended { record: LogRecord },

    #[serde(rename = "dependency:put")]
    DependencyPut { dependency: Dependency },
}

impl CatalogEvent {
    /// Short tag for tracing/log lines, mirroring each variant's wire tag.
    pub fn name(&self) -> &'static str {
        match self {
            CatalogEvent::ApplicationPut { .. } => "application:put",
            CatalogEvent::ApplicationDeleted { .. } => "application:deleted",
            CatalogEvent::ExecutionPut { .. } => "execution:put",
            CatalogEvent::LogAppended { .. } => "log:appended",
            CatalogEvent::DependencyPut { .. } => "dependency:put",
        }
    }
}

/// Domain events broadcast to subscribers (Output Pipeline, Dispatcher)
/// after a catalog write lands. Distinct from `CatalogEvent`: these are
/// in-memory fan-out notifications, never persisted on their own (the
/// corresponding `CatalogEvent` already captured the durable fact).
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    ApplicationStateChanged { app_id: AppId, status: crate::app::ApplicationStatus },
    ConsoleOutput { record: LogRecord },
    SignalUpdate { path: String, value: serde_json::Value },
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
