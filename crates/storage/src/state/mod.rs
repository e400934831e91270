// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory projection of the catalog, rebuilt by folding the write-ahead
//! log (and, on startup, a prior snapshot plus the WAL tail) in order.

use std::collections::HashMap;

use vea_core::app::{AppId, Application};
use vea_core::dependency::Dependency;
use vea_core::event::CatalogEvent;
use vea_core::execution::{Execution, ExecutionId};
use vea_core::log_record::LogRecord;

/// Maximum LogRecords retained per Application. Oldest records are
/// dropped first; the cap is configurable via `Catalog::open`'s
/// `log_retention` parameter and defaults to this value.
pub const DEFAULT_LOG_RETENTION: usize = 10_000;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct MaterializedState {
    pub applications: HashMap<AppId, Application>,
    pub executions_by_app: HashMap<AppId, Execution>,
    pub executions_by_id: HashMap<ExecutionId, AppId>,
    pub logs: HashMap<AppId, Vec<LogRecord>>,
    pub dependencies: HashMap<AppId, Vec<Dependency>>,
    #[serde(skip)]
    pub log_retention: usize,
}

impl MaterializedState {
    pub fn new(log_retention: usize) -> Self {
        Self { log_retention, ..Default::default() }
    }

    /// Folds one durable event into the projection. Infallible: events are
    /// only ever produced by a Catalog write that already validated the
    /// mutation, so applying them cannot fail.
    pub fn apply(&mut self, event: &CatalogEvent) {
        match event {
            CatalogEvent::ApplicationPut { app } => {
                self.applications.insert(app.app_id, app.clone());
            }
            CatalogEvent::ApplicationDeleted { app_id } => {
                self.applications.remove(app_id);
                if let Some(execution) = self.executions_by_app.remove(app_id) {
                    self.executions_by_id.remove(&execution.execution_id);
                }
                self.logs.remove(app_id);
                self.dependencies.remove(app_id);
            }
            CatalogEvent::ExecutionPut { execution } => {
                self.executions_by_id.insert(execution.execution_id, execution.app_id);
                self.executions_by_app.insert(execution.app_id, execution.clone());
            }
            CatalogEvent::LogAppended { record } => {
                let records = self.logs.entry(record.app_id).or_default();
                records.push(record.clone());
                if records.len() > self.log_retention.max(1) {
                    let overflow = records.len() - self.log_retention.max(1);
                    records.drain(..overflow);
                }
            }
            CatalogEvent::DependencyPut { dependency } => {
                let deps = self.dependencies.entry(dependency.app_id).or_default();
                if let Some(existing) =
                    deps.iter_mut().find(|d| d.name == dependency.name && d.ecosystem == dependency.ecosystem)
                {
                    *existing = dependency.clone();
                } else {
                    deps.push(dependency.clone());
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
