// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciler (C6, spec §4.6).
//!
//! Runs at startup and on a periodic tick, aligning catalog state with
//! the actual container runtime. The reconciler's writes are the
//! authoritative source of truth when they disagree with cached state.

use std::sync::Arc;

use tracing::{info, warn};

use vea_core::app::{AppId, Application, ApplicationStatus};
use vea_core::clock::Clock;
use vea_core::execution::{Execution, RuntimeState};
use vea_driver::{ContainerDriver, ContainerHandle, ContainerStatus};
use vea_storage::Catalog;

/// Label value identifying containers owned by this runtime, used both
/// to tag newly created containers and to discover orphans.
pub fn runtime_label(runtime_id: &str) -> String {
    format!("runtime={runtime_id}")
}

pub struct Reconciler {
    catalog: Catalog,
    driver: Arc<dyn ContainerDriver>,
    clock: Arc<dyn Clock>,
    runtime_id: String,
}

impl Reconciler {
    pub fn new(catalog: Catalog, driver: Arc<dyn ContainerDriver>, clock: Arc<dyn Clock>, runtime_id: String) -> Self {
        Self { catalog, driver, clock, runtime_id }
    }

    /// One reconciliation pass: align every `running`/`paused` Application
    /// with its Execution's actual container state, then prune orphaned
    /// containers bearing this runtime's label with no matching row.
    pub async fn run_once(&self) {
        for app in self.catalog.list_applications() {
            if !matches!(app.status, ApplicationStatus::Running | ApplicationStatus::Paused) {
                continue;
            }
            self.reconcile_application(app).await;
        }
        self.prune_orphans().await;
    }

    async fn reconcile_application(&self, app: Application) {
        let Some(execution) = self.catalog.get_execution_by_app(app.app_id) else {
            warn!(app_id = %app.app_id, "running application has no execution record, marking error");
            self.mark_error(app.app_id, -1);
            return;
        };

        let handle = ContainerHandle(execution.handle.clone());
        let inspect = match self.driver.inspect(&handle).await {
            Ok(result) => result,
            Err(_) => {
                info!(app_id = %app.app_id, "container missing at reconcile, marking error");
                self.mark_terminal(app.app_id, execution, RuntimeState::Error, Some(-1));
                return;
            }
        };

        match inspect.status {
            ContainerStatus::Missing => {
                info!(app_id = %app.app_id, "container missing at reconcile, marking error");
                self.mark_terminal(app.app_id, execution, RuntimeState::Error, Some(-1));
            }
            ContainerStatus::Exited => {
                let exit_code = inspect.exit_code.unwrap_or(-1);
                let state = if exit_code == 0 { RuntimeState::Stopped } else { RuntimeState::Error };
                info!(app_id = %app.app_id, exit_code, "container exited, reconciling terminal state");
                self.mark_terminal(app.app_id, execution, state, Some(exit_code as i32));
            }
            ContainerStatus::Paused => {
                self.confirm_state(app.app_id, execution, ApplicationStatus::Paused, RuntimeState::Paused);
            }
            ContainerStatus::Running => {
                self.confirm_state(app.app_id, execution, ApplicationStatus::Running, RuntimeState::Running);
            }
        }
    }

    fn confirm_state(
        &self,
        app_id: AppId,
        mut execution: Execution,
        app_status: ApplicationStatus,
        runtime_state: RuntimeState,
    ) {
        execution.runtime_state = runtime_state;
        execution.last_heartbeat_ms = self.clock.epoch_ms();
        let _ = self.catalog.upsert_execution(execution);

        if let Some(mut app) = self.catalog.get_application(app_id) {
            if app.status != app_status {
                app.status = app_status;
                app.updated_at_ms = self.clock.epoch_ms();
                app.revision += 1;
                let _ = self.catalog.update_application(app);
            }
        }
    }

    fn mark_terminal(&self, app_id: AppId, mut execution: Execution, state: RuntimeState, exit_code: Option<i32>) {
        execution.runtime_state = state;
        execution.exit_code = exit_code;
        execution.last_heartbeat_ms = self.clock.epoch_ms();
        let _ = self.catalog.upsert_execution(execution);

        let status = if state == RuntimeState::Stopped { ApplicationStatus::Stopped } else { ApplicationStatus::Error };
        if let Some(mut app) = self.catalog.get_application(app_id) {
            app.status = status;
            app.updated_at_ms = self.clock.epoch_ms();
            app.revision += 1;
            let _ = self.catalog.update_application(app);
        }
    }

    fn mark_error(&self, app_id: AppId, exit_code: i32) {
        if let Some(mut app) = self.catalog.get_application(app_id) {
            app.status = ApplicationStatus::Error;
            app.updated_at_ms = self.clock.epoch_ms();
            app.revision += 1;
            let _ = self.catalog.update_application(app);
        }
        let _ = exit_code;
    }

    async fn prune_orphans(&self) {
        let label = runtime_label(&self.runtime_id);
        let Ok(containers) = self.driver.list_by_label(&label).await else {
            return;
        };
        for container in containers {
            let Some(app_id_label) = container.labels.get("appId") else { continue };
            let app_id = AppId::from_string(app_id_label);
            if self.catalog.get_application(app_id).is_none() {
                info!(app_id = %app_id, container = %container.name, "removing orphaned container");
                let _ = self.driver.remove(&ContainerHandle(container.name.clone()), true).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
