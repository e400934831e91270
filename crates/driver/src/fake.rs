// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `ContainerDriver` for engine/reconciler tests, mirroring the
//! teacher's `FakeAdapter` test-support pattern.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::driver_trait::ContainerDriver;
use crate::error::DriverError;
use crate::spec::{
    AttachedStreams, ContainerHandle, ContainerSpec, ContainerStatus, InspectResult,
};

struct FakeContainer {
    spec: ContainerSpec,
    status: ContainerStatus,
    exit_code: Option<i64>,
}

#[derive(Default)]
pub struct FakeDriver {
    containers: Mutex<HashMap<ContainerHandle, FakeContainer>>,
    images: Mutex<Vec<String>>,
    next_id: Mutex<u64>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: force a container to its exited state with `exit_code`,
    /// simulating a process that terminated on its own.
    pub fn simulate_exit(&self, handle: &ContainerHandle, exit_code: i64) {
        if let Some(container) = self.containers.lock().get_mut(handle) {
            container.status = ContainerStatus::Exited;
            container.exit_code = Some(exit_code);
        }
    }

    fn name_in_use(&self, name: &str) -> bool {
        self.containers.lock().values().any(|c| {
            c.spec.name == name && !matches!(c.status, ContainerStatus::Missing)
        })
    }
}

#[async_trait]
impl ContainerDriver for FakeDriver {
    async fn ensure_image(&self, image_ref: &str) -> Result<(), DriverError> {
        let mut images = self.images.lock();
        if !images.iter().any(|i| i == image_ref) {
            images.push(image_ref.to_string());
        }
        Ok(())
    }

    async fn create(&self, spec: ContainerSpec) -> Result<ContainerHandle, DriverError> {
        if self.name_in_use(&spec.name) {
            return Err(DriverError::Conflict(spec.name.clone()));
        }
        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let handle = ContainerHandle(format!("fake-{}", *next_id));
        self.containers.lock().insert(
            handle.clone(),
            FakeContainer { spec, status: ContainerStatus::Exited, exit_code: None },
        );
        Ok(handle)
    }

    async fn start(&self, handle: &ContainerHandle) -> Result<(), DriverError> {
        let mut containers = self.containers.lock();
        let container = containers
            .get_mut(handle)
            .ok_or_else(|| DriverError::NotFound(handle.to_string()))?;
        container.status = ContainerStatus::Running;
        container.exit_code = None;
        Ok(())
    }

    async fn stop(&self, handle: &ContainerHandle, _graceful_timeout: Duration) -> Result<(), DriverError> {
        let mut containers = self.containers.lock();
        let container = containers
            .get_mut(handle)
            .ok_or_else(|| DriverError::NotFound(handle.to_string()))?;
        container.status = ContainerStatus::Exited;
        container.exit_code.get_or_insert(0);
        Ok(())
    }

    async fn pause(&self, handle: &ContainerHandle) -> Result<(), DriverError> {
        let mut containers = self.containers.lock();
        let container = containers
            .get_mut(handle)
            .ok_or_else(|| DriverError::NotFound(handle.to_string()))?;
        container.status = ContainerStatus::Paused;
        Ok(())
    }

    async fn resume(&self, handle: &ContainerHandle) -> Result<(), DriverError> {
        let mut containers = self.containers.lock();
        let container = containers
            .get_mut(handle)
            .ok_or_else(|| DriverError::NotFound(handle.to_string()))?;
        container.status = ContainerStatus::Running;
        Ok(())
    }

    async fn remove(&self, handle: &ContainerHandle, _force: bool) -> Result<(), DriverError> {
        self.containers.lock().remove(handle);
        Ok(())
    }

    async fn attach(&self, handle: &ContainerHandle) -> Result<AttachedStreams, DriverError> {
        if !self.containers.lock().contains_key(handle) {
            return Err(DriverError::NotFound(handle.to_string()));
        }
        let (_stdout_tx, stdout_rx) = tokio::sync::mpsc::channel(1);
        let (_stderr_tx, stderr_rx) = tokio::sync::mpsc::channel(1);
        Ok(AttachedStreams { stdout: stdout_rx, stderr: stderr_rx })
    }

    async fn wait(&self, handle: &ContainerHandle) -> Result<i64, DriverError> {
        loop {
            if let Some(code) = self.containers.lock().get(handle).and_then(|c| c.exit_code) {
                return Ok(code);
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    async fn inspect(&self, handle: &ContainerHandle) -> Result<InspectResult, DriverError> {
        let containers = self.containers.lock();
        let container = containers.get(handle).ok_or_else(|| DriverError::NotFound(handle.to_string()))?;
        Ok(InspectResult {
            status: container.status,
            exit_code: container.exit_code,
            started_at_ms: None,
            finished_at_ms: None,
            name: container.spec.name.clone(),
            labels: container.spec.labels.clone(),
            env: container.spec.env.iter().map(|(k, v)| format!("{k}={v}")).collect(),
        })
    }

    async fn list_by_label(&self, label: &str) -> Result<Vec<InspectResult>, DriverError> {
        let (key, value) = label.split_once('=').unwrap_or((label, ""));
        let containers = self.containers.lock();
        Ok(containers
            .values()
            .filter(|c| c.spec.labels.get(key).is_some_and(|v| value.is_empty() || v == value))
            .map(|c| InspectResult {
                status: c.status,
                exit_code: c.exit_code,
                started_at_ms: None,
                finished_at_ms: None,
                name: c.spec.name.clone(),
                labels: c.spec.labels.clone(),
                env: c.spec.env.iter().map(|(k, v)| format!("{k}={v}")).collect(),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
