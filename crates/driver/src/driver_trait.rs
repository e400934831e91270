// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ContainerDriver`: the thin, replaceable adapter over a local
//! container engine (spec §4.2).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverError;
use crate::spec::{AttachedStreams, ContainerHandle, ContainerSpec, InspectResult};

#[async_trait]
pub trait ContainerDriver: Send + Sync {
    /// Ensures `image_ref` is present locally, pulling it if absent.
    async fn ensure_image(&self, image_ref: &str) -> Result<(), DriverError>;

    async fn create(&self, spec: ContainerSpec) -> Result<ContainerHandle, DriverError>;

    async fn start(&self, handle: &ContainerHandle) -> Result<(), DriverError>;

    async fn stop(&self, handle: &ContainerHandle, graceful_timeout: Duration) -> Result<(), DriverError>;

    async fn pause(&self, handle: &ContainerHandle) -> Result<(), DriverError>;

    async fn resume(&self, handle: &ContainerHandle) -> Result<(), DriverError>;

    async fn remove(&self, handle: &ContainerHandle, force: bool) -> Result<(), DriverError>;

    async fn attach(&self, handle: &ContainerHandle) -> Result<AttachedStreams, DriverError>;

    /// Awaits the container's terminal exit code.
    async fn wait(&self, handle: &ContainerHandle) -> Result<i64, DriverError>;

    async fn inspect(&self, handle: &ContainerHandle) -> Result<InspectResult, DriverError>;

    /// Used by the reconciler to find orphaned containers (spec §4.6).
    async fn list_by_label(&self, label: &str) -> Result<Vec<InspectResult>, DriverError>;
}
