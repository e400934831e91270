// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fleet Client interface (C9, spec §2).
//!
//! Outbound registration/heartbeat to a remote fleet-manager coordinator.
//! The core consumes this interface; it does not implement it. The only
//! concrete type shipped here is [`DisabledFleetClient`], a true no-op
//! used when `fleet_client_enabled` is false (spec §6).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetRegistration {
    pub runtime_id: String,
    pub version: String,
    pub capabilities: Vec<String>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FleetError {
    #[error("fleet coordinator unreachable")]
    Unavailable,
    #[error("fleet registration rejected: {0}")]
    Rejected(String),
}

impl crate::error::ClassifiedError for FleetError {
    fn kind(&self) -> crate::error::ErrorKind {
        match self {
            FleetError::Unavailable => crate::error::ErrorKind::Unavailable,
            FleetError::Rejected(_) => crate::error::ErrorKind::Internal,
        }
    }
}

#[async_trait]
pub trait FleetClient: Send + Sync {
    async fn register(&self, info: FleetRegistration) -> Result<(), FleetError>;
    async fn heartbeat(&self) -> Result<(), FleetError>;
}

/// No-op Fleet Client. Registration and heartbeats succeed trivially and
/// are observable only via tracing, matching the teacher's `Noop*`
/// adapters for collaborators left unimplemented by design.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledFleetClient;

#[async_trait]
impl FleetClient for DisabledFleetClient {
    async fn register(&self, info: FleetRegistration) -> Result<(), FleetError> {
        tracing_shim::log_disabled("register", &info.runtime_id);
        Ok(())
    }

    async fn heartbeat(&self) -> Result<(), FleetError> {
        Ok(())
    }
}

/// `vea-core` has no tracing dependency of its own; this keeps the no-op
/// adapter silent without pulling a logging crate into the domain layer.
mod tracing_shim {
    pub fn log_disabled(_op: &str, _subject: &str) {}
}

#[cfg(test)]
#[path = "fleet_tests.rs"]
mod tests;
