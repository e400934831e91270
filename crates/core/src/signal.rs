// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal Gateway interface (C7, spec §4.7).
//!
//! The core consumes this interface; it does not implement it. The only
//! concrete type shipped here is [`DisabledSignalGateway`], matching the
//! teacher's no-op adapter pattern for collaborators that are
//! architecturally required but out of scope for this build.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    #[error("signal gateway unavailable")]
    Unavailable,
    #[error("unknown signal path: {0}")]
    PathUnknown(String),
    #[error("type mismatch on signal path: {0}")]
    TypeMismatch(String),
    #[error("signal path is read-only: {0}")]
    ReadOnly(String),
    #[error("signal path is write-only: {0}")]
    WriteOnly(String),
}

impl crate::error::ClassifiedError for SignalError {
    fn kind(&self) -> crate::error::ErrorKind {
        match self {
            SignalError::Unavailable => crate::error::ErrorKind::Unavailable,
            SignalError::PathUnknown(_) => crate::error::ErrorKind::NotFound,
            SignalError::TypeMismatch(_)
            | SignalError::ReadOnly(_)
            | SignalError::WriteOnly(_) => crate::error::ErrorKind::ValidationError,
        }
    }
}

/// Result of writing a single signal path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResult {
    pub path: String,
    pub result: Result<(), String>,
}

/// Connection descriptor injected into a container's environment at Start
/// time (spec §4.7, §6).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SignalGatewayEndpoint {
    pub host: String,
    pub port: u16,
    pub credential: Option<String>,
}

/// Opaque subscription handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// A sink that receives signal updates pushed by a subscription.
pub trait SignalSink: Send + Sync {
    fn on_update(&self, path: &str, value: &serde_json::Value);
}

/// Read/write/subscribe access to vehicle signals (spec §4.7).
///
/// Implementations are pluggable and out of scope for this crate; see
/// [`DisabledSignalGateway`] for the default no-op.
#[async_trait]
pub trait SignalGateway: Send + Sync {
    async fn read(
        &self,
        paths: &[String],
    ) -> Result<HashMap<String, serde_json::Value>, SignalError>;

    async fn write(
        &self,
        values: HashMap<String, serde_json::Value>,
    ) -> Result<Vec<WriteResult>, SignalError>;

    async fn subscribe(
        &self,
        paths: &[String],
        sink: std::sync::Arc<dyn SignalSink>,
    ) -> Result<SubscriptionId, SignalError>;

    async fn unsubscribe(&self, handle: SubscriptionId) -> Result<(), SignalError>;

    /// Opaque schema tree, passed through to callers unmodified.
    async fn tree(&self) -> Result<serde_json::Value, SignalError>;

    /// Endpoint to inject into a container's environment at Start time.
    fn endpoint(&self) -> Option<SignalGatewayEndpoint> {
        None
    }
}

/// Always-unavailable Signal Gateway. Used when `signal_gateway_enabled`
/// is false (spec §6 configuration) or no real gateway has been wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSignalGateway;

#[async_trait]
impl SignalGateway for DisabledSignalGateway {
    async fn read(
        &self,
        _paths: &[String],
    ) -> Result<HashMap<String, serde_json::Value>, SignalError> {
        Err(SignalError::Unavailable)
    }

    async fn write(
        &self,
        _values: HashMap<String, serde_json::Value>,
    ) -> Result<Vec<WriteResult>, SignalError> {
        Err(SignalError::Unavailable)
    }

    async fn subscribe(
        &self,
        _paths: &[String],
        _sink: std::sync::Arc<dyn SignalSink>,
    ) -> Result<SubscriptionId, SignalError> {
        Err(SignalError::Unavailable)
    }

    async fn unsubscribe(&self, _handle: SubscriptionId) -> Result<(), SignalError> {
        Err(SignalError::Unavailable)
    }

    async fn tree(&self) -> Result<serde_json::Value, SignalError> {
        Err(SignalError::Unavailable)
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
