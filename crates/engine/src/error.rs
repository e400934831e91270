// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution Engine error taxonomy (spec §7), composing the storage and
//! driver crates' own errors via `#[from]`.

use vea_core::app::AppId;
use vea_core::error::{ClassifiedError, ErrorKind};
use vea_driver::DriverError;
use vea_storage::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("application {0} not found")]
    NotFound(AppId),
    #[error("application {0} is not in a startable state")]
    InvalidState(AppId),
    #[error("Conflict: container name {0} in use")]
    Conflict(String),
    #[error("declared dependency failed for {0}: {1}")]
    DependencyFailed(AppId, String),
    #[error("missing required field: {0}")]
    ValidationError(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("container driver error: {0}")]
    Driver(#[from] DriverError),
    #[error("engine is in read-only degraded mode")]
    Degraded,
}

impl ClassifiedError for EngineError {
    fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::InvalidState(_) => ErrorKind::InvalidState,
            EngineError::Conflict(_) => ErrorKind::Conflict,
            EngineError::DependencyFailed(..) => ErrorKind::DependencyFailed,
            EngineError::ValidationError(_) => ErrorKind::ValidationError,
            EngineError::Catalog(e) => e.kind(),
            EngineError::Driver(e) => e.kind(),
            EngineError::Degraded => ErrorKind::Unavailable,
        }
    }
}
