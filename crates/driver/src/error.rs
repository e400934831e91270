// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use vea_core::error::{ClassifiedError, ErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("container not found: {0}")]
    NotFound(String),
    #[error("container name already in use: {0}")]
    Conflict(String),
    #[error("image missing: {0}")]
    ImageMissing(String),
    #[error("container engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("docker engine error: {0}")]
    Docker(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ClassifiedError for DriverError {
    fn kind(&self) -> ErrorKind {
        match self {
            DriverError::NotFound(_) => ErrorKind::NotFound,
            DriverError::Conflict(_) => ErrorKind::Conflict,
            DriverError::ImageMissing(_) => ErrorKind::DependencyFailed,
            DriverError::EngineUnavailable(_) => ErrorKind::Unavailable,
            DriverError::Docker(_) => ErrorKind::Internal,
        }
    }
}

impl From<bollard::errors::Error> for DriverError {
    fn from(e: bollard::errors::Error) -> Self {
        use bollard::errors::Error as BollardError;
        match &e {
            BollardError::DockerResponseServerError { status_code: 404, .. } => {
                DriverError::NotFound(e.to_string())
            }
            BollardError::DockerResponseServerError { status_code: 409, .. } => {
                DriverError::Conflict(e.to_string())
            }
            _ => DriverError::Docker(Box::new(e)),
        }
    }
}
