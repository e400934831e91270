// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic zstd-compressed snapshot of the `MaterializedState`, so WAL
//! replay on startup only has to fold the tail since the last checkpoint.

use std::fs;
use std::path::{Path, PathBuf};

use crate::state::MaterializedState;
use crate::wal::WalError;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot codec error: {0}")]
    Codec(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<WalError> for SnapshotError {
    fn from(e: WalError) -> Self {
        SnapshotError::Codec(Box::new(e))
    }
}

const ZSTD_LEVEL: i32 = 3;

pub struct Checkpointer {
    path: PathBuf,
}

impl Checkpointer {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Writes a compressed snapshot of `state`, replacing any prior one
    /// atomically via rename so a crash mid-write never corrupts the
    /// existing checkpoint.
    pub fn write(&self, state: &MaterializedState) -> Result<(), SnapshotError> {
        let json = serde_json::to_vec(state)
            .map_err(|e| SnapshotError::Codec(Box::new(e)))?;
        let compressed = zstd::encode_all(&json[..], ZSTD_LEVEL)
            .map_err(SnapshotError::Io)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, compressed)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Loads the last checkpoint, or an empty state with the given log
    /// retention if none exists yet.
    pub fn load(&self, log_retention: usize) -> Result<MaterializedState, SnapshotError> {
        if !self.path.exists() {
            return Ok(MaterializedState::new(log_retention));
        }
        let compressed = fs::read(&self.path)?;
        let json = zstd::decode_all(&compressed[..]).map_err(SnapshotError::Io)?;
        let mut state: MaterializedState =
            serde_json::from_slice(&json).map_err(|e| SnapshotError::Codec(Box::new(e)))?;
        state.log_retention = log_retention;
        Ok(state)
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
