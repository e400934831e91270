// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log: the durable record of every `CatalogEvent`.
//!
//! Events are appended as newline-delimited JSON and fsynced before the
//! call returns, so a crash between append and fsync never loses an
//! acknowledged write. Replay folds the file back into a
//! [`crate::state::MaterializedState`] in append order.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use vea_core::event::CatalogEvent;

#[derive(Debug, thiserror::Error)]
pub enum WalError {
    #[error("wal io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("wal entry at line {line} is corrupt: {source}")]
    Corrupt { line: usize, #[source] source: serde_json::Error },
}

/// Append-only log file. Not `Clone`; the [`crate::catalog::Catalog`]
/// owns the single writer instance behind its mutex.
pub struct Wal {
    path: PathBuf,
    file: File,
}

impl Wal {
    /// Opens (creating if absent) the WAL file at `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    /// Appends one event, fsyncing before returning.
    pub fn append(&mut self, event: &CatalogEvent) -> Result<(), WalError> {
        let mut line = serde_json::to_vec(event).map_err(|e| WalError::Corrupt {
            line: 0,
            source: e,
        })?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.sync_data()?;
        Ok(())
    }

    /// Reads every event currently on disk, in append order.
    pub fn replay(&self) -> Result<Vec<CatalogEvent>, WalError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut events = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let event = serde_json::from_str(&line)
                .map_err(|e| WalError::Corrupt { line: idx + 1, source: e })?;
            events.push(event);
        }
        Ok(events)
    }

    /// Truncates the WAL to empty. Called after a snapshot has durably
    /// captured everything the log currently holds.
    pub fn truncate(&mut self) -> Result<(), WalError> {
        self.file = OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
