// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Catalog: the public storage façade. Every mutation is appended to the
//! write-ahead log before the in-memory projection is updated, so a
//! caller observing success has a durability guarantee.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use vea_core::app::{AppId, Application};
use vea_core::dependency::Dependency;
use vea_core::error::{ClassifiedError, ErrorKind};
use vea_core::event::CatalogEvent;
use vea_core::execution::{Execution, ExecutionId};
use vea_core::log_record::{LogRecord, LogStream, Severity};

use crate::snapshot::{Checkpointer, SnapshotError};
use crate::state::{MaterializedState, DEFAULT_LOG_RETENTION};
use crate::wal::{Wal, WalError};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("application {0} not found")]
    ApplicationNotFound(AppId),
    #[error("application {0} already exists")]
    ApplicationAlreadyExists(AppId),
    #[error("execution {0} not found")]
    ExecutionNotFound(ExecutionId),
    #[error("application {0} was modified concurrently (revision conflict)")]
    RevisionConflict(AppId),
    #[error("wal error: {0}")]
    Wal(#[from] WalError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl ClassifiedError for CatalogError {
    fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::ApplicationNotFound(_) | CatalogError::ExecutionNotFound(_) => {
                ErrorKind::NotFound
            }
            CatalogError::ApplicationAlreadyExists(_) => ErrorKind::AlreadyExists,
            CatalogError::RevisionConflict(_) => ErrorKind::Conflict,
            CatalogError::Wal(_) | CatalogError::Snapshot(_) => ErrorKind::Internal,
        }
    }
}

struct Inner {
    wal: Wal,
    state: MaterializedState,
    checkpointer: Checkpointer,
    next_seq: u64,
    healthy: bool,
}

impl Inner {
    fn append(&mut self, event: CatalogEvent) -> Result<(), CatalogError> {
        match self.wal.append(&event) {
            Ok(()) => {
                self.healthy = true;
            }
            Err(e) => {
                self.healthy = false;
                return Err(e.into());
            }
        }
        self.state.apply(&event);
        Ok(())
    }
}

/// The storage façade given to the Execution Engine and Dispatcher.
/// Cheaply cloneable; all state lives behind an internal mutex.
#[derive(Clone)]
pub struct Catalog {
    inner: std::sync::Arc<Mutex<Inner>>,
}

impl Catalog {
    /// Opens (or creates) the catalog rooted at `data_dir`, replaying any
    /// existing snapshot plus WAL tail to rebuild the projection.
    pub fn open(data_dir: impl AsRef<Path>, log_retention: Option<usize>) -> Result<Self, CatalogError> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir).map_err(WalError::Io)?;
        let log_retention = log_retention.unwrap_or(DEFAULT_LOG_RETENTION);

        let checkpointer = Checkpointer::new(data_dir.join("snapshot.zst"));
        let mut state = checkpointer.load(log_retention)?;

        let wal = Wal::open(data_dir.join("wal.log"))?;
        for event in wal.replay()? {
            state.apply(&event);
        }

        let next_seq = state
            .logs
            .values()
            .flat_map(|records| records.iter())
            .map(|r| r.seq)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0);

        Ok(Self {
            inner: std::sync::Arc::new(Mutex::new(Inner {
                wal,
                state,
                checkpointer,
                next_seq,
                healthy: true,
            })),
        })
    }

    pub fn create_application(&self, app: Application) -> Result<(), CatalogError> {
        let mut inner = self.inner.lock();
        if inner.state.applications.contains_key(&app.app_id) {
            return Err(CatalogError::ApplicationAlreadyExists(app.app_id));
        }
        inner.append(CatalogEvent::ApplicationPut { app })
    }

    pub fn update_application(&self, app: Application) -> Result<(), CatalogError> {
        let mut inner = self.inner.lock();
        if !inner.state.applications.contains_key(&app.app_id) {
            return Err(CatalogError::ApplicationNotFound(app.app_id));
        }
        inner.append(CatalogEvent::ApplicationPut { app })
    }

    /// Applies `app` only if the stored Application's `revision` still
    /// equals `expected_revision`, i.e. nothing else has updated it since
    /// the caller last read it. Used by background tasks (e.g. the
    /// container-exit monitor) that cannot hold the engine's per-appId
    /// lock across an `await`.
    pub fn compare_and_swap_application(
        &self,
        expected_revision: u64,
        app: Application,
    ) -> Result<(), CatalogError> {
        let mut inner = self.inner.lock();
        let current = inner
            .state
            .applications
            .get(&app.app_id)
            .ok_or(CatalogError::ApplicationNotFound(app.app_id))?;
        if current.revision != expected_revision {
            return Err(CatalogError::RevisionConflict(app.app_id));
        }
        inner.append(CatalogEvent::ApplicationPut { app })
    }

    pub fn get_application(&self, app_id: AppId) -> Option<Application> {
        self.inner.lock().state.applications.get(&app_id).cloned()
    }

    pub fn list_applications(&self) -> Vec<Application> {
        self.inner.lock().state.applications.values().cloned().collect()
    }

    pub fn delete_application(&self, app_id: AppId) -> Result<(), CatalogError> {
        let mut inner = self.inner.lock();
        if !inner.state.applications.contains_key(&app_id) {
            return Err(CatalogError::ApplicationNotFound(app_id));
        }
        inner.append(CatalogEvent::ApplicationDeleted { app_id })
    }

    pub fn upsert_execution(&self, execution: Execution) -> Result<(), CatalogError> {
        self.inner.lock().append(CatalogEvent::ExecutionPut { execution })
    }

    pub fn get_execution_by_app(&self, app_id: AppId) -> Option<Execution> {
        self.inner.lock().state.executions_by_app.get(&app_id).cloned()
    }

    pub fn get_execution_by_id(&self, execution_id: ExecutionId) -> Option<Execution> {
        let inner = self.inner.lock();
        let app_id = *inner.state.executions_by_id.get(&execution_id)?;
        inner.state.executions_by_app.get(&app_id).cloned()
    }

    pub fn append_log(
        &self,
        app_id: AppId,
        execution_id: Option<ExecutionId>,
        stream: LogStream,
        severity: Severity,
        timestamp_ms: u64,
        payload: Vec<u8>,
    ) -> Result<LogRecord, CatalogError> {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let record = LogRecord { app_id, execution_id, stream, severity, timestamp_ms, seq, payload };
        inner.append(CatalogEvent::LogAppended { record: record.clone() })?;
        Ok(record)
    }

    /// Returns up to `limit` records for `app_id` with `seq > since_seq`,
    /// oldest first.
    pub fn read_logs(&self, app_id: AppId, since_seq: u64, limit: usize) -> Vec<LogRecord> {
        let inner = self.inner.lock();
        inner
            .state
            .logs
            .get(&app_id)
            .map(|records| {
                records.iter().filter(|r| r.seq > since_seq).take(limit).cloned().collect()
            })
            .unwrap_or_default()
    }

    pub fn list_dependencies(&self, app_id: AppId) -> Vec<Dependency> {
        self.inner.lock().state.dependencies.get(&app_id).cloned().unwrap_or_default()
    }

    pub fn upsert_dependency(&self, dependency: Dependency) -> Result<(), CatalogError> {
        self.inner.lock().append(CatalogEvent::DependencyPut { dependency })
    }

    /// True if the last WAL append succeeded. Surfaced on the health
    /// endpoint (spec §6).
    pub fn healthy(&self) -> bool {
        self.inner.lock().healthy
    }

    /// Writes a fresh snapshot and truncates the WAL tail it captured.
    pub fn checkpoint(&self) -> Result<(), CatalogError> {
        let mut inner = self.inner.lock();
        inner.checkpointer.write(&inner.state)?;
        inner.wal.truncate()?;
        Ok(())
    }

    pub fn data_dir_wal_path(&self) -> PathBuf {
        self.inner.lock().wal.path().to_path_buf()
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
