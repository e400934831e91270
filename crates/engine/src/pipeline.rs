// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output Pipeline (C5, spec §4.5).
//!
//! Fans each stdout/stderr chunk out three ways: into the catalog as a
//! `LogRecord` (never dropped — may block the forwarder, which is fine
//! since the upstream is the container's own rate), to any subscribers
//! registered for the owning `executionId` (drop-oldest-on-full), and
//! into a bounded in-memory ring per `(executionId, stream)` for fast
//! tail queries.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use vea_core::app::AppId;
use vea_core::clock::Clock;
use vea_core::execution::ExecutionId;
use vea_core::log_record::{LogStream, Severity};
use vea_storage::Catalog;

/// Default ring capacity in bytes per `(executionId, stream)`.
pub const DEFAULT_RING_BYTES: usize = 64 * 1024;

/// Default bound on a subscriber's pending-chunk queue.
const SUBSCRIBER_QUEUE_DEPTH: usize = 256;

#[derive(Debug, Clone)]
pub struct OutputChunk {
    pub app_id: AppId,
    pub execution_id: ExecutionId,
    pub stream: LogStream,
    pub data: Vec<u8>,
}

struct Ring {
    buf: VecDeque<u8>,
    cap: usize,
}

impl Ring {
    fn new(cap: usize) -> Self {
        Self { buf: VecDeque::with_capacity(cap), cap }
    }

    fn push(&mut self, data: &[u8]) {
        self.buf.extend(data.iter().copied());
        while self.buf.len() > self.cap {
            self.buf.pop_front();
        }
    }

    fn tail(&self) -> Vec<u8> {
        self.buf.iter().copied().collect()
    }
}

/// Fan-out hub shared by every Execution's stream forwarders and every
/// dispatcher subscription.
pub struct OutputPipeline {
    ring_bytes: usize,
    rings: Mutex<HashMap<(ExecutionId, LogStream), Ring>>,
    subscribers: Mutex<HashMap<ExecutionId, Vec<mpsc::Sender<OutputChunk>>>>,
}

impl OutputPipeline {
    pub fn new(ring_bytes: usize) -> Self {
        Self { ring_bytes, rings: Mutex::new(HashMap::new()), subscribers: Mutex::new(HashMap::new()) }
    }

    /// Registers a subscriber for `execution_id`'s output. Returns the
    /// receiving half; the dispatcher forwards each chunk as a
    /// `console_output` stream event.
    pub fn subscribe(&self, execution_id: ExecutionId) -> mpsc::Receiver<OutputChunk> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_DEPTH);
        self.subscribers.lock().entry(execution_id).or_default().push(tx);
        rx
    }

    pub fn unsubscribe_all(&self, execution_id: ExecutionId) {
        self.subscribers.lock().remove(&execution_id);
    }

    /// Returns up to `ring_bytes` of the most recently written bytes for
    /// `(execution_id, stream)`.
    pub fn tail(&self, execution_id: ExecutionId, stream: LogStream) -> Vec<u8> {
        self.rings.lock().get(&(execution_id, stream)).map(Ring::tail).unwrap_or_default()
    }

    /// Writes `data` to the catalog, ring, and any live subscribers.
    /// Catalog writes are never dropped; subscriber delivery drops the
    /// oldest pending chunk on a full queue and records one `warning`
    /// LogRecord about the drop (spec §4.5 backpressure policy).
    pub fn forward(
        &self,
        catalog: &Catalog,
        clock: &dyn Clock,
        app_id: AppId,
        execution_id: ExecutionId,
        stream: LogStream,
        data: Vec<u8>,
    ) {
        let severity = match stream {
            LogStream::Stderr => Severity::Error,
            _ => Severity::Info,
        };
        let _ = catalog.append_log(app_id, Some(execution_id), stream, severity, clock.epoch_ms(), data.clone());

        self.rings
            .lock()
            .entry((execution_id, stream))
            .or_insert_with(|| Ring::new(self.ring_bytes))
            .push(&data);

        let mut dropped = false;
        {
            let mut subscribers = self.subscribers.lock();
            if let Some(list) = subscribers.get_mut(&execution_id) {
                list.retain_mut(|tx| {
                    let chunk = OutputChunk { app_id, execution_id, stream, data: data.clone() };
                    match tx.try_send(chunk) {
                        Ok(()) => true,
                        Err(mpsc::error::TrySendError::Full(chunk)) => {
                            dropped = true;
                            let _ = tx.try_send(chunk);
                            true
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => false,
                    }
                });
            }
        }

        if dropped {
            let _ = catalog.append_log(
                app_id,
                Some(execution_id),
                LogStream::System,
                Severity::Warning,
                clock.epoch_ms(),
                b"subscriber queue full, dropped oldest pending chunk".to_vec(),
            );
        }
    }
}

/// Spawns the stdout/stderr forwarder tasks for a freshly-attached
/// Execution. Each task reads from its half of `AttachedStreams` until
/// the channel closes (container exited or driver detached).
pub fn spawn_forwarders(
    pipeline: Arc<OutputPipeline>,
    catalog: Catalog,
    clock: Arc<dyn Clock>,
    app_id: AppId,
    execution_id: ExecutionId,
    mut stdout: mpsc::Receiver<Vec<u8>>,
    mut stderr: mpsc::Receiver<Vec<u8>>,
) {
    {
        let pipeline = Arc::clone(&pipeline);
        let catalog = catalog.clone();
        let clock = Arc::clone(&clock);
        tokio::spawn(async move {
            while let Some(chunk) = stdout.recv().await {
                pipeline.forward(&catalog, clock.as_ref(), app_id, execution_id, LogStream::Stdout, chunk);
            }
        });
    }
    tokio::spawn(async move {
        while let Some(chunk) = stderr.recv().await {
            pipeline.forward(&catalog, clock.as_ref(), app_id, execution_id, LogStream::Stderr, chunk);
        }
    });
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
