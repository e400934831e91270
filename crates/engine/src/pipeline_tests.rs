// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vea_core::app::AppId;
use vea_core::clock::FakeClock;
use vea_core::execution::ExecutionId;

fn app_and_exe() -> (AppId, ExecutionId) {
    (AppId::from_string("app-pipetest000000000000"), ExecutionId::from_string("exe-pipetest000000000000"))
}

#[test]
fn forward_writes_catalog_log_and_ring() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let clock = FakeClock::new();
    let pipeline = OutputPipeline::new(DEFAULT_RING_BYTES);
    let (app_id, execution_id) = app_and_exe();

    pipeline.forward(&catalog, &clock, app_id, execution_id, LogStream::Stdout, b"hi".to_vec());

    let logs = catalog.read_logs(app_id, 0, 10);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].payload, b"hi");
    assert_eq!(pipeline.tail(execution_id, LogStream::Stdout), b"hi");
}

#[test]
fn ring_buffer_drops_oldest_bytes_beyond_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let clock = FakeClock::new();
    let pipeline = OutputPipeline::new(4);
    let (app_id, execution_id) = app_and_exe();

    pipeline.forward(&catalog, &clock, app_id, execution_id, LogStream::Stdout, b"abcdef".to_vec());
    assert_eq!(pipeline.tail(execution_id, LogStream::Stdout), b"cdef");
}

#[test]
fn subscriber_receives_forwarded_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let clock = FakeClock::new();
    let pipeline = OutputPipeline::new(DEFAULT_RING_BYTES);
    let (app_id, execution_id) = app_and_exe();

    let mut rx = pipeline.subscribe(execution_id);
    pipeline.forward(&catalog, &clock, app_id, execution_id, LogStream::Stdout, b"hello".to_vec());

    let chunk = rx.try_recv().expect("chunk delivered");
    assert_eq!(chunk.data, b"hello");
    assert_eq!(chunk.execution_id, execution_id);
}

#[test]
fn full_subscriber_queue_drops_oldest_and_logs_warning() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let clock = FakeClock::new();
    let pipeline = OutputPipeline::new(DEFAULT_RING_BYTES);
    let (app_id, execution_id) = app_and_exe();

    // Depth-1 channel so the second send overflows immediately.
    let (tx, mut rx) = mpsc::channel(1);
    pipeline.subscribers.lock().insert(execution_id, vec![tx]);

    pipeline.forward(&catalog, &clock, app_id, execution_id, LogStream::Stdout, b"one".to_vec());
    pipeline.forward(&catalog, &clock, app_id, execution_id, LogStream::Stdout, b"two".to_vec());

    let first = rx.try_recv().unwrap();
    assert_eq!(first.data, b"two", "oldest pending chunk should have been dropped");

    let logs = catalog.read_logs(app_id, 0, 10);
    assert!(logs.iter().any(|r| r.stream == LogStream::System && r.severity == Severity::Warning));
}

#[test]
fn unsubscribe_all_removes_subscriber_list() {
    let pipeline = OutputPipeline::new(DEFAULT_RING_BYTES);
    let (_, execution_id) = app_and_exe();
    let _rx = pipeline.subscribe(execution_id);
    assert!(pipeline.subscribers.lock().contains_key(&execution_id));
    pipeline.unsubscribe_all(execution_id);
    assert!(!pipeline.subscribers.lock().contains_key(&execution_id));
}
