// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vea_core::clock::FakeClock;
use vea_driver::{ContainerDriver, FakeDriver};
use vea_storage::Catalog;

#[tokio::test]
async fn spawned_reconciler_survives_several_ticks_until_aborted() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let driver = Arc::new(FakeDriver::new());
    let clock: Arc<dyn vea_core::clock::Clock> = Arc::new(FakeClock::new());
    let reconciler = Arc::new(Reconciler::new(catalog, driver as Arc<dyn ContainerDriver>, clock, "rt-1".to_string()));

    let handle = spawn_reconciler(reconciler, Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!handle.is_finished());
    handle.abort();
}
