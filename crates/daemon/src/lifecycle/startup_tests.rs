// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vea_driver::FakeDriver;

#[tokio::test]
async fn startup_creates_the_data_dir_and_wires_a_healthy_ctx() {
    let base = tempfile::tempdir().unwrap();
    let data_dir = base.path().join("nested").join("state");
    let mut config = Config::default();
    config.data_dir = data_dir.clone();

    let outcome = startup(&config, "rt-1".to_string(), Arc::new(FakeDriver::new())).await.unwrap();

    assert!(data_dir.is_dir());
    assert!(outcome.ctx.catalog.healthy());
    assert_eq!(outcome.ctx.runtime_id, "rt-1");
}

#[tokio::test]
async fn startup_reconcile_pass_prunes_nothing_on_an_empty_catalog() {
    let base = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.data_dir = base.path().to_path_buf();

    let outcome = startup(&config, "rt-1".to_string(), Arc::new(FakeDriver::new())).await.unwrap();

    assert!(outcome.ctx.catalog.list_applications().is_empty());
}
