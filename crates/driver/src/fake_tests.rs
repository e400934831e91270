// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::spec::{ContainerSpec, ResourceCaps};
use std::collections::HashMap;

fn test_spec(name: &str) -> ContainerSpec {
    ContainerSpec {
        name: name.to_string(),
        image: "vea/script-runtime:latest".to_string(),
        working_dir: None,
        command: vec!["python3".to_string(), "main.py".to_string()],
        env: HashMap::new(),
        mounts: Vec::new(),
        tmpfs: Vec::new(),
        resources: ResourceCaps { memory_bytes: 1, cpu_quota_us: 1 },
        network_mode: "none".to_string(),
        labels: HashMap::new(),
    }
}

#[tokio::test]
async fn create_then_start_reports_running() {
    let driver = FakeDriver::new();
    let handle = driver.create(test_spec("VEA-app-1")).await.unwrap();
    driver.start(&handle).await.unwrap();
    let inspected = driver.inspect(&handle).await.unwrap();
    assert_eq!(inspected.status, ContainerStatus::Running);
}

#[tokio::test]
async fn duplicate_name_while_running_is_conflict() {
    let driver = FakeDriver::new();
    let handle = driver.create(test_spec("VEA-app-1")).await.unwrap();
    driver.start(&handle).await.unwrap();

    let err = driver.create(test_spec("VEA-app-1")).await.unwrap_err();
    assert!(matches!(err, DriverError::Conflict(_)));
}

#[tokio::test]
async fn stop_then_wait_returns_exit_code() {
    let driver = FakeDriver::new();
    let handle = driver.create(test_spec("VEA-app-1")).await.unwrap();
    driver.start(&handle).await.unwrap();
    driver.stop(&handle, Duration::from_secs(10)).await.unwrap();

    let code = driver.wait(&handle).await.unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn simulate_exit_updates_inspect_and_wait() {
    let driver = FakeDriver::new();
    let handle = driver.create(test_spec("VEA-app-1")).await.unwrap();
    driver.start(&handle).await.unwrap();
    driver.simulate_exit(&handle, 7);

    let code = driver.wait(&handle).await.unwrap();
    assert_eq!(code, 7);
    assert_eq!(driver.inspect(&handle).await.unwrap().status, ContainerStatus::Exited);
}

#[tokio::test]
async fn list_by_label_filters_on_key_value() {
    let driver = FakeDriver::new();
    let mut spec = test_spec("VEA-app-1");
    spec.labels.insert("vea.app_id".to_string(), "app-aaaaaaaaaaaaaaaaaaaa".to_string());
    driver.create(spec).await.unwrap();

    let matches = driver.list_by_label("vea.app_id=app-aaaaaaaaaaaaaaaaaaaa").await.unwrap();
    assert_eq!(matches.len(), 1);

    let none = driver.list_by_label("vea.app_id=app-other").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn operations_on_unknown_handle_are_not_found() {
    let driver = FakeDriver::new();
    let handle = ContainerHandle("missing".to_string());
    assert!(matches!(driver.start(&handle).await, Err(DriverError::NotFound(_))));
    assert!(matches!(driver.inspect(&handle).await, Err(DriverError::NotFound(_))));
}
