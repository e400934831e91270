// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vea_core::app::{Application, ApplicationStatus};
use vea_core::clock::FakeClock;
use vea_core::execution::{Execution, ExecutionId, RuntimeState};
use vea_driver::{ContainerSpec, FakeDriver, ResourceCaps};
use std::collections::HashMap;

fn spec(name: &str, app_id: &str) -> ContainerSpec {
    let mut labels = HashMap::new();
    labels.insert("runtime".to_string(), "rt-1".to_string());
    labels.insert("appId".to_string(), app_id.to_string());
    ContainerSpec {
        name: name.to_string(),
        image: "vea-script:latest".to_string(),
        working_dir: None,
        command: vec!["true".to_string()],
        env: HashMap::new(),
        mounts: vec![],
        tmpfs: vec![],
        resources: ResourceCaps { memory_bytes: 1, cpu_quota_us: 1 },
        network_mode: "none".to_string(),
        labels,
    }
}

async fn running_app(catalog: &Catalog, driver: &FakeDriver, app_id: AppId) -> ContainerHandle {
    let app = Application::builder().app_id(app_id).status(ApplicationStatus::Running).build();
    catalog.create_application(app).unwrap();
    let handle = driver.create(spec("VEA-recon", app_id.as_str())).await.unwrap();
    driver.start(&handle).await.unwrap();
    catalog
        .upsert_execution(Execution {
            app_id,
            execution_id: ExecutionId::new(),
            handle: handle.0.clone(),
            runtime_state: RuntimeState::Running,
            exit_code: None,
            last_heartbeat_ms: 0,
            resource_limits: Default::default(),
            started_at_ms: 0,
        })
        .unwrap();
    handle
}

#[tokio::test]
async fn running_container_stays_running_and_heartbeat_advances() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let driver = Arc::new(FakeDriver::new());
    let clock = Arc::new(FakeClock::new());
    let app_id = AppId::from_string("app-rrrrrrrrrrrrrrrrrrrr");
    running_app(&catalog, &driver, app_id).await;

    let reconciler = Reconciler::new(catalog.clone(), driver.clone(), clock.clone(), "rt-1".to_string());
    reconciler.run_once().await;

    let app = catalog.get_application(app_id).unwrap();
    assert_eq!(app.status, ApplicationStatus::Running);
}

#[tokio::test]
async fn exited_container_marks_application_stopped_on_zero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let driver = Arc::new(FakeDriver::new());
    let clock = Arc::new(FakeClock::new());
    let app_id = AppId::from_string("app-eeeeeeeeeeeeeeeeeeee");
    let handle = running_app(&catalog, &driver, app_id).await;
    driver.simulate_exit(&handle, 0);

    let reconciler = Reconciler::new(catalog.clone(), driver.clone(), clock.clone(), "rt-1".to_string());
    reconciler.run_once().await;

    let app = catalog.get_application(app_id).unwrap();
    assert_eq!(app.status, ApplicationStatus::Stopped);
    let execution = catalog.get_execution_by_app(app_id).unwrap();
    assert_eq!(execution.exit_code, Some(0));
}

#[tokio::test]
async fn oom_killed_container_surfaces_exit_code_137_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let driver = Arc::new(FakeDriver::new());
    let clock = Arc::new(FakeClock::new());
    let app_id = AppId::from_string("app-ooooooooooooooooommm");
    let handle = running_app(&catalog, &driver, app_id).await;
    driver.simulate_exit(&handle, 137);

    let reconciler = Reconciler::new(catalog.clone(), driver.clone(), clock.clone(), "rt-1".to_string());
    reconciler.run_once().await;

    let app = catalog.get_application(app_id).unwrap();
    assert_eq!(app.status, ApplicationStatus::Error);
    let execution = catalog.get_execution_by_app(app_id).unwrap();
    assert_eq!(execution.exit_code, Some(137));
}

#[tokio::test]
async fn missing_container_marks_error_with_exit_code_negative_one() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let driver = Arc::new(FakeDriver::new());
    let clock = Arc::new(FakeClock::new());
    let app_id = AppId::from_string("app-mmmmmmmmmmmmmmmmmmmm");
    let handle = running_app(&catalog, &driver, app_id).await;
    driver.remove(&handle, true).await.unwrap();

    let reconciler = Reconciler::new(catalog.clone(), driver.clone(), clock.clone(), "rt-1".to_string());
    reconciler.run_once().await;

    let app = catalog.get_application(app_id).unwrap();
    assert_eq!(app.status, ApplicationStatus::Error);
}

#[tokio::test]
async fn orphaned_container_with_no_matching_application_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path(), None).unwrap();
    let driver = Arc::new(FakeDriver::new());
    let clock = Arc::new(FakeClock::new());

    let handle = driver.create(spec("VEA-orphan", "app-doesnotexist00000000")).await.unwrap();
    driver.start(&handle).await.unwrap();

    let reconciler = Reconciler::new(catalog.clone(), driver.clone(), clock.clone(), "rt-1".to_string());
    reconciler.run_once().await;

    let remaining = driver.list_by_label("runtime=rt-1").await.unwrap();
    assert!(remaining.is_empty(), "orphaned container should have been removed");
}
