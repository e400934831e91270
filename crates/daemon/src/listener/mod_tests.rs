// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::sync::mpsc;
use vea_core::clock::FakeClock;
use vea_core::signal::DisabledSignalGateway;
use vea_driver::{ContainerDriver, FakeDriver};
use vea_engine::{DependencyInstaller, EngineConfig};

fn harness(dir: &std::path::Path) -> (Arc<DispatcherCtx>, mpsc::Sender<OutgoingFrame>, mpsc::Receiver<OutgoingFrame>) {
    let catalog = Catalog::open(dir, None).unwrap();
    let driver = Arc::new(FakeDriver::new());
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let pipeline = Arc::new(OutputPipeline::new(vea_engine::pipeline::DEFAULT_RING_BYTES));
    let config = EngineConfig { data_dir: dir.to_path_buf(), ..EngineConfig::default() };
    let (engine, _rx) = Engine::new(
        catalog.clone(),
        driver as Arc<dyn ContainerDriver>,
        clock.clone(),
        pipeline.clone(),
        DependencyInstaller::new(vec![]),
        Arc::new(DisabledSignalGateway),
        "rt-test".to_string(),
        config,
    );
    let ctx = Arc::new(DispatcherCtx {
        engine: Arc::new(engine),
        catalog,
        pipeline,
        signal_gateway: Arc::new(DisabledSignalGateway),
        clock,
        runtime_id: "rt-test".to_string(),
        version: "0.0.0-test".to_string(),
    });
    let (tx, rx) = mpsc::channel(32);
    (ctx, tx, rx)
}

#[tokio::test]
async fn ping_echoes_id_and_carries_server_time() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, tx, _rx) = harness(dir.path());

    let response = dispatch(&ctx, Request::Ping { id: "p1".to_string() }, &tx).await;

    match response {
        Response::PongResponse { id, server_time_ms } => {
            assert_eq!(id, "p1");
            assert_eq!(server_time_ms, 1_000_000);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn deploy_request_installs_then_starts_a_new_application() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, tx, _rx) = harness(dir.path());
    let app_id = AppId::from_string("app-deploy00000000000000");

    let response = dispatch(
        &ctx,
        Request::DeployRequest {
            id: "d1".to_string(),
            app_id,
            code: "print('hi')".to_string(),
            language: "python".to_string(),
            entry_point: "main.py".to_string(),
            dependencies: Vec::new(),
        },
        &tx,
    )
    .await;

    match response {
        Response::DeployResponse { status, state, app_id: returned, execution_id, .. } => {
            assert_eq!(status, "started");
            assert_eq!(state, "running");
            assert_eq!(returned, app_id);
            assert!(execution_id.is_some());
        }
        other => panic!("unexpected response: {other:?}"),
    }
    assert!(ctx.catalog.get_application(app_id).is_some());
}

#[tokio::test]
async fn deploy_request_does_not_reinstall_an_existing_application() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, tx, _rx) = harness(dir.path());
    let app_id = AppId::from_string("app-redeploy0000000000000");
    let deploy = Request::DeployRequest {
        id: "d1".to_string(),
        app_id,
        code: "print('hi')".to_string(),
        language: "python".to_string(),
        entry_point: "main.py".to_string(),
        dependencies: Vec::new(),
    };

    dispatch(&ctx, deploy.clone(), &tx).await;
    ctx.engine.stop(&app_id.to_string()).await.unwrap();
    let response = dispatch(&ctx, deploy, &tx).await;

    match response {
        Response::DeployResponse { status, .. } => assert_eq!(status, "started"),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn stop_unknown_app_returns_not_found_error() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, tx, _rx) = harness(dir.path());

    let response =
        dispatch(&ctx, Request::StopApp { id: "s1".to_string(), subject: "app-nope00000000000000000".to_string() }, &tx)
            .await;

    match response {
        Response::Error { id, app_id, .. } => {
            assert_eq!(id, "s1");
            assert!(app_id.is_none());
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn list_deployed_apps_reflects_catalog_state() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, tx, _rx) = harness(dir.path());
    let app_id = AppId::from_string("app-listed000000000000000");
    dispatch(
        &ctx,
        Request::DeployRequest {
            id: "d1".to_string(),
            app_id,
            code: "print('hi')".to_string(),
            language: "python".to_string(),
            entry_point: "main.py".to_string(),
            dependencies: Vec::new(),
        },
        &tx,
    )
    .await;

    let response = dispatch(&ctx, Request::ListDeployedApps { id: "l1".to_string() }, &tx).await;

    match response {
        Response::ListDeployedAppsResponse { applications, .. } => {
            assert!(applications.iter().any(|app| app.app_id == app_id));
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn get_signals_value_reports_unavailable_when_gateway_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, tx, _rx) = harness(dir.path());

    let response =
        dispatch(&ctx, Request::GetSignalsValue { id: "g1".to_string(), paths: vec!["vehicle.speed".to_string()] }, &tx)
            .await;

    assert!(matches!(response, Response::Error { .. }));
}
