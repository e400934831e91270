// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vead`: the Vehicle Edge Application Runtime daemon process.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vea_daemon::config::Config;
use vea_daemon::env::{config_path, data_dir};
use vea_daemon::health::{self, HealthState};
use vea_daemon::lifecycle::{spawn_reconciler, startup};
use vea_daemon::listener;
use vea_driver::{ContainerDriver, DockerDriver};

const EXIT_OK: u8 = 0;
const EXIT_CONFIG: u8 = 1;
const EXIT_CATALOG: u8 = 2;
const EXIT_DRIVER: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(code) => ExitCode::from(code),
    }
}

async fn run() -> Result<(), u8> {
    let data_dir = data_dir().map_err(|_| EXIT_CONFIG)?;
    let config_path = config_path(&data_dir);
    let config = Config::load(&config_path).map_err(|err| {
        eprintln!("config error: {err}");
        EXIT_CONFIG
    })?;

    std::fs::create_dir_all(&config.data_dir).map_err(|err| {
        eprintln!("failed to create data directory: {err}");
        EXIT_CONFIG
    })?;

    let _file_guard = init_tracing(&config);

    let _pidfile = vea_daemon::pidfile::PidFile::acquire(&config.data_dir).map_err(|err| {
        tracing::error!(error = %err, "failed to acquire daemon.pid lock");
        EXIT_CONFIG
    })?;

    let driver: Arc<dyn ContainerDriver> = Arc::new(DockerDriver::connect().map_err(|err| {
        tracing::error!(error = %err, "container runtime unavailable");
        EXIT_DRIVER
    })?);

    let runtime_id = format!("vea-{}", nanoid::nanoid!(10));
    let outcome = startup(&config, runtime_id, driver).await.map_err(|err| {
        tracing::error!(error = %err, "startup failed");
        EXIT_CATALOG
    })?;

    let reconciler_task = spawn_reconciler(outcome.reconciler, config.reconciler_interval);

    let health_state = HealthState {
        catalog: outcome.ctx.catalog.clone(),
        runtime_id: outcome.ctx.runtime_id.clone(),
        started_at: std::time::Instant::now(),
    };
    let health_addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.health_port));
    let health_task = tokio::spawn(async move {
        if let Err(err) = health::serve(health_addr, health_state).await {
            tracing::error!(error = %err, "health endpoint stopped");
        }
    });

    let listener_addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let tcp_listener = tokio::net::TcpListener::bind(listener_addr).await.map_err(|err| {
        tracing::error!(error = %err, "failed to bind request dispatcher port");
        EXIT_CONFIG
    })?;
    tracing::info!(addr = %listener_addr, "request dispatcher listening");

    let dispatcher_ctx = outcome.ctx.clone();
    let dispatcher_task = tokio::spawn(listener::run(tcp_listener, dispatcher_ctx));

    tokio::signal::ctrl_c().await.ok();
    tracing::info!("shutdown signal received");
    reconciler_task.abort();
    health_task.abort();
    dispatcher_task.abort();

    Ok(())
}

fn init_tracing(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let appender = tracing_appender::rolling::never(&config.data_dir, "daemon.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("VEA_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .init();
    Some(guard)
}
