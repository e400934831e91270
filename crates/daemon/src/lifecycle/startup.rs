// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup: wires the Catalog, Container Driver, Dependency Installer,
//! Signal Gateway, and Execution Engine together, runs one synchronous
//! reconcile pass, and hands back a [`DispatcherCtx`] ready to accept
//! connections.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use vea_core::clock::{Clock, SystemClock};
use vea_core::signal::{DisabledSignalGateway, SignalGateway};
use vea_driver::ContainerDriver;
use vea_engine::{DependencyInstaller, Engine, EngineConfig, OutputPipeline, PipInstaller, Reconciler};
use vea_storage::{Catalog, CatalogError};

use crate::config::Config;
use crate::listener::DispatcherCtx;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to open catalog: {0}")]
    Catalog(#[from] CatalogError),
}

pub struct StartupOutcome {
    pub ctx: Arc<DispatcherCtx>,
    pub reconciler: Arc<Reconciler>,
}

/// Wires the Catalog, Engine, and Reconciler together and runs one
/// synchronous reconcile pass before the Dispatcher accepts connections.
/// The Container Driver is injected so the choice of Docker vs. a test
/// double lives with the caller (`main.rs` connects Docker; tests pass a
/// `FakeDriver`).
pub async fn startup(
    config: &Config,
    runtime_id: String,
    driver: Arc<dyn ContainerDriver>,
) -> Result<StartupOutcome, StartupError> {
    std::fs::create_dir_all(&config.data_dir)?;
    let catalog = Catalog::open(&config.data_dir, Some(config.log_retention_per_app))?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let pipeline = Arc::new(OutputPipeline::new(vea_engine::pipeline::DEFAULT_RING_BYTES));
    let dependencies = DependencyInstaller::new(vec![Box::new(PipInstaller)]);
    // No real Signal Gateway implementation ships in this crate (spec §4.7
    // scopes it out); `signal_gateway_enabled` is reserved for a future
    // adapter and does not change this no-op today.
    let signal_gateway: Arc<dyn SignalGateway> = Arc::new(DisabledSignalGateway);

    let engine_config = EngineConfig {
        image_script: config.container_image_script.clone(),
        image_binary: config.container_image_binary.clone(),
        data_dir: config.data_dir.clone(),
        grace_timeout: Duration::from_secs(10),
        network_mode: "bridge".to_string(),
    };

    let (engine, _initial_rx) = Engine::new(
        catalog.clone(),
        driver.clone(),
        clock.clone(),
        pipeline.clone(),
        dependencies,
        signal_gateway.clone(),
        runtime_id.clone(),
        engine_config,
    );

    let reconciler = Arc::new(Reconciler::new(catalog.clone(), driver, clock.clone(), runtime_id.clone()));
    info!("running startup reconcile pass");
    reconciler.run_once().await;

    let ctx = Arc::new(DispatcherCtx {
        engine: Arc::new(engine),
        catalog,
        pipeline,
        signal_gateway,
        clock,
        runtime_id,
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    Ok(StartupOutcome { ctx, reconciler })
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
