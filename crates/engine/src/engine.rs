// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution Engine (C4, spec §4.4).
//!
//! Owns the per-Application finite state machine: `absent → installing →
//! installed → starting → running ↔ paused → stopped / error`, plus
//! `uninstalling → absent`. Per-`appId` operations serialize on a keyed
//! async mutex map; distinct `appId`s proceed in parallel.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::warn;

use vea_core::app::{AppId, AppKind, Application, ApplicationStatus, ResourceLimits};
use vea_core::clock::Clock;
use vea_core::dependency::DependencyDecl;
use vea_core::event::RuntimeEvent;
use vea_core::execution::{Execution, ExecutionId, RuntimeState};
use vea_core::signal::SignalGateway;
use vea_driver::{
    container_name, ContainerDriver, ContainerHandle, ContainerSpec, ContainerStatus, Mount,
    ResourceCaps, TmpfsMount,
};
use vea_storage::Catalog;

use crate::dependencies::DependencyInstaller;
use crate::error::EngineError;
use crate::pipeline::{spawn_forwarders, OutputPipeline};

/// Image references, resource defaults, and storage layout the engine
/// needs at Start time. Mirrors spec §6's configuration keys.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub image_script: String,
    pub image_binary: String,
    pub data_dir: PathBuf,
    pub grace_timeout: Duration,
    pub network_mode: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            image_script: "vea-script-runtime:latest".to_string(),
            image_binary: "vea-binary-runtime:latest".to_string(),
            data_dir: PathBuf::from("/var/lib/vea"),
            grace_timeout: Duration::from_secs(10),
            network_mode: "bridge".to_string(),
        }
    }
}

/// Everything an `install_request`/`deploy_request` carries (spec §4.8).
#[derive(Debug, Clone)]
pub struct InstallSpec {
    pub app_id: AppId,
    pub name: String,
    pub version: String,
    pub description: String,
    pub kind: AppKind,
    pub source: Vec<u8>,
    pub entry_point: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub cwd_hint: Option<PathBuf>,
    pub dependencies: Vec<DependencyDecl>,
    pub signal_interests: Vec<String>,
    pub resource_limits: Option<ResourceLimits>,
}

fn kind_dir(kind: AppKind) -> &'static str {
    match kind {
        AppKind::Script => "script",
        AppKind::Binary => "binary",
    }
}

/// Owns the per-Application state machine, bridging the Catalog, the
/// Container Driver, the Dependency Installer, and the Output Pipeline.
pub struct Engine {
    catalog: Catalog,
    driver: Arc<dyn ContainerDriver>,
    clock: Arc<dyn Clock>,
    pipeline: Arc<OutputPipeline>,
    dependencies: DependencyInstaller,
    signal_gateway: Arc<dyn SignalGateway>,
    runtime_id: String,
    config: EngineConfig,
    locks: Mutex<HashMap<AppId, Arc<tokio::sync::Mutex<()>>>>,
    /// Fast in-memory index from `appId` to its currently-live `executionId`,
    /// used both by `resolve()` and by the idempotent-Start guard. Rebuilt
    /// by the reconciler on restart (spec §5 shared-resource policy).
    live: Mutex<HashMap<AppId, ExecutionId>>,
    events: broadcast::Sender<RuntimeEvent>,
}

impl Engine {
    pub fn new(
        catalog: Catalog,
        driver: Arc<dyn ContainerDriver>,
        clock: Arc<dyn Clock>,
        pipeline: Arc<OutputPipeline>,
        dependencies: DependencyInstaller,
        signal_gateway: Arc<dyn SignalGateway>,
        runtime_id: String,
        config: EngineConfig,
    ) -> (Self, broadcast::Receiver<RuntimeEvent>) {
        let (tx, rx) = broadcast::channel(1024);
        let engine = Self {
            catalog,
            driver,
            clock,
            pipeline,
            dependencies,
            signal_gateway,
            runtime_id,
            config,
            locks: Mutex::new(HashMap::new()),
            live: Mutex::new(HashMap::new()),
            events: tx,
        };
        (engine, rx)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events.subscribe()
    }

    /// Returns the (lazily created) per-`appId` mutex itself, without
    /// locking it. Lets a caller that needs to acquire the lock later from
    /// a spawned task (e.g. `spawn_monitor`) get a handle to the same lock
    /// every other mutator serializes on.
    fn app_mutex(&self, app_id: AppId) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.lock().entry(app_id).or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))).clone()
    }

    async fn lock_app(&self, app_id: AppId) -> tokio::sync::OwnedMutexGuard<()> {
        self.app_mutex(app_id).lock_owned().await
    }

    /// Resolves either an `appId` or an `executionId` to the canonical
    /// `appId` (spec §4.4 ID resolution): (a) live Execution index, (b)
    /// catalog Executions table, (c) treat as `appId`, (d) `NotFound`.
    pub fn resolve(&self, id: &str) -> Result<AppId, EngineError> {
        if let Some(app_id) = self.live.lock().iter().find(|(_, exe)| exe.as_str() == id).map(|(app, _)| *app) {
            return Ok(app_id);
        }
        let execution_id = ExecutionId::from_string(id);
        if let Some(execution) = self.catalog.get_execution_by_id(execution_id) {
            return Ok(execution.app_id);
        }
        let app_id = AppId::from_string(id);
        if self.catalog.get_application(app_id).is_some() {
            return Ok(app_id);
        }
        Err(EngineError::NotFound(app_id))
    }

    fn transition(&self, app_id: AppId, status: ApplicationStatus) -> Result<(), EngineError> {
        let mut app = self.catalog.get_application(app_id).ok_or(EngineError::NotFound(app_id))?;
        app.status = status;
        app.updated_at_ms = self.clock.epoch_ms();
        app.revision += 1;
        self.catalog.update_application(app.clone())?;
        let _ = self.events.send(RuntimeEvent::ApplicationStateChanged { app_id, status });
        Ok(())
    }

    fn transition_error(&self, app_id: AppId, message: &str) {
        if let Some(mut app) = self.catalog.get_application(app_id) {
            app.status = ApplicationStatus::Error;
            app.updated_at_ms = self.clock.epoch_ms();
            app.revision += 1;
            let _ = self.catalog.update_application(app);
        }
        let _ = self.catalog.append_log(
            app_id,
            None,
            vea_core::log_record::LogStream::Status,
            vea_core::log_record::Severity::Error,
            self.clock.epoch_ms(),
            message.as_bytes().to_vec(),
        );
        let _ = self.events.send(RuntimeEvent::ApplicationStateChanged { app_id, status: ApplicationStatus::Error });
    }

    fn storage_path(&self, app_id: AppId, kind: AppKind) -> PathBuf {
        self.config.data_dir.join("applications").join(kind_dir(kind)).join(app_id.as_str())
    }

    fn dependencies_path(&self, app_id: AppId) -> PathBuf {
        self.config.data_dir.join("applications").join("dependencies").join(app_id.as_str())
    }

    /// Materializes `app`'s source under its storage directory and
    /// resolves its declared dependencies. Shared by `install` (first
    /// materialization) and `start` (step 4: re-materialize, tolerating a
    /// storage volume that was cleared between install and a later Start).
    fn materialize_and_resolve(&self, app: &Application) -> Result<(), EngineError> {
        std::fs::create_dir_all(&app.storage_path)
            .map_err(|e| EngineError::ValidationError(format!("cannot create storage path: {e}")))?;
        if matches!(app.kind, AppKind::Script) && !app.source.is_empty() {
            std::fs::write(app.storage_path.join(&app.entry_point), &app.source)
                .map_err(|e| EngineError::ValidationError(format!("cannot write entry point: {e}")))?;
        }

        if !app.dependencies.is_empty() {
            let deps_dir = self.dependencies_path(app.app_id);
            if let Err((name, msg)) =
                self.dependencies.install_declared(&self.catalog, app.app_id, &deps_dir, &app.dependencies)
            {
                return Err(EngineError::DependencyFailed(app.app_id, format!("{name}: {msg}")));
            }
        }
        Ok(())
    }

    /// Install transition: `absent → installed` (or `error` on failure).
    pub async fn install(&self, spec: InstallSpec) -> Result<(), EngineError> {
        if spec.entry_point.is_empty() {
            return Err(EngineError::ValidationError("entry_point is required".to_string()));
        }
        let _guard = self.lock_app(spec.app_id).await;
        let now = self.clock.epoch_ms();
        let storage_path = self.storage_path(spec.app_id, spec.kind);

        let app = Application {
            app_id: spec.app_id,
            name: spec.name,
            version: spec.version,
            description: spec.description,
            kind: spec.kind,
            source: spec.source,
            entry_point: spec.entry_point,
            args: spec.args,
            env: spec.env,
            cwd_hint: spec.cwd_hint,
            dependencies: spec.dependencies,
            signal_interests: spec.signal_interests,
            status: ApplicationStatus::Installing,
            created_at_ms: now,
            updated_at_ms: now,
            last_start_ms: None,
            total_run_ms: 0,
            storage_path,
            resource_limits: spec.resource_limits.unwrap_or_default(),
            revision: 0,
        };
        self.catalog.create_application(app.clone())?;

        if let Err(err) = self.materialize_and_resolve(&app) {
            self.transition_error(spec.app_id, &err.to_string());
            return Err(err);
        }

        self.transition(spec.app_id, ApplicationStatus::Installed)?;
        Ok(())
    }

    /// Start transition (spec §4.4 algorithm). Idempotent against a
    /// concurrent Start for the same `appId`: a second caller observes the
    /// in-progress `executionId` instead of creating a second container.
    pub async fn start(&self, id: &str) -> Result<(ExecutionId, String), EngineError> {
        let app_id = self.resolve(id)?;
        let _guard = self.lock_app(app_id).await;

        if let Some(execution_id) = self.live.lock().get(&app_id).copied() {
            if let Some(execution) = self.catalog.get_execution_by_app(app_id) {
                if !execution.runtime_state.is_terminal() {
                    return Ok((execution_id, execution.handle));
                }
            }
        }

        let mut app = self.catalog.get_application(app_id).ok_or(EngineError::NotFound(app_id))?;
        if !app.startable() {
            return Err(EngineError::InvalidState(app_id));
        }

        app.status = ApplicationStatus::Starting;
        app.last_start_ms = Some(self.clock.epoch_ms());
        app.updated_at_ms = self.clock.epoch_ms();
        app.revision += 1;
        self.catalog.update_application(app.clone())?;
        let _ =
            self.events.send(RuntimeEvent::ApplicationStateChanged { app_id, status: ApplicationStatus::Starting });

        if let Err(err) = self.materialize_and_resolve(&app) {
            self.transition_error(app_id, &err.to_string());
            return Err(err);
        }

        let execution_id = ExecutionId::new();
        let name = container_name(app_id.as_str());

        if let Ok(existing) = self.driver.inspect(&ContainerHandle(name.clone())).await {
            match existing.status {
                ContainerStatus::Running | ContainerStatus::Paused => {
                    let message = format!("Conflict: container name {name} in use");
                    self.transition_error(app_id, &message);
                    return Err(EngineError::Conflict(name));
                }
                ContainerStatus::Exited | ContainerStatus::Missing => {
                    let _ = self.driver.remove(&ContainerHandle(name.clone()), true).await;
                }
            }
        }

        let spec = self.compose_container_spec(&app, app_id, execution_id, &name);

        if let Err(err) = self.driver.ensure_image(&spec.image).await {
            self.transition_error(app_id, &err.to_string());
            return Err(err.into());
        }
        let handle = match self.driver.create(spec).await {
            Ok(handle) => handle,
            Err(err) => {
                self.transition_error(app_id, &err.to_string());
                return Err(err.into());
            }
        };

        if let Err(err) = self.driver.start(&handle).await {
            let _ = self.driver.remove(&handle, true).await;
            self.transition_error(app_id, &err.to_string());
            return Err(err.into());
        }

        let streams = match self.driver.attach(&handle).await {
            Ok(streams) => streams,
            Err(err) => {
                let _ = self.driver.stop(&handle, self.config.grace_timeout).await;
                let _ = self.driver.remove(&handle, true).await;
                self.transition_error(app_id, &err.to_string());
                return Err(err.into());
            }
        };

        let execution = Execution {
            app_id,
            execution_id,
            handle: handle.0.clone(),
            runtime_state: RuntimeState::Running,
            exit_code: None,
            last_heartbeat_ms: self.clock.epoch_ms(),
            resource_limits: app.resource_limits,
            started_at_ms: self.clock.epoch_ms(),
        };
        self.catalog.upsert_execution(execution)?;
        self.live.lock().insert(app_id, execution_id);

        spawn_forwarders(
            self.pipeline.clone(),
            self.catalog.clone(),
            self.clock.clone(),
            app_id,
            execution_id,
            streams.stdout,
            streams.stderr,
        );

        self.transition(app_id, ApplicationStatus::Running)?;
        self.spawn_monitor(app_id, execution_id, handle.clone());

        Ok((execution_id, handle.0))
    }

    fn compose_container_spec(
        &self,
        app: &Application,
        app_id: AppId,
        execution_id: ExecutionId,
        name: &str,
    ) -> ContainerSpec {
        let mut env = app.env.clone();
        env.insert("APP_ID".to_string(), app_id.to_string());
        env.insert("EXECUTION_ID".to_string(), execution_id.to_string());
        if let Some(endpoint) = self.signal_gateway.endpoint() {
            env.insert("VEA_SIGNAL_HOST".to_string(), endpoint.host);
            env.insert("VEA_SIGNAL_PORT".to_string(), endpoint.port.to_string());
            if let Some(credential) = endpoint.credential {
                env.insert("VEA_SIGNAL_CREDENTIAL".to_string(), credential);
            }
        }

        let mut labels = HashMap::new();
        labels.insert("runtime".to_string(), self.runtime_id.clone());
        labels.insert("appId".to_string(), app_id.to_string());

        let (image, command, mounts) = match app.kind {
            AppKind::Script => {
                let mut command = vec!["python3".to_string(), app.entry_point.clone()];
                command.extend(app.args.clone());
                let mounts = vec![Mount {
                    source: self.dependencies_path(app_id).to_string_lossy().into_owned(),
                    target: "/opt/vea/deps".to_string(),
                    read_only: true,
                }];
                (self.config.image_script.clone(), command, mounts)
            }
            AppKind::Binary => {
                let mut command = vec![app.entry_point.clone()];
                command.extend(app.args.clone());
                (self.config.image_binary.clone(), command, Vec::new())
            }
        };

        ContainerSpec {
            name: name.to_string(),
            image,
            working_dir: app.cwd_hint.as_ref().map(|p| p.to_string_lossy().into_owned()),
            command,
            env,
            mounts,
            tmpfs: vec![TmpfsMount { target: "/tmp".to_string(), size_bytes: app.resource_limits.tmpfs_bytes }],
            resources: ResourceCaps {
                memory_bytes: app.resource_limits.memory_bytes,
                cpu_quota_us: app.resource_limits.cpu_quota_us,
            },
            network_mode: self.config.network_mode.clone(),
            labels,
        }
    }

    /// Spawns the background task that awaits the container's terminal
    /// exit and updates catalog state (spec §4.4 step 9). Re-acquires the
    /// same per-`appId` lock every foreground mutator holds while it
    /// writes, so a monitor left over from a superseded Execution (e.g.
    /// uninstall+reinstall racing the old container's exit) can't stomp a
    /// newer Application/Execution pair. The Application write is a
    /// compare-and-swap on `revision`, guarding the catalog update as well
    /// as the lock.
    fn spawn_monitor(&self, app_id: AppId, execution_id: ExecutionId, handle: ContainerHandle) {
        let catalog = self.catalog.clone();
        let driver = self.driver.clone();
        let clock = self.clock.clone();
        let pipeline = self.pipeline.clone();
        let events = self.events.clone();
        let mutex = self.app_mutex(app_id);
        tokio::spawn(async move {
            let exit_code = driver.wait(&handle).await.unwrap_or(-1);
            let state = if exit_code == 0 { RuntimeState::Stopped } else { RuntimeState::Error };

            let _guard = mutex.lock_owned().await;

            let still_current = match catalog.get_execution_by_app(app_id) {
                Some(mut execution) if execution.execution_id == execution_id => {
                    execution.runtime_state = state;
                    execution.exit_code = Some(exit_code as i32);
                    execution.last_heartbeat_ms = clock.epoch_ms();
                    let _ = catalog.upsert_execution(execution);
                    true
                }
                _ => false,
            };

            if still_current {
                if let Some(mut app) = catalog.get_application(app_id) {
                    let status = if state == RuntimeState::Stopped {
                        ApplicationStatus::Stopped
                    } else {
                        ApplicationStatus::Error
                    };
                    let expected_revision = app.revision;
                    app.status = status;
                    app.updated_at_ms = clock.epoch_ms();
                    app.revision += 1;
                    if catalog.compare_and_swap_application(expected_revision, app).is_ok() {
                        let _ = events.send(RuntimeEvent::ApplicationStateChanged { app_id, status });
                    }
                }
            }
            pipeline.unsubscribe_all(execution_id);
        });
    }

    pub async fn pause(&self, id: &str) -> Result<(), EngineError> {
        let app_id = self.resolve(id)?;
        let _guard = self.lock_app(app_id).await;
        let app = self.catalog.get_application(app_id).ok_or(EngineError::NotFound(app_id))?;
        if app.status != ApplicationStatus::Running {
            return Err(EngineError::InvalidState(app_id));
        }
        let execution = self.catalog.get_execution_by_app(app_id).ok_or(EngineError::NotFound(app_id))?;
        let handle = ContainerHandle(execution.handle.clone());

        if let Err(err) = self.driver.pause(&handle).await {
            warn!(app_id = %app_id, error = %err, "pause failed, retaining running state");
            return Err(err.into());
        }

        let mut execution = execution;
        execution.runtime_state = RuntimeState::Paused;
        self.catalog.upsert_execution(execution)?;
        self.transition(app_id, ApplicationStatus::Paused)?;
        Ok(())
    }

    pub async fn resume(&self, id: &str) -> Result<(), EngineError> {
        let app_id = self.resolve(id)?;
        let _guard = self.lock_app(app_id).await;
        let app = self.catalog.get_application(app_id).ok_or(EngineError::NotFound(app_id))?;
        if app.status != ApplicationStatus::Paused {
            return Err(EngineError::InvalidState(app_id));
        }
        let execution = self.catalog.get_execution_by_app(app_id).ok_or(EngineError::NotFound(app_id))?;
        let handle = ContainerHandle(execution.handle.clone());

        if let Err(err) = self.driver.resume(&handle).await {
            warn!(app_id = %app_id, error = %err, "resume failed, retaining paused state");
            return Err(err.into());
        }

        let mut execution = execution;
        execution.runtime_state = RuntimeState::Running;
        self.catalog.upsert_execution(execution)?;
        self.transition(app_id, ApplicationStatus::Running)?;
        Ok(())
    }

    /// Stop transition. Idempotent: a second Stop call observes the same
    /// terminal exit code without transitioning state further.
    pub async fn stop(&self, id: &str) -> Result<Option<i32>, EngineError> {
        let app_id = self.resolve(id)?;
        let _guard = self.lock_app(app_id).await;
        let app = self.catalog.get_application(app_id).ok_or(EngineError::NotFound(app_id))?;
        if !matches!(app.status, ApplicationStatus::Running | ApplicationStatus::Paused) {
            if app.status == ApplicationStatus::Stopped || app.status == ApplicationStatus::Error {
                let exit_code = self.catalog.get_execution_by_app(app_id).and_then(|e| e.exit_code);
                return Ok(exit_code);
            }
            return Err(EngineError::InvalidState(app_id));
        }
        let mut execution = self.catalog.get_execution_by_app(app_id).ok_or(EngineError::NotFound(app_id))?;
        let handle = ContainerHandle(execution.handle.clone());

        let exit_code = match self.driver.stop(&handle, self.config.grace_timeout).await {
            Ok(()) => match self.driver.inspect(&handle).await {
                Ok(inspect) => inspect.exit_code.unwrap_or(0) as i32,
                Err(_) => 0,
            },
            Err(err) => {
                warn!(app_id = %app_id, error = %err, "graceful stop failed, forcing removal");
                let _ = self.driver.remove(&handle, true).await;
                -1
            }
        };

        execution.runtime_state = RuntimeState::Stopped;
        execution.exit_code = Some(exit_code);
        self.catalog.upsert_execution(execution)?;
        self.live.lock().remove(&app_id);
        self.transition(app_id, ApplicationStatus::Stopped)?;
        Ok(Some(exit_code))
    }

    /// Uninstall transition: Stop (if live), Remove container, delete
    /// storage, delete catalog row. Partial cleanup is logged but the row
    /// is still deleted whenever possible (spec §4.4 transition table).
    pub async fn uninstall(&self, id: &str) -> Result<(), EngineError> {
        let app_id = self.resolve(id)?;
        let _guard = self.lock_app(app_id).await;
        let app = self.catalog.get_application(app_id).ok_or(EngineError::NotFound(app_id))?;

        if let Some(execution) = self.catalog.get_execution_by_app(app_id) {
            if !execution.runtime_state.is_terminal() {
                let handle = ContainerHandle(execution.handle.clone());
                if let Err(err) = self.driver.stop(&handle, self.config.grace_timeout).await {
                    warn!(app_id = %app_id, error = %err, "stop during uninstall failed, forcing removal");
                }
                if let Err(err) = self.driver.remove(&handle, true).await {
                    warn!(app_id = %app_id, error = %err, "container removal during uninstall failed");
                }
            }
        }

        if app.storage_path.exists() {
            if let Err(err) = std::fs::remove_dir_all(&app.storage_path) {
                warn!(app_id = %app_id, error = %err, "storage cleanup during uninstall failed");
            }
        }

        self.live.lock().remove(&app_id);
        self.catalog.delete_application(app_id)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
