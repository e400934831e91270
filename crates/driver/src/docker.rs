// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Docker Engine API implementation of `ContainerDriver`, grounded on the
//! sibling pack's Docker-management daemon.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bollard::container::{
    AttachContainerOptions, AttachContainerResults, Config as DockerConfig,
    CreateContainerOptions, InspectContainerOptions, ListContainersOptions,
    RemoveContainerOptions, StartContainerOptions, StopContainerOptions, WaitContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::models::{HostConfig, Mount as DockerMount, MountTypeEnum, RestartPolicy, RestartPolicyNameEnum};
use bollard::Docker;
use futures_util::StreamExt;
use tracing::{debug, info, warn};

use crate::driver_trait::ContainerDriver;
use crate::error::DriverError;
use crate::spec::{
    AttachedStreams, ContainerHandle, ContainerSpec, ContainerStatus, InspectResult,
};

pub struct DockerDriver {
    docker: Docker,
}

impl DockerDriver {
    /// Connects using the local Docker socket, respecting `DOCKER_HOST`
    /// the same way the Docker CLI does.
    pub fn connect() -> Result<Self, DriverError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| DriverError::EngineUnavailable(e.to_string()))?;
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerDriver for DockerDriver {
    async fn ensure_image(&self, image_ref: &str) -> Result<(), DriverError> {
        match self.docker.inspect_image(image_ref).await {
            Ok(_) => {
                debug!("image {} already present", image_ref);
                return Ok(());
            }
            Err(bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }) => {
                info!("image {} not found, pulling", image_ref);
            }
            Err(e) => {
                warn!("error inspecting image {}: {}", image_ref, e);
            }
        }

        let options = CreateImageOptions { from_image: image_ref, ..Default::default() };
        let mut stream = self.docker.create_image(Some(options), None, None);
        while let Some(result) = stream.next().await {
            result.map_err(|e| DriverError::ImageMissing(e.to_string()))?;
        }
        Ok(())
    }

    async fn create(&self, spec: ContainerSpec) -> Result<ContainerHandle, DriverError> {
        let env: Vec<String> = spec.env.iter().map(|(k, v)| format!("{k}={v}")).collect();

        let mounts: Vec<DockerMount> = spec
            .mounts
            .iter()
            .map(|m| DockerMount {
                source: Some(m.source.clone()),
                target: Some(m.target.clone()),
                typ: Some(MountTypeEnum::BIND),
                read_only: Some(m.read_only),
                ..Default::default()
            })
            .collect();

        let tmpfs: HashMap<String, String> = spec
            .tmpfs
            .iter()
            .map(|t| {
                (
                    t.target.clone(),
                    format!("rw,noexec,nosuid,size={}", t.size_bytes),
                )
            })
            .collect();

        let host_config = HostConfig {
            mounts: Some(mounts),
            tmpfs: Some(tmpfs),
            memory: Some(spec.resources.memory_bytes as i64),
            cpu_quota: Some(spec.resources.cpu_quota_us as i64),
            cpu_period: Some(100_000),
            network_mode: Some(spec.network_mode.clone()),
            restart_policy: Some(RestartPolicy {
                name: Some(RestartPolicyNameEnum::NO),
                ..Default::default()
            }),
            security_opt: Some(vec!["no-new-privileges".to_string()]),
            ..Default::default()
        };

        let container_config = DockerConfig {
            image: Some(spec.image.clone()),
            env: Some(env),
            cmd: Some(spec.command.clone()),
            working_dir: spec.working_dir.clone(),
            labels: Some(spec.labels.clone()),
            host_config: Some(host_config),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            ..Default::default()
        };

        let options = CreateContainerOptions { name: spec.name.clone(), platform: None };
        self.docker.create_container(Some(options), container_config).await?;
        Ok(ContainerHandle(spec.name))
    }

    async fn start(&self, handle: &ContainerHandle) -> Result<(), DriverError> {
        self.docker
            .start_container(&handle.0, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop(&self, handle: &ContainerHandle, graceful_timeout: Duration) -> Result<(), DriverError> {
        let options = StopContainerOptions { t: graceful_timeout.as_secs() as i64 };
        match self.docker.stop_container(&handle.0, Some(options)).await {
            Ok(()) => Ok(()),
            Err(bollard::errors::Error::DockerResponseServerError { status_code: 304, .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn pause(&self, handle: &ContainerHandle) -> Result<(), DriverError> {
        self.docker.pause_container(&handle.0).await.map_err(Into::into)
    }

    async fn resume(&self, handle: &ContainerHandle) -> Result<(), DriverError> {
        self.docker.unpause_container(&handle.0).await.map_err(Into::into)
    }

    async fn remove(&self, handle: &ContainerHandle, force: bool) -> Result<(), DriverError> {
        let options = RemoveContainerOptions { force, v: false, ..Default::default() };
        match self.docker.remove_container(&handle.0, Some(options)).await {
            Ok(()) => Ok(()),
            Err(bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn attach(&self, handle: &ContainerHandle) -> Result<AttachedStreams, DriverError> {
        let options = AttachContainerOptions::<String> {
            stdout: Some(true),
            stderr: Some(true),
            stream: Some(true),
            logs: Some(false),
            ..Default::default()
        };
        let AttachContainerResults { mut output, .. } =
            self.docker.attach_container(&handle.0, Some(options)).await?;

        let (stdout_tx, stdout_rx) = tokio::sync::mpsc::channel(256);
        let (stderr_tx, stderr_rx) = tokio::sync::mpsc::channel(256);

        tokio::spawn(async move {
            while let Some(chunk) = output.next().await {
                match chunk {
                    Ok(log_output) => {
                        let is_stderr = matches!(log_output, bollard::container::LogOutput::StdErr { .. });
                        let bytes = log_output.into_bytes().to_vec();
                        let sender = if is_stderr { &stderr_tx } else { &stdout_tx };
                        if sender.send(bytes).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("attach stream error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(AttachedStreams { stdout: stdout_rx, stderr: stderr_rx })
    }

    async fn wait(&self, handle: &ContainerHandle) -> Result<i64, DriverError> {
        let options = WaitContainerOptions { condition: "not-running" };
        let mut stream = self.docker.wait_container(&handle.0, Some(options));
        while let Some(result) = stream.next().await {
            match result {
                Ok(response) => return Ok(response.status_code),
                Err(bollard::errors::Error::DockerContainerWaitError { code, .. }) => return Ok(code),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(0)
    }

    async fn inspect(&self, handle: &ContainerHandle) -> Result<InspectResult, DriverError> {
        let response = self
            .docker
            .inspect_container(&handle.0, None::<InspectContainerOptions>)
            .await?;

        let state = response.state.unwrap_or_default();
        let status = if state.running.unwrap_or(false) {
            ContainerStatus::Running
        } else if state.paused.unwrap_or(false) {
            ContainerStatus::Paused
        } else if state.status.is_some() {
            ContainerStatus::Exited
        } else {
            ContainerStatus::Missing
        };

        let config = response.config.unwrap_or_default();
        Ok(InspectResult {
            status,
            exit_code: state.exit_code,
            started_at_ms: None,
            finished_at_ms: None,
            name: response.name.unwrap_or_default().trim_start_matches('/').to_string(),
            labels: config.labels.unwrap_or_default(),
            env: config.env.unwrap_or_default(),
        })
    }

    async fn list_by_label(&self, label: &str) -> Result<Vec<InspectResult>, DriverError> {
        let mut filters = HashMap::new();
        filters.insert("label".to_string(), vec![label.to_string()]);
        let options = ListContainersOptions { all: true, filters, ..Default::default() };
        let containers = self.docker.list_containers(Some(options)).await?;

        let mut results = Vec::with_capacity(containers.len());
        for summary in containers {
            let handle = ContainerHandle(
                summary
                    .names
                    .and_then(|names| names.into_iter().next())
                    .unwrap_or_default()
                    .trim_start_matches('/')
                    .to_string(),
            );
            results.push(self.inspect(&handle).await?);
        }
        Ok(results)
    }
}
