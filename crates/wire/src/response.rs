// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response envelope (spec §4.8, §6). Every response echoes the
//! originating request's `id`; errors carry `app_id` (or null).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vea_core::app::{AppId, Application};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub path: String,
    pub ok: bool,
    pub error: Option<String>,
}

/// The fields every lifecycle-operation response carries in common (spec
/// §4.8: "Response envelope for lifecycle operations MUST contain at
/// least: status, result, state, and echoed id").
#[derive(Debug, Clone)]
pub struct LifecycleFields {
    pub status: String,
    pub result: String,
    pub state: String,
    pub app_id: AppId,
    pub execution_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    RegisterClientResponse { id: String, runtime_id: String, capabilities: Vec<String> },

    /// Spec §4.8/§8 scenario 1 requires the wire tag to be
    /// `"<request-type>-response"`, so each lifecycle operation gets its
    /// own variant rather than a single shared `LifecycleResponse` tag;
    /// all six carry the same field set.
    #[serde(rename = "deploy_request-response")]
    DeployResponse {
        id: String,
        status: String,
        result: String,
        state: String,
        app_id: AppId,
        #[serde(skip_serializing_if = "Option::is_none")]
        execution_id: Option<String>,
    },
    #[serde(rename = "run_app-response")]
    RunResponse {
        id: String,
        status: String,
        result: String,
        state: String,
        app_id: AppId,
        #[serde(skip_serializing_if = "Option::is_none")]
        execution_id: Option<String>,
    },
    #[serde(rename = "stop_app-response")]
    StopResponse {
        id: String,
        status: String,
        result: String,
        state: String,
        app_id: AppId,
        #[serde(skip_serializing_if = "Option::is_none")]
        execution_id: Option<String>,
    },
    #[serde(rename = "pause_app-response")]
    PauseResponse {
        id: String,
        status: String,
        result: String,
        state: String,
        app_id: AppId,
        #[serde(skip_serializing_if = "Option::is_none")]
        execution_id: Option<String>,
    },
    #[serde(rename = "resume_app-response")]
    ResumeResponse {
        id: String,
        status: String,
        result: String,
        state: String,
        app_id: AppId,
        #[serde(skip_serializing_if = "Option::is_none")]
        execution_id: Option<String>,
    },
    #[serde(rename = "uninstall_app-response")]
    UninstallResponse {
        id: String,
        status: String,
        result: String,
        state: String,
        app_id: AppId,
        #[serde(skip_serializing_if = "Option::is_none")]
        execution_id: Option<String>,
    },

    ListDeployedAppsResponse { id: String, applications: Vec<Application> },
    GetSignalsValueResponse { id: String, values: HashMap<String, serde_json::Value> },
    WriteSignalsValueResponse { id: String, results: Vec<WriteOutcome> },
    SubscribeApisResponse { id: String, subscription_id: u64 },
    GetRuntimeInfoResponse { id: String, runtime_id: String, version: String, capabilities: Vec<String> },
    PongResponse { id: String, server_time_ms: u64 },

    Error { id: String, error: String, app_id: Option<AppId> },
}

impl Response {
    pub fn id(&self) -> &str {
        match self {
            Response::RegisterClientResponse { id, .. }
            | Response::DeployResponse { id, .. }
            | Response::RunResponse { id, .. }
            | Response::StopResponse { id, .. }
            | Response::PauseResponse { id, .. }
            | Response::ResumeResponse { id, .. }
            | Response::UninstallResponse { id, .. }
            | Response::ListDeployedAppsResponse { id, .. }
            | Response::GetSignalsValueResponse { id, .. }
            | Response::WriteSignalsValueResponse { id, .. }
            | Response::SubscribeApisResponse { id, .. }
            | Response::GetRuntimeInfoResponse { id, .. }
            | Response::PongResponse { id, .. }
            | Response::Error { id, .. } => id,
        }
    }

    pub fn error(id: impl Into<String>, message: impl Into<String>, app_id: Option<AppId>) -> Self {
        Response::Error { id: id.into(), error: message.into(), app_id }
    }

    /// Extracts the common fields out of whichever lifecycle-operation
    /// variant this is, or `None` for every other response type.
    pub fn lifecycle_fields(self) -> Option<LifecycleFields> {
        match self {
            Response::DeployResponse { status, result, state, app_id, execution_id, .. }
            | Response::RunResponse { status, result, state, app_id, execution_id, .. }
            | Response::StopResponse { status, result, state, app_id, execution_id, .. }
            | Response::PauseResponse { status, result, state, app_id, execution_id, .. }
            | Response::ResumeResponse { status, result, state, app_id, execution_id, .. }
            | Response::UninstallResponse { status, result, state, app_id, execution_id, .. } => {
                Some(LifecycleFields { status, result, state, app_id, execution_id })
            }
            _ => None,
        }
    }
}

/// Streaming events pushed by the server without request correlation
/// (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    ConsoleOutput { app_id: AppId, execution_id: Option<String>, stream: String, data: String },
    StateChanged { app_id: AppId, state: String },
    SignalUpdate { path: String, value: serde_json::Value },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
