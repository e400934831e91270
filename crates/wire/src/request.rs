// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request envelope (spec §4.8). Every request carries `type` and `id`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vea_core::app::AppId;
use vea_core::dependency::Ecosystem;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySpec {
    pub ecosystem: Ecosystem,
    pub name: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    RegisterClient { id: String, client_info: ClientInfo },
    DeployRequest {
        id: String,
        app_id: AppId,
        code: String,
        language: String,
        entry_point: String,
        dependencies: Vec<DependencySpec>,
    },
    RunApp { id: String, app_id: AppId },
    /// `subject` accepts either an `appId` or an `executionId` (spec §4.4
    /// `resolve(id)`), so it is carried as a raw string rather than
    /// `AppId`.
    StopApp { id: String, subject: String },
    PauseApp { id: String, app_id: AppId },
    ResumeApp { id: String, app_id: AppId },
    UninstallApp { id: String, app_id: AppId },
    ListDeployedApps { id: String },
    GetSignalsValue { id: String, paths: Vec<String> },
    WriteSignalsValue { id: String, values: HashMap<String, serde_json::Value> },
    SubscribeApis { id: String, paths: Vec<String> },
    GetRuntimeInfo { id: String },
    Ping { id: String },
}

impl Request {
    pub fn id(&self) -> &str {
        match self {
            Request::RegisterClient { id, .. }
            | Request::DeployRequest { id, .. }
            | Request::RunApp { id, .. }
            | Request::StopApp { id, .. }
            | Request::PauseApp { id, .. }
            | Request::ResumeApp { id, .. }
            | Request::UninstallApp { id, .. }
            | Request::ListDeployedApps { id }
            | Request::GetSignalsValue { id, .. }
            | Request::WriteSignalsValue { id, .. }
            | Request::SubscribeApis { id, .. }
            | Request::GetRuntimeInfo { id }
            | Request::Ping { id } => id,
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
