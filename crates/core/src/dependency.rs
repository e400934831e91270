// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declared and catalog-tracked library dependencies (spec §3, §4.3).

use crate::app::AppId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Package ecosystem a dependency is resolved from. Opaque to the engine;
/// only the Dependency Installer interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ecosystem {
    Pip,
    Npm,
    Other(String),
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ecosystem::Pip => write!(f, "pip"),
            Ecosystem::Npm => write!(f, "npm"),
            Ecosystem::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A library requirement declared on an Application at install time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDecl {
    pub ecosystem: Ecosystem,
    pub name: String,
    pub version: Option<String>,
}

/// Outcome of resolving one declared dependency (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStatus {
    Declared,
    Installed,
    Failed,
}

crate::simple_display! {
    InstallStatus {
        Declared => "declared",
        Installed => "installed",
        Failed => "failed",
    }
}

/// Catalog row recording the resolution outcome of one declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub app_id: AppId,
    pub ecosystem: Ecosystem,
    pub name: String,
    pub version: Option<String>,
    pub status: InstallStatus,
    pub error: Option<String>,
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
