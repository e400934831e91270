// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vea deploy` — upload a script or binary payload and register it with `vead`.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use vea_core::{AppId, Ecosystem};
use vea_wire::{DependencySpec, Request};

use crate::client::{request_id, VeaClient};
use crate::commands::print_lifecycle;
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Caller-chosen application id, e.g. `app-checkout-worker`.
    pub app_id: String,

    /// Path to the source file to deploy (script source or binary).
    pub source: PathBuf,

    /// Interpreter language for a script payload, or `binary` for a compiled payload.
    #[arg(long, default_value = "python")]
    pub language: String,

    /// Entry point invoked inside the container (file name or binary arg0).
    #[arg(long)]
    pub entry_point: String,

    /// A dependency to install before running, as `ecosystem:name[@version]`,
    /// e.g. `pip:requests@2.31` or `npm:left-pad`. Repeatable.
    #[arg(long = "dep", value_name = "ECOSYSTEM:NAME[@VERSION]")]
    pub dependencies: Vec<String>,
}

pub async fn handle(client: &mut VeaClient, format: OutputFormat, args: DeployArgs) -> Result<()> {
    let code = std::fs::read_to_string(&args.source)
        .with_context(|| format!("reading {}", args.source.display()))?;
    let dependencies = args
        .dependencies
        .iter()
        .map(|raw| parse_dependency(raw))
        .collect::<Result<Vec<_>>>()?;

    let response = client
        .call(Request::DeployRequest {
            id: request_id(),
            app_id: AppId::from_string(args.app_id),
            code,
            language: args.language,
            entry_point: args.entry_point,
            dependencies,
        })
        .await?;

    print_lifecycle(format, response)
}

fn parse_dependency(raw: &str) -> Result<DependencySpec> {
    let (ecosystem, rest) = raw
        .split_once(':')
        .with_context(|| format!("invalid --dep {raw:?}, expected ECOSYSTEM:NAME[@VERSION]"))?;
    if rest.is_empty() {
        bail!("invalid --dep {raw:?}, missing a package name");
    }
    let (name, version) = match rest.split_once('@') {
        Some((name, version)) => (name.to_string(), Some(version.to_string())),
        None => (rest.to_string(), None),
    };
    let ecosystem = match ecosystem {
        "pip" => Ecosystem::Pip,
        "npm" => Ecosystem::Npm,
        other => Ecosystem::Other(other.to_string()),
    };
    Ok(DependencySpec { ecosystem, name, version })
}

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod tests;
