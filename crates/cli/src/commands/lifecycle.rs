// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vea run|stop|pause|resume|uninstall` — single-application lifecycle transitions.

use anyhow::Result;
use clap::Args;
use vea_core::AppId;
use vea_wire::Request;

use crate::client::{request_id, VeaClient};
use crate::commands::print_lifecycle;
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct AppIdArg {
    pub app_id: String,
}

/// `stop` additionally accepts an execution id in place of an app id
/// (spec §4.4 `resolve(id)`), so it takes a bare subject string instead.
#[derive(Args, Debug)]
pub struct StopArgs {
    pub subject: String,
}

pub async fn run(client: &mut VeaClient, format: OutputFormat, args: AppIdArg) -> Result<()> {
    let response =
        client.call(Request::RunApp { id: request_id(), app_id: AppId::from_string(args.app_id) }).await?;
    print_lifecycle(format, response)
}

pub async fn stop(client: &mut VeaClient, format: OutputFormat, args: StopArgs) -> Result<()> {
    let response = client.call(Request::StopApp { id: request_id(), subject: args.subject }).await?;
    print_lifecycle(format, response)
}

pub async fn pause(client: &mut VeaClient, format: OutputFormat, args: AppIdArg) -> Result<()> {
    let response =
        client.call(Request::PauseApp { id: request_id(), app_id: AppId::from_string(args.app_id) }).await?;
    print_lifecycle(format, response)
}

pub async fn resume(client: &mut VeaClient, format: OutputFormat, args: AppIdArg) -> Result<()> {
    let response =
        client.call(Request::ResumeApp { id: request_id(), app_id: AppId::from_string(args.app_id) }).await?;
    print_lifecycle(format, response)
}

pub async fn uninstall(client: &mut VeaClient, format: OutputFormat, args: AppIdArg) -> Result<()> {
    let response = client
        .call(Request::UninstallApp { id: request_id(), app_id: AppId::from_string(args.app_id) })
        .await?;
    print_lifecycle(format, response)
}
