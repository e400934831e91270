// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vea list` — enumerate deployed applications.

use anyhow::{bail, Result};
use clap::Args;
use std::io::Write;
use vea_wire::{Request, Response};

use crate::client::{request_id, VeaClient};
use crate::output::{apply_limit, handle_list_with_limit, OutputFormat};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of applications to print.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,

    /// Print every deployed application, ignoring `--limit`.
    #[arg(long)]
    pub no_limit: bool,
}

pub async fn handle(client: &mut VeaClient, format: OutputFormat, args: ListArgs) -> Result<()> {
    let response = client.call(Request::ListDeployedApps { id: request_id() }).await?;
    let Response::ListDeployedAppsResponse { mut applications, .. } = response else {
        bail!("expected a list_deployed_apps response, got {response:?}");
    };

    let truncation = apply_limit(&mut applications, args.limit, args.no_limit);
    handle_list_with_limit(format, &applications, "no applications deployed", truncation, |apps, out| {
        for app in apps {
            let _ = writeln!(
                out,
                "{:<24} {:<10} {:<9} {}",
                app.app_id.to_string(),
                app.kind.to_string(),
                app.status.to_string(),
                app.name,
            );
        }
    })
}
