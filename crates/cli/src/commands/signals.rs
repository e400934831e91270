// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vea get-signal|set-signal` — read and write the shared signals surface.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::collections::HashMap;
use vea_wire::{Request, Response};

use crate::client::{request_id, VeaClient};
use crate::output::{format_or_json, OutputFormat};

#[derive(Args, Debug)]
pub struct GetSignalArgs {
    /// One or more signal paths to read, e.g. `vehicle.speed`.
    pub paths: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SetSignalArgs {
    /// A `path=json_value` pair to write. Repeatable.
    #[arg(value_name = "PATH=VALUE", required = true)]
    pub assignments: Vec<String>,
}

pub async fn get(client: &mut VeaClient, format: OutputFormat, args: GetSignalArgs) -> Result<()> {
    let response = client.call(Request::GetSignalsValue { id: request_id(), paths: args.paths }).await?;
    let Response::GetSignalsValueResponse { values, .. } = response else {
        bail!("expected a get_signals_value response, got {response:?}");
    };
    format_or_json(format, &values, || {
        for (path, value) in &values {
            println!("{path} = {value}");
        }
    })
}

pub async fn set(client: &mut VeaClient, format: OutputFormat, args: SetSignalArgs) -> Result<()> {
    let mut values = HashMap::new();
    for assignment in &args.assignments {
        let (path, raw) = assignment
            .split_once('=')
            .with_context(|| format!("invalid assignment {assignment:?}, expected PATH=VALUE"))?;
        let value: serde_json::Value = serde_json::from_str(raw).unwrap_or_else(|_| raw.into());
        values.insert(path.to_string(), value);
    }

    let response = client.call(Request::WriteSignalsValue { id: request_id(), values }).await?;
    let Response::WriteSignalsValueResponse { results, .. } = response else {
        bail!("expected a write_signals_value response, got {response:?}");
    };
    format_or_json(format, &results, || {
        for outcome in &results {
            match &outcome.error {
                Some(error) => println!("{}: failed ({error})", outcome.path),
                None => println!("{}: ok", outcome.path),
            }
        }
    })
}
