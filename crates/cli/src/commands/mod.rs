// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod deploy;
pub mod info;
pub mod lifecycle;
pub mod list;
pub mod signals;

use crate::output::{format_or_json, OutputFormat};
use vea_wire::Response;

/// Shared renderer for the lifecycle-operation responses (deploy/run/stop/
/// pause/resume/uninstall each have their own wire tag, but the same
/// `status`/`result`/`state`/`app_id`/`execution_id` shape).
pub fn print_lifecycle(format: OutputFormat, response: Response) -> anyhow::Result<()> {
    let debug = format!("{response:?}");
    let Some(fields) = response.lifecycle_fields() else {
        anyhow::bail!("expected a lifecycle response, got {debug}");
    };
    format_or_json(
        format,
        &response_to_json(&fields.status, &fields.result, &fields.state, fields.app_id.as_str(), fields.execution_id.as_deref()),
        || {
            print!("{} ({})", fields.result, fields.status);
            if let Some(execution_id) = &fields.execution_id {
                print!(" execution={execution_id}");
            }
            println!(" state={}", fields.state);
        },
    )
}

fn response_to_json(
    status: &str,
    result: &str,
    state: &str,
    app_id: &str,
    execution_id: Option<&str>,
) -> serde_json::Value {
    serde_json::json!({
        "status": status,
        "result": result,
        "state": state,
        "app_id": app_id,
        "execution_id": execution_id,
    })
}
