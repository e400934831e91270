// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vea info|ping` — runtime identity and reachability checks.

use anyhow::{bail, Result};
use vea_wire::{Request, Response};

use crate::client::{request_id, ClientError, VeaClient};
use crate::output::{format_or_json, OutputFormat};

pub async fn info(client: &mut VeaClient, format: OutputFormat) -> Result<()> {
    let response = client.call(Request::GetRuntimeInfo { id: request_id() }).await?;
    let Response::GetRuntimeInfoResponse { runtime_id, version, capabilities, .. } = response else {
        return Err(ClientError::UnexpectedResponse(response).into());
    };
    format_or_json(
        format,
        &serde_json::json!({ "runtime_id": runtime_id, "version": version, "capabilities": capabilities }),
        || {
            println!("runtime_id: {runtime_id}");
            println!("version:    {version}");
            println!("capabilities: {}", capabilities.join(", "));
        },
    )
}

pub async fn ping(client: &mut VeaClient, format: OutputFormat) -> Result<()> {
    let sent_at = std::time::Instant::now();
    let response = client.call(Request::Ping { id: request_id() }).await?;
    let Response::PongResponse { server_time_ms, .. } = response else {
        bail!("expected a pong response, got {response:?}");
    };
    let round_trip_ms = sent_at.elapsed().as_millis();
    format_or_json(
        format,
        &serde_json::json!({ "server_time_ms": server_time_ms, "round_trip_ms": round_trip_ms }),
        || println!("pong: server_time_ms={server_time_ms} round_trip_ms={round_trip_ms}"),
    )
}
