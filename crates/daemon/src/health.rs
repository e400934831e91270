// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health endpoint (spec §6): a plain HTTP GET on a separate port. None of
//! the teacher's own crates carry an HTTP server dependency, so this one
//! piece is enriched from the pack with `axum`, grounded on the sibling
//! Docker-management daemon example of the same shape as this component.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use vea_storage::Catalog;

#[derive(Clone)]
pub struct HealthState {
    pub catalog: Catalog,
    pub runtime_id: String,
    pub started_at: Instant,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    runtime_id: String,
    uptime_ms: u64,
}

fn router(state: Arc<HealthState>) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

async fn health(State(state): State<Arc<HealthState>>) -> (StatusCode, Json<HealthBody>) {
    let healthy = state.catalog.healthy();
    let body = HealthBody {
        status: if healthy { "healthy" } else { "degraded" },
        runtime_id: state.runtime_id.clone(),
        uptime_ms: state.started_at.elapsed().as_millis() as u64,
    };
    let code = if healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(body))
}

/// Binds and serves the health endpoint until the process exits.
pub async fn serve(addr: SocketAddr, state: HealthState) -> std::io::Result<()> {
    info!(%addr, "health endpoint listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(Arc::new(state))).await
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
