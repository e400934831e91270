// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic reconcile loop (spec §4.6): beyond the synchronous pass run
//! once at startup, the daemon re-aligns catalog state with the
//! container runtime on a fixed interval for the rest of its life.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use vea_engine::Reconciler;

/// Spawns the periodic reconcile task. The returned handle runs until
/// aborted; the daemon aborts it on shutdown.
pub fn spawn_reconciler(reconciler: Arc<Reconciler>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            info!("running periodic reconcile pass");
            reconciler.run_once().await;
        }
    })
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
