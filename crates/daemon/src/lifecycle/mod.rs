// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: startup wiring and the periodic reconcile loop.

pub mod reconcile;
pub mod startup;

pub use reconcile::spawn_reconciler;
pub use startup::{startup, StartupError, StartupOutcome};
