// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vea-engine: the Execution Engine (C4), Dependency Installer (C3),
//! Output Pipeline (C5), and Reconciler (C6) — everything that turns a
//! Catalog row and a Container Driver into a running Application.

pub mod dependencies;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod reconciler;

pub use dependencies::{DependencyInstaller, EcosystemInstaller, PipInstaller};
pub use engine::{Engine, EngineConfig, InstallSpec};
pub use error::EngineError;
pub use pipeline::{OutputChunk, OutputPipeline};
pub use reconciler::{runtime_label, Reconciler};
