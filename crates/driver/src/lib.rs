// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vea-driver: thin, replaceable adapter over a local container engine.

pub mod docker;
pub mod driver_trait;
pub mod error;
pub mod fake;
pub mod name;
pub mod spec;

pub use docker::DockerDriver;
pub use driver_trait::ContainerDriver;
pub use error::DriverError;
pub use fake::FakeDriver;
pub use name::container_name;
pub use spec::{
    AttachedStreams, ContainerHandle, ContainerSpec, ContainerStatus, InspectResult, Mount,
    ResourceCaps, TmpfsMount,
};
