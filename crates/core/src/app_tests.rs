// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn startable_from_installed_stopped_or_error() {
    for status in [ApplicationStatus::Installed, ApplicationStatus::Stopped, ApplicationStatus::Error]
    {
        let app = Application::builder().status(status).build();
        assert!(app.startable(), "{status} should be startable");
    }
}

#[test]
fn not_startable_while_running_or_transitioning() {
    for status in [
        ApplicationStatus::Installing,
        ApplicationStatus::Starting,
        ApplicationStatus::Running,
        ApplicationStatus::Paused,
        ApplicationStatus::Uninstalling,
    ] {
        let app = Application::builder().status(status).build();
        assert!(!app.startable(), "{status} should not be startable");
    }
}

#[test]
fn app_id_round_trips_through_display() {
    let id = AppId::new();
    let parsed = AppId::from_string(id.to_string());
    assert_eq!(id, parsed);
}

#[test]
fn resource_limits_default_matches_spec_caps() {
    let limits = ResourceLimits::default();
    assert_eq!(limits.memory_bytes, 512 * 1024 * 1024);
    assert_eq!(limits.cpu_quota_us, 50_000);
    assert_eq!(limits.tmpfs_bytes, 100 * 1024 * 1024);
}
