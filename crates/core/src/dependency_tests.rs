// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn ecosystem_display_matches_expected_tags() {
    assert_eq!(Ecosystem::Pip.to_string(), "pip");
    assert_eq!(Ecosystem::Npm.to_string(), "npm");
    assert_eq!(Ecosystem::Other("cargo".to_string()).to_string(), "cargo");
}

#[test]
fn dependency_serializes_with_snake_case_status() {
    let dep = Dependency {
        app_id: AppId::from_string("app-test000000000000000"),
        ecosystem: Ecosystem::Pip,
        name: "requests".to_string(),
        version: Some("2.31.0".to_string()),
        status: InstallStatus::Failed,
        error: Some("network unreachable".to_string()),
    };
    let json = serde_json::to_value(&dep).unwrap();
    assert_eq!(json["status"], "failed");
}
