// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_a_pinned_pip_dependency() {
    let spec = parse_dependency("pip:requests@2.31").unwrap();
    assert!(matches!(spec.ecosystem, Ecosystem::Pip));
    assert_eq!(spec.name, "requests");
    assert_eq!(spec.version.as_deref(), Some("2.31"));
}

#[test]
fn parses_an_unpinned_npm_dependency() {
    let spec = parse_dependency("npm:left-pad").unwrap();
    assert!(matches!(spec.ecosystem, Ecosystem::Npm));
    assert_eq!(spec.name, "left-pad");
    assert_eq!(spec.version, None);
}

#[test]
fn falls_back_to_other_for_an_unrecognized_ecosystem() {
    let spec = parse_dependency("cargo:serde@1.0").unwrap();
    assert!(matches!(spec.ecosystem, Ecosystem::Other(ref e) if e == "cargo"));
}

#[test]
fn rejects_a_dep_argument_with_no_colon() {
    assert!(parse_dependency("requests").is_err());
}

#[test]
fn rejects_a_dep_argument_with_an_empty_name() {
    assert!(parse_dependency("pip:").is_err());
}
