// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn stopped_and_error_are_terminal() {
    assert!(RuntimeState::Stopped.is_terminal());
    assert!(RuntimeState::Error.is_terminal());
}

#[test]
fn running_and_paused_are_not_terminal() {
    assert!(!RuntimeState::Running.is_terminal());
    assert!(!RuntimeState::Paused.is_terminal());
}

#[test]
fn execution_id_never_equals_a_distinct_generation() {
    let a = ExecutionId::new();
    let b = ExecutionId::new();
    assert_ne!(a, b);
}
