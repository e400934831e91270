// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn severity_ordering_places_error_highest() {
    assert!(Severity::Error > Severity::Warning);
    assert!(Severity::Warning > Severity::Info);
    assert!(Severity::Info > Severity::Debug);
}

#[test]
fn payload_str_handles_non_utf8_lossily() {
    let record = LogRecord {
        app_id: AppId::from_string("app-test000000000000000"),
        execution_id: None,
        stream: LogStream::Stdout,
        severity: Severity::Info,
        timestamp_ms: 0,
        seq: 0,
        payload: vec![0xff, 0xfe, b'h', b'i'],
    };
    assert!(record.payload_str().ends_with("hi"));
}
