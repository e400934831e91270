// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! LogRecord: append-only catalog entries fed by the Output Pipeline.

use crate::app::AppId;
use crate::execution::ExecutionId;
use serde::{Deserialize, Serialize};

/// Which stream a LogRecord came from (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStream {
    Status,
    Stdout,
    Stderr,
    System,
}

crate::simple_display! {
    LogStream {
        Status => "status",
        Stdout => "stdout",
        Stderr => "stderr",
        System => "system",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

crate::simple_display! {
    Severity {
        Debug => "debug",
        Info => "info",
        Warning => "warning",
        Error => "error",
    }
}

/// Append-only log entry (spec §3). Insertion order within
/// (`app_id`, `stream`) is guaranteed monotonic by `seq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub app_id: AppId,
    pub execution_id: Option<ExecutionId>,
    pub stream: LogStream,
    pub severity: Severity,
    pub timestamp_ms: u64,
    /// Monotonic sequence number assigned by the catalog at append time.
    /// Breaks ties when two records share `timestamp_ms`.
    pub seq: u64,
    pub payload: Vec<u8>,
}

impl LogRecord {
    pub fn payload_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

#[cfg(test)]
#[path = "log_record_tests.rs"]
mod tests;
