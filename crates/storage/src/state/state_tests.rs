// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vea_core::test_support::{application_put_event, execution_put_event, log_appended_event};

#[test]
fn application_put_then_deleted_clears_related_state() {
    let mut state = MaterializedState::new(DEFAULT_LOG_RETENTION);
    state.apply(&application_put_event("app-aaaaaaaaaaaaaaaaaaaa"));
    state.apply(&execution_put_event("app-aaaaaaaaaaaaaaaaaaaa", "exe-bbbbbbbbbbbbbbbbbbb"));
    state.apply(&log_appended_event("app-aaaaaaaaaaaaaaaaaaaa", 1, "hi"));
    assert_eq!(state.applications.len(), 1);

    let app_id = AppId::from_string("app-aaaaaaaaaaaaaaaaaaaa");
    state.apply(&CatalogEvent::ApplicationDeleted { app_id });
    assert!(state.applications.is_empty());
    assert!(state.executions_by_app.is_empty());
    assert!(state.executions_by_id.is_empty());
    assert!(state.logs.is_empty());
}

#[test]
fn log_retention_drops_oldest_first() {
    let mut state = MaterializedState::new(2);
    let app_id = "app-aaaaaaaaaaaaaaaaaaaa";
    state.apply(&log_appended_event(app_id, 1, "one"));
    state.apply(&log_appended_event(app_id, 2, "two"));
    state.apply(&log_appended_event(app_id, 3, "three"));

    let records = &state.logs[&AppId::from_string(app_id)];
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].seq, 2);
    assert_eq!(records[1].seq, 3);
}
