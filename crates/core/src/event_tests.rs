// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::app::Application;

#[test]
fn application_put_round_trips_through_json() {
    let app = Application::builder().build();
    let event = CatalogEvent::ApplicationPut { app: app.clone() };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"application:put\""));
    let back: CatalogEvent = serde_json::from_str(&json).unwrap();
    match back {
        CatalogEvent::ApplicationPut { app: roundtripped } => assert_eq!(roundtripped, app),
        other => panic!("expected ApplicationPut, got {other:?}"),
    }
}

#[test]
fn event_name_matches_wire_tag() {
    let event = CatalogEvent::ApplicationDeleted { app_id: AppId::new() };
    assert_eq!(event.name(), "application:deleted");
}
