// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

struct NullSink;
impl SignalSink for NullSink {
    fn on_update(&self, _path: &str, _value: &serde_json::Value) {}
}

#[tokio::test]
async fn disabled_gateway_reports_unavailable_for_every_op() {
    let gateway = DisabledSignalGateway;
    assert!(matches!(
        gateway.read(&["vehicle.speed".to_string()]).await,
        Err(SignalError::Unavailable)
    ));
    assert!(matches!(gateway.write(HashMap::new()).await, Err(SignalError::Unavailable)));
    assert!(matches!(
        gateway.subscribe(&[], std::sync::Arc::new(NullSink)).await,
        Err(SignalError::Unavailable)
    ));
    assert!(matches!(gateway.unsubscribe(SubscriptionId(1)).await, Err(SignalError::Unavailable)));
    assert!(matches!(gateway.tree().await, Err(SignalError::Unavailable)));
}
